use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use vod_cluster::node::{handlers, service::StorageNode};

#[derive(Parser)]
#[command(name = "storage-node")]
#[command(about = "Single-host content blob server")]
struct Args {
    /// Host to listen on
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8090)]
    port: u16,

    /// Storage directory
    storage_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let node = Arc::new(StorageNode::new(&args.storage_dir).await?);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Storage node listening on {addr}");
    axum::serve(listener, handlers::router(node)).await?;

    Ok(())
}
