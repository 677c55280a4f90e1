use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use vod_cluster::catalog::VideoCatalog;
use vod_cluster::content::{ContentService, FsContentService};
use vod_cluster::routing;
use vod_cluster::routing::router::NetworkContentService;
use vod_cluster::transcode::DashTranscoder;
use vod_cluster::web::handlers::{self, WebContext};

#[derive(Parser)]
#[command(name = "vod-web")]
#[command(about = "VOD upload/playback front-end")]
struct Args {
    /// Host to listen on
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Scratch directory for uploads awaiting transcode
    #[arg(long, default_value = "tmp")]
    scratch_dir: PathBuf,

    /// Path to the video metadata database
    db_path: PathBuf,

    /// Content backend: "fs" (local directory) or "nw" (distributed store)
    backend: String,

    /// Backend options: a base directory for `fs`; the
    /// "admin-addr,node1,node2,…" string for `nw`
    options: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let catalog = VideoCatalog::open(&args.db_path)?;

    let content: Arc<dyn ContentService> = match args.backend.as_str() {
        "fs" => Arc::new(FsContentService::new(&args.options).await?),
        "nw" => {
            let service = Arc::new(NetworkContentService::from_options(&args.options)?);

            // The router doubles as the admin RPC service.
            let admin_addr = service.admin_addr().to_string();
            let admin_listener = tokio::net::TcpListener::bind(&admin_addr).await?;
            let admin_app = routing::admin::router(service.clone());
            tracing::info!("Admin service listening on {admin_addr}");
            tokio::spawn(async move {
                if let Err(e) = axum::serve(admin_listener, admin_app).await {
                    tracing::error!("Admin service failed: {e}");
                }
            });

            service
        }
        other => anyhow::bail!("unknown content backend {other:?} (expected \"fs\" or \"nw\")"),
    };

    let ctx = Arc::new(WebContext {
        catalog,
        content,
        transcoder: DashTranscoder::new(),
        scratch_dir: args.scratch_dir,
    });

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on {addr}");
    axum::serve(listener, handlers::router(ctx)).await?;

    Ok(())
}
