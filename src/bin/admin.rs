use clap::{Parser, Subcommand};

use vod_cluster::routing::protocol::{
    AddNodeRequest, AddNodeResponse, ENDPOINT_ADD_NODE, ENDPOINT_LIST_NODES, ENDPOINT_REMOVE_NODE,
    ListNodesResponse, RemoveNodeRequest, RemoveNodeResponse,
};

#[derive(Parser)]
#[command(name = "vod-admin")]
#[command(about = "Membership operations against a running content router")]
struct Args {
    /// Admin service address (host:port)
    admin_addr: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a storage node to the ring
    Add { node_address: String },
    /// Drain and remove a storage node from the ring
    Remove { node_address: String },
    /// List ring membership
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let http = reqwest::Client::new();

    match args.command {
        Command::Add { node_address } => {
            let response: AddNodeResponse = http
                .post(format!("http://{}{}", args.admin_addr, ENDPOINT_ADD_NODE))
                .json(&AddNodeRequest { node_address })
                .send()
                .await?
                .json()
                .await?;

            match response.error {
                None => println!("migrated {} file(s)", response.migrated_file_count),
                Some(error) => anyhow::bail!(
                    "add failed after {} migration(s): {error}",
                    response.migrated_file_count
                ),
            }
        }
        Command::Remove { node_address } => {
            let response: RemoveNodeResponse = http
                .post(format!("http://{}{}", args.admin_addr, ENDPOINT_REMOVE_NODE))
                .json(&RemoveNodeRequest { node_address })
                .send()
                .await?
                .json()
                .await?;

            match response.error {
                None => println!("migrated {} file(s)", response.migrated_file_count),
                Some(error) => anyhow::bail!(
                    "remove failed after {} migration(s): {error}",
                    response.migrated_file_count
                ),
            }
        }
        Command::List => {
            let response: ListNodesResponse = http
                .get(format!("http://{}{}", args.admin_addr, ENDPOINT_LIST_NODES))
                .send()
                .await?
                .json()
                .await?;

            for node in response.nodes {
                println!("{node}");
            }
        }
    }

    Ok(())
}
