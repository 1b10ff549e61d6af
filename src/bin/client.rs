//! Clustering Console Client
//!
//! Menu-driven client: discover clusters from a table or load saved ones.

use clap::Parser;
use qtcluster::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = "127.0.0.1", help = "Server host")]
    host: String,
    #[arg(long, default_value_t = 8080, help = "Server port")]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log();
    kys();
    let args = Args::parse();
    let address = format!("{}:{}", args.host, args.port);
    let client = client::Client::connect(&address).await?;
    client::Console::new(client).run().await
}
