//! Clustering Server Binary
//!
//! Serves QT clustering sessions over TCP, one task per connection.
//! Tables come from PostgreSQL (`DB_URL`) unless `--memory` is given.

use clap::Parser;
use qtcluster::*;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = DEFAULT_BIND, help = "Address to listen on")]
    bind: String,
    #[arg(long, default_value = DEFAULT_ARCHIVE, help = "Directory for saved cluster files")]
    archive: PathBuf,
    #[arg(long, help = "Serve the built-in demo tables instead of PostgreSQL")]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    log();
    kys();
    let args = Args::parse();
    let source = source(args.memory);
    server::Server::new(source, args.archive)
        .run(&args.bind)
        .await
}

#[cfg(feature = "database")]
fn source(memory: bool) -> Arc<dyn database::Source> {
    match memory {
        true => Arc::new(database::Memory::demo()),
        false => Arc::new(database::Postgres::from_env()),
    }
}

#[cfg(not(feature = "database"))]
fn source(memory: bool) -> Arc<dyn database::Source> {
    if !memory {
        log::warn!("built without the database feature, serving demo tables");
    }
    Arc::new(database::Memory::demo())
}
