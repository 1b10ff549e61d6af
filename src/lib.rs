//! Quality-Threshold clustering over mixed continuous and categorical records.
//!
//! The engine lives in [`data`] (schema, values, tuples, distances) and [`mining`]
//! (clusters, cluster sets, the QT miner). [`save`] persists cluster sets to disk.
//! With the `server` feature, [`database`], [`server`] and [`client`] add the record
//! sources, the per-connection session protocol and the console client.
pub mod data;
pub mod error;
pub mod mining;
pub mod save;

pub use error::MiningError;

#[cfg(feature = "server")]
pub mod client;
#[cfg(feature = "server")]
pub mod database;
#[cfg(feature = "server")]
pub mod server;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Distances between items, tuples and clusters, and the clustering radius.
pub type Energy = f64;
/// Position of a record inside a record set.
pub type Id = usize;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and benchmarking.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// SESSION PROTOCOL
// ============================================================================
/// Success marker leading every successful reply.
pub const REPLY_OK: &str = "OK";
/// Default address the server binds to.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default directory for saved cluster files.
pub const DEFAULT_ARCHIVE: &str = "clusters";
/// Extension suggested by the console client for saved cluster files.
pub const CLUSTER_FILE_EXTENSION: &str = "dmp";

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, exiting immediately");
            std::process::exit(0);
        }
    });
}
