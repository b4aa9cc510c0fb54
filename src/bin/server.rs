//! typepack Server Binary
//!
//! Starts the TCP text service.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use typepack::network::Server;
use typepack::store::TextStore;
use typepack::Config;

/// typepack Server
#[derive(Parser, Debug)]
#[command(name = "typepack-server")]
#[command(about = "Text service speaking GUID-tagged packets")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    listen: String,

    /// Worker threads (concurrent client sessions)
    #[arg(short, long, default_value = "32")]
    workers: usize,

    /// Maximum number of stored texts
    #[arg(short, long, default_value = "1024")]
    max_texts: usize,

    /// Idle read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "30000")]
    read_timeout_ms: u64,

    /// Write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,typepack=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("typepack server v{}", typepack::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let config = config_from(&args);

    let store = Arc::new(TextStore::new(config.max_texts));

    let server = match Server::bind(config, store) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Map command-line arguments onto the server config
fn config_from(args: &Args) -> Config {
    Config::builder()
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .max_texts(args.max_texts)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build()
}
