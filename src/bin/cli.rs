//! typepack CLI Client
//!
//! Command-line interface for the text service.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use typepack::network::Client;
use typepack::protocol::STATUS_OK;
use typepack::TypeId;

/// typepack CLI
#[derive(Parser, Debug)]
#[command(name = "typepack-cli")]
#[command(about = "CLI for the typepack text service")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a text on the server
    Add {
        /// The text to store
        text: String,
    },

    /// Print every stored text
    Get,

    /// Show the canonical form and wire bytes of a type id
    Id {
        /// GUID, with or without braces
        guid: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> typepack::Result<()> {
    match args.command {
        Commands::Id { guid } => {
            let id: TypeId = guid.parse()?;
            let wire: Vec<String> = id.as_bytes().iter().map(|b| format!("{:02X}", b)).collect();
            println!("{}", id);
            println!("{}", wire.join(" "));
        }
        Commands::Add { text } => {
            let mut client = Client::connect(&args.server)?;
            let code = client.add_text(&text)?;
            if code == STATUS_OK {
                println!("OK");
            } else {
                println!("FAILED (0x{:08X})", code as u32);
            }
        }
        Commands::Get => {
            let mut client = Client::connect(&args.server)?;
            for text in client.get_all_texts()? {
                println!("{}", text);
            }
        }
    }
    Ok(())
}
