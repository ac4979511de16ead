//! Bookshelf MCP Server: entry point.

use std::sync::Arc;

use clap::{Parser, Subcommand};

use bookshelf_mcp::config::{load_config, resolve_catalog};
use bookshelf_mcp::protocol::ProtocolHandler;
use bookshelf_mcp::tools::ToolRegistry;
use bookshelf_mcp::transport::{SseTransport, TransportAdapter};

#[derive(Parser)]
#[command(
    name = "bookshelf-mcp",
    about = "MCP server for the Bookshelf catalog over Server-Sent Events",
    version
)]
struct Cli {
    /// Path to a JSON catalog file.
    #[arg(long)]
    catalog: Option<String>,

    /// Configuration file path.
    #[arg(short, long)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server over SSE (default).
    Serve {
        /// Listen address.
        #[arg(long)]
        addr: Option<String>,

        /// Path to a JSON catalog file.
        #[arg(long)]
        catalog: Option<String>,

        /// Configuration file path.
        #[arg(short, long)]
        config: Option<String>,

        /// Log level (trace, debug, info, warn, error).
        #[arg(long)]
        log_level: Option<String>,
    },

    /// Validate a catalog file.
    Validate {
        /// Path to the JSON catalog file.
        path: String,
    },

    /// Print server capabilities as JSON.
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Serve {
        addr: None,
        catalog: None,
        config: None,
        log_level: None,
    });

    match command {
        Commands::Serve {
            addr,
            catalog,
            config,
            log_level,
        } => {
            let mut settings = load_config(config.or(cli.config).as_deref())?;
            if let Some(addr) = addr {
                settings.addr = addr;
            }
            if let Some(catalog) = catalog.or(cli.catalog) {
                settings.catalog = Some(catalog);
            }
            if let Some(level) = log_level.or(cli.log_level) {
                settings.log_level = level;
            }

            init_logging(&settings.log_level);

            let catalog = resolve_catalog(settings.catalog.as_deref())?;
            tracing::info!("Catalog ready: {} books", catalog.len());

            let handler = ProtocolHandler::new(Arc::new(catalog));
            let adapter = TransportAdapter::new(settings.high_water_mark, settings.keep_alive());
            let transport = SseTransport::with_adapter(handler, adapter, &settings.post_path);
            transport.run(&settings.addr).await?;
        }

        Commands::Validate { path } => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"));
            match resolve_catalog(Some(&path)) {
                Ok(catalog) => {
                    println!("Valid catalog file: {path}");
                    println!("  Books: {}", catalog.len());
                    println!("  Genres: {}", catalog.genres().join(", "));
                }
                Err(e) => {
                    eprintln!("Invalid catalog file: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Info => {
            let capabilities = bookshelf_mcp::types::InitializeResult::default_result();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "transport": "sse",
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
