//! LineLog Server Binary
//!
//! Accumulating line-echo TCP server daemon.

use clap::Parser;
use linelog::config::ServerConfig;
use linelog::server::{LineLogServer, TcpServer};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "linelogd")]
#[command(about = "Accumulating line-echo TCP server")]
#[command(version)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/linelog.toml")]
    config: PathBuf,

    /// Address to bind to
    #[arg(short, long)]
    bind: Option<String>,

    /// TCP port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Path of the shared data file
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Run detached from the controlling terminal
    #[arg(short, long)]
    daemon: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(if args.verbose {
            "linelog=debug,info"
        } else {
            "linelog=info,warn,error"
        })
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if let Err(e) = run(args) {
        error!("Fatal: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> linelog::Result<()> {
    info!("Starting linelogd v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = if args.config.exists() {
        ServerConfig::from_file(&args.config)?
    } else {
        info!("Config file not found, using defaults");
        ServerConfig::default()
    };

    // Override config with CLI arguments
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(data_file) = args.data_file {
        config.storage.data_file = data_file;
    }
    config.validate()?;

    info!("Listen address: {}", config.listen_addr());
    info!("Data file: {}", config.storage.data_file.display());

    // Bind before detaching so the invoking shell sees a bind failure, and
    // before the runtime exists so the fork happens on a single thread.
    let socket = TcpServer::bind_socket(&config)?;

    if args.daemon {
        linelog::daemon::detach()?;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let server = LineLogServer::with_socket(socket, config).await?;
        server.run().await
    })
}
