//! Emotion pattern HTTP server.
//!
//! Loads configuration (file, then environment), starts the server and runs
//! until Ctrl+C.

use clap::Parser;
use emotion_pattern::{PatternResolver, PatternServer, ServiceConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Emotion Pattern API: free-text emotions to particle movement parameters.
#[derive(Parser)]
#[command(name = "emotion-pattern-server", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config and environment).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("emotion_pattern=info,tower_http=warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => ServiceConfig::from_file(path)?,
        None => {
            let path = ServiceConfig::default_config_path();
            if path.exists() {
                info!(path = %path.display(), "loading config");
                ServiceConfig::from_file(&path)?
            } else {
                ServiceConfig::default()
            }
        }
    };
    config.apply_env_overrides()?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    let resolver = PatternResolver::from_gemini_config(&config.gemini);
    let mut server = PatternServer::start(resolver, &config.server).await?;
    println!("Emotion Pattern API v{}", env!("CARGO_PKG_VERSION"));
    println!("Listening on http://{}", server.addr());

    tokio::select! {
        result = server.wait() => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("received Ctrl+C, shutting down...");
        }
    }
    server.shutdown();

    Ok(())
}
