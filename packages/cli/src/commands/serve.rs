use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use devbox_generate::GeminiClient;
use devbox_preview::RefreshPolicy;
use devbox_server::ServeOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Start with auto refresh off; the preview only updates on Run
    #[arg(long)]
    pub manual: bool,

    /// Quiet period before an auto refresh, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Load the source from this file and reload it on every save
    #[arg(short, long)]
    pub watch: Option<PathBuf>,
}

pub async fn serve(args: ServeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let host = args.host.unwrap_or_else(|| config.host.clone());
    let port = args.port.unwrap_or(config.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", host, port))?;

    let mut settings = config.preview_settings();
    if args.manual {
        settings = settings.with_policy(RefreshPolicy::Manual);
    }
    if let Some(ms) = args.debounce_ms {
        settings = settings.with_quiescence_window(Duration::from_millis(ms));
    }

    println!("{}", "🧰 Starting Devbox...".bright_blue().bold());
    println!("   Open:    {}", format!("http://{}", addr).cyan());
    println!("   Refresh: {}", settings.policy.as_str());
    if let Some(path) = &args.watch {
        println!("   Watch:   {}", path.display());
    }
    println!();

    let generator = Arc::new(GeminiClient::from_config(config.generation));
    let options = ServeOptions {
        addr,
        settings,
        watch: args.watch,
    };

    devbox_server::serve(options, generator).await?;
    Ok(())
}
