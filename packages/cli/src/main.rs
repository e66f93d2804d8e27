mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{generate, json, markdown, serve, GenerateArgs, JsonArgs, MarkdownArgs, ServeArgs};
use tracing_subscriber::EnvFilter;

/// Devbox - browser toolbox with a live HTML preview
#[derive(Parser, Debug)]
#[command(name = "devbox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the toolbox server
    Serve(ServeArgs),

    /// Pretty-print or minify a JSON file
    Json(JsonArgs),

    /// Render a Markdown file to HTML
    Markdown(MarkdownArgs),

    /// Generate an HTML page from a prompt
    Generate(GenerateArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("devbox=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cwd = match std::env::current_dir() {
        Ok(dir) => dir.display().to_string(),
        Err(err) => {
            eprintln!("{} Cannot get current directory: {}", "Error:".red().bold(), err);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Serve(args) => serve(args, &cwd).await,
        Command::Json(args) => json(args),
        Command::Markdown(args) => markdown(args),
        Command::Generate(args) => generate(args, &cwd).await,
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
