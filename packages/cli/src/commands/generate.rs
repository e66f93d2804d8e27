use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use devbox_generate::{CodeGenerator, GeminiClient};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// What the page should be
    #[arg(short, long)]
    pub prompt: String,

    /// Existing HTML to modify
    #[arg(short, long)]
    pub context: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn generate(args: GenerateArgs, cwd: &str) -> Result<()> {
    if args.prompt.trim().is_empty() {
        return Err(anyhow!("Prompt is empty"));
    }

    let config = Config::load(cwd)?;
    let current_code = match &args.context {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => String::new(),
    };

    eprintln!("{}", "✨ Generating...".bright_blue().bold());

    let client = GeminiClient::from_config(config.generation);
    let code = client
        .generate(&args.prompt, &current_code)
        .await
        .context("Code generation failed")?;

    match args.output {
        Some(path) => {
            fs::write(&path, &code).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("   {} {}", "✓".green(), path.display());
        }
        None => println!("{}", code),
    }

    Ok(())
}
