use anyhow::{Context, Result};
use clap::Args;
use devbox_tools::render_markdown;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct MarkdownArgs {
    /// Markdown file to render
    pub file: PathBuf,

    /// Write the HTML here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn markdown(args: MarkdownArgs) -> Result<()> {
    let source = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let html = render_markdown(&source);

    match args.output {
        Some(path) => fs::write(&path, html)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", html),
    }

    Ok(())
}
