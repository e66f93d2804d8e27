use anyhow::{Context, Result};
use clap::Args;
use devbox_tools::{format_json, JsonStyle};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct JsonArgs {
    /// JSON file to format
    pub file: PathBuf,

    /// Emit compact output instead of indenting
    #[arg(long)]
    pub minify: bool,
}

pub fn json(args: JsonArgs) -> Result<()> {
    let output = format_file(&args)?;
    println!("{}", output);
    Ok(())
}

fn format_file(args: &JsonArgs) -> Result<String> {
    let input = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let style = if args.minify {
        JsonStyle::Minified
    } else {
        JsonStyle::Pretty
    };

    format_json(&input, style).with_context(|| format!("Invalid JSON in {}", args.file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(contents: &str, minify: bool) -> (tempfile::TempDir, JsonArgs) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.json");
        fs::write(&file, contents).unwrap();
        (dir, JsonArgs { file, minify })
    }

    #[test]
    fn test_format_file() {
        let (_dir, args) = args_for(r#"{"a": [1, 2]}"#, true);
        assert_eq!(format_file(&args).unwrap(), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let (_dir, args) = args_for("{nope", false);
        assert!(format_file(&args).is_err());
    }
}
