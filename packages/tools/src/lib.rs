//! # Devbox Tools
//!
//! The two text tools that sit next to the live preview:
//!
//! - [`JsonFormatter`]: pretty-print or minify JSON, with inline errors
//! - [`MarkdownPreview`]: CommonMark (plus GFM tables, strikethrough and task
//!   lists) rendered to HTML on every edit
//!
//! Both keep their own state and never touch the preview source.

mod errors;
mod json;
mod markdown;

pub use errors::ToolError;
pub use json::{format_json, JsonFormatter, JsonStyle, JSON_SAMPLE};
pub use markdown::{render_markdown, MarkdownPreview, MARKDOWN_SAMPLE};
