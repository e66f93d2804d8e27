//! # Markdown Preview
//!
//! Converts Markdown to HTML synchronously on every edit.

use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;

/// Document the Markdown tool starts with
pub const MARKDOWN_SAMPLE: &str = "# Hello Markdown\n\nStart typing your content...\n\n- Live preview\n- **Bold** and *italic*\n- Code blocks\n\n```javascript\nconsole.log(\"Hello World\");\n```\n";

fn options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Render Markdown to an HTML fragment
pub fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, options());
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownPreview {
    markdown: String,
    html: String,
}

impl MarkdownPreview {
    pub fn new(markdown: impl Into<String>) -> Self {
        let markdown = markdown.into();
        let html = render_markdown(&markdown);
        Self { markdown, html }
    }

    pub fn set(&mut self, markdown: impl Into<String>) {
        self.markdown = markdown.into();
        self.html = render_markdown(&self.markdown);
    }

    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn copy_html(&self) -> &str {
        &self.html
    }

    pub fn clear(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.set(String::new());
        true
    }
}

impl Default for MarkdownPreview {
    fn default() -> Self {
        Self::new(MARKDOWN_SAMPLE)
    }
}
