pub mod generate;
pub mod json;
pub mod markdown;
pub mod serve;

pub use generate::{generate, GenerateArgs};
pub use json::{json, JsonArgs};
pub use markdown::{markdown, MarkdownArgs};
pub use serve::{serve, ServeArgs};
