//! Report output in Markdown, JSON, and reference-manager formats.

mod export;
mod json;
mod markdown;

pub use self::json::*;
pub use export::*;
pub use markdown::*;
