//! Loading file contents as plain text for indexing.

use crate::error::{IngestError, IngestResult};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd"];

/// Load a file's content as plain text.
///
/// Markdown files are stripped of their markup so embeddings see prose rather
/// than syntax. Everything else is read as UTF-8 with lossy fallback.
pub fn load_content(path: &Path) -> IngestResult<String> {
    if !path.exists() {
        return Err(IngestError::FileNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some(ext) if MARKDOWN_EXTENSIONS.contains(&ext) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(markdown_to_text(&raw))
        }
        _ => {
            let bytes = std::fs::read(path)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Extract readable text from markdown, keeping code blocks verbatim.
fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut text = String::new();

    for event in parser {
        match event {
            Event::End(Tag::Heading(_, _, _)) | Event::End(Tag::Paragraph) => {
                text.push_str("\n\n");
            }
            Event::Start(Tag::Item) => {
                text.push_str("- ");
            }
            Event::End(Tag::Item) | Event::End(Tag::List(_)) => {
                text.push('\n');
            }
            Event::Start(Tag::CodeBlock(_)) => {
                text.push('\n');
            }
            Event::End(Tag::CodeBlock(_)) => {
                text.push('\n');
            }
            Event::Text(t) => {
                text.push_str(&t);
            }
            Event::Code(code) => {
                text.push_str(&code);
            }
            Event::SoftBreak | Event::HardBreak => {
                text.push('\n');
            }
            _ => {}
        }
    }

    text.trim().to_string()
}
