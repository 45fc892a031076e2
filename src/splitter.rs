//! Paragraph splitting for rebuttal documents
//!
//! Annotation runs once per paragraph, so the splitter decides the grain of
//! evidence extraction.

use crate::oracle::{OracleClient, OracleError, OracleRequest, Task};
use async_trait::async_trait;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use schemars::JsonSchema;
use serde::Deserialize;

#[async_trait]
pub trait DocumentSplitter: Send + Sync {
    async fn split(&self, document: &str) -> Result<Vec<String>, OracleError>;
}

/// Splits on Markdown block structure: paragraphs and list items
///
/// Headings, code blocks, and tables are not argument text and are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownSplitter;

impl MarkdownSplitter {
    pub fn paragraphs(document: &str) -> Vec<String> {
        let mut paragraphs = Vec::new();
        let mut current = String::new();
        let mut depth = 0usize;

        for event in Parser::new_ext(document, Options::all()) {
            match event {
                Event::Start(Tag::Paragraph) | Event::Start(Tag::Item) => {
                    flush(&mut current, &mut paragraphs);
                    depth += 1;
                }
                Event::End(TagEnd::Paragraph) | Event::End(TagEnd::Item) => {
                    flush(&mut current, &mut paragraphs);
                    depth = depth.saturating_sub(1);
                }
                Event::Text(text) | Event::Code(text) if depth > 0 => current.push_str(&text),
                Event::SoftBreak | Event::HardBreak if depth > 0 => current.push(' '),
                _ => {}
            }
        }
        flush(&mut current, &mut paragraphs);
        paragraphs
    }
}

fn flush(current: &mut String, paragraphs: &mut Vec<String>) {
    let text = current.trim();
    if !text.is_empty() {
        paragraphs.push(text.to_string());
    }
    current.clear();
}

#[async_trait]
impl DocumentSplitter for MarkdownSplitter {
    async fn split(&self, document: &str) -> Result<Vec<String>, OracleError> {
        Ok(Self::paragraphs(document))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SplitParagraphs {
    #[serde(default)]
    paragraphs: Vec<String>,
}

/// Asks the oracle to split the document (`split_paragraphs`)
#[derive(Clone)]
pub struct OracleSplitter {
    client: OracleClient,
}

impl OracleSplitter {
    pub fn new(client: OracleClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentSplitter for OracleSplitter {
    async fn split(&self, document: &str) -> Result<Vec<String>, OracleError> {
        let answer: SplitParagraphs = self
            .client
            .ask(OracleRequest::new(Task::SplitParagraphs).with_input("document", document))
            .await?;
        Ok(answer
            .paragraphs
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect())
    }
}
