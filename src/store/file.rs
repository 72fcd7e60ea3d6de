// Local JSON document source.
//
// Accepts either a JSON array of strings or a JSON array of objects that
// carry the text attribute (the same shape as exported DynamoDB items after
// unmarshalling). The file is re-read on every scan so edits show up on the
// next request, and it is paged so the continuation path behaves like a
// real table scan.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use super::traits::{DocumentPage, DocumentSource, PageKey};

/// Items per page when scanning a file.
pub const DEFAULT_PAGE_SIZE: usize = 100;

pub struct FileSource {
    path: PathBuf,
    text_attribute: String,
    page_size: usize,
}

impl FileSource {
    pub fn new(path: PathBuf, text_attribute: &str, page_size: usize) -> Self {
        Self {
            path,
            text_attribute: text_attribute.to_string(),
            page_size: page_size.max(1),
        }
    }

    async fn load_items(&self) -> Result<Vec<Value>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read documents from {}", self.path.display()))?;
        let parsed: Value = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not valid JSON", self.path.display()))?;
        match parsed {
            Value::Array(items) => Ok(items),
            _ => anyhow::bail!(
                "{} must contain a JSON array of responses",
                self.path.display()
            ),
        }
    }
}

/// Pull the response text out of one item, if it has one.
pub fn item_text<'a>(item: &'a Value, text_attribute: &str) -> Option<&'a str> {
    match item {
        Value::String(text) => Some(text),
        Value::Object(fields) => fields.get(text_attribute).and_then(Value::as_str),
        _ => None,
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_page(&self, start: Option<&PageKey>) -> Result<DocumentPage> {
        let items = self.load_items().await?;

        let offset = match start {
            None => 0,
            Some(PageKey(key)) => key
                .get("offset")
                .and_then(Value::as_u64)
                .context("File source continuation key has no offset")?
                as usize,
        };

        let end = (offset + self.page_size).min(items.len());
        let mut documents = Vec::with_capacity(end.saturating_sub(offset));
        for (index, item) in items.iter().enumerate().take(end).skip(offset) {
            match item_text(item, &self.text_attribute) {
                Some(text) => documents.push(text.to_string()),
                None => warn!(
                    index,
                    attribute = %self.text_attribute,
                    "Skipping item without a text attribute"
                ),
            }
        }

        let last_evaluated_key = if end < items.len() {
            Some(PageKey(serde_json::json!({ "offset": end })))
        } else {
            None
        };

        Ok(DocumentPage {
            documents,
            last_evaluated_key,
        })
    }
}
