// DocumentSource trait: backend-agnostic paginated scan.
//
// Implementors: DynamoDbSource (wraps aws-sdk-dynamodb), FileSource (local JSON).
// A backend only has to know how to fetch one page; walking the pages is
// shared by `fetch_all`.

use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// Opaque continuation token returned by a backend and handed back to it
/// to fetch the next page. Backends encode whatever they need as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct PageKey(pub serde_json::Value);

/// One page of a scan.
#[derive(Debug, Clone, Default)]
pub struct DocumentPage {
    /// Response texts in scan order
    pub documents: Vec<String>,
    /// Present when more pages remain
    pub last_evaluated_key: Option<PageKey>,
}

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Short human-readable name for logs (table name, file path, ...).
    fn describe(&self) -> String;

    /// Fetch a single page starting after `start` (or from the beginning).
    async fn fetch_page(&self, start: Option<&PageKey>) -> Result<DocumentPage>;

    /// Scan every page and return all documents in scan order.
    async fn fetch_all(&self) -> Result<Vec<String>> {
        let mut documents = Vec::new();
        let mut start: Option<PageKey> = None;
        let mut pages = 0u32;

        loop {
            let page = self.fetch_page(start.as_ref()).await?;
            pages += 1;
            documents.extend(page.documents);

            match page.last_evaluated_key {
                Some(next) => {
                    if start.as_ref() == Some(&next) {
                        anyhow::bail!(
                            "Scan of {} returned the same continuation key twice (page {pages})",
                            self.describe()
                        );
                    }
                    start = Some(next);
                }
                None => break,
            }
        }

        debug!(
            source = %self.describe(),
            pages,
            documents = documents.len(),
            "Document scan complete"
        );

        Ok(documents)
    }
}
