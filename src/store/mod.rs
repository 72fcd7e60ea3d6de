// Document fetching. Paginated scans over wherever the survey responses live.
//
// Every backend implements DocumentSource, so the pipeline and the web layer
// only ever see `Arc<dyn DocumentSource>`.

pub mod file;
pub mod traits;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::config::{Config, SourceBackend};
use traits::DocumentSource;

/// Build the document source selected by SURVEY_SOURCE.
pub async fn open_source(config: &Config) -> Result<Arc<dyn DocumentSource>> {
    match config.source_backend {
        SourceBackend::File => {
            let path = config.require_file_source()?;
            info!(path = %path.display(), "Using file document source");
            Ok(Arc::new(file::FileSource::new(
                path.clone(),
                &config.text_attribute,
                file::DEFAULT_PAGE_SIZE,
            )))
        }
        #[cfg(feature = "dynamodb")]
        SourceBackend::DynamoDb => {
            info!(table = %config.table_name, "Using DynamoDB document source");
            let source =
                dynamodb::DynamoDbSource::from_env(&config.table_name, &config.text_attribute)
                    .await;
            Ok(Arc::new(source))
        }
        #[cfg(not(feature = "dynamodb"))]
        SourceBackend::DynamoDb => anyhow::bail!(
            "SURVEY_SOURCE=dynamodb but this build lacks the `dynamodb` feature.\n\
             Rebuild with default features or set SURVEY_SOURCE=file."
        ),
    }
}
