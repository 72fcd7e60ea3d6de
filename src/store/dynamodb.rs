// DynamoDB document source: full-table Scan with ExclusiveStartKey paging.
//
// Credentials and region come from the standard AWS chain (env vars,
// profile, instance role) via aws-config. Only key attributes ever appear
// in LastEvaluatedKey, and DynamoDB keys are limited to S, N and B, so those
// are the only types the continuation token has to carry.

use std::collections::HashMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::traits::{DocumentPage, DocumentSource, PageKey};

pub struct DynamoDbSource {
    client: Client,
    table_name: String,
    text_attribute: String,
}

impl DynamoDbSource {
    /// Build a client from the ambient AWS configuration.
    pub async fn from_env(table_name: &str, text_attribute: &str) -> Self {
        let sdk_config = aws_config::load_from_env().await;
        Self::with_client(Client::new(&sdk_config), table_name, text_attribute)
    }

    pub fn with_client(client: Client, table_name: &str, text_attribute: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            text_attribute: text_attribute.to_string(),
        }
    }
}

#[async_trait]
impl DocumentSource for DynamoDbSource {
    fn describe(&self) -> String {
        format!("dynamodb:{}", self.table_name)
    }

    async fn fetch_page(&self, start: Option<&PageKey>) -> Result<DocumentPage> {
        let mut request = self.client.scan().table_name(&self.table_name);
        if let Some(key) = start {
            request = request.set_exclusive_start_key(Some(key_to_attributes(key)?));
        }

        let output = request
            .send()
            .await
            .with_context(|| format!("DynamoDB scan of {} failed", self.table_name))?;

        let items = output.items();
        let mut documents = Vec::with_capacity(items.len());
        for item in items {
            match item.get(&self.text_attribute) {
                Some(AttributeValue::S(text)) => documents.push(text.clone()),
                Some(_) => warn!(
                    attribute = %self.text_attribute,
                    "Skipping item whose text attribute is not a string"
                ),
                None => warn!(
                    attribute = %self.text_attribute,
                    "Skipping item without a text attribute"
                ),
            }
        }

        let last_evaluated_key = output
            .last_evaluated_key()
            .map(attributes_to_key)
            .transpose()?;

        debug!(
            table = %self.table_name,
            items = items.len(),
            more = last_evaluated_key.is_some(),
            "Fetched scan page"
        );

        Ok(DocumentPage {
            documents,
            last_evaluated_key,
        })
    }
}

/// Encode a LastEvaluatedKey as `{"attr": {"S": "..."}}` style JSON.
pub fn attributes_to_key(attributes: &HashMap<String, AttributeValue>) -> Result<PageKey> {
    let mut encoded = Map::new();
    for (name, value) in attributes {
        let typed = match value {
            AttributeValue::S(s) => serde_json::json!({ "S": s }),
            AttributeValue::N(n) => serde_json::json!({ "N": n }),
            AttributeValue::B(b) => serde_json::json!({ "B": b.as_ref() }),
            other => anyhow::bail!("Unsupported key attribute type for {name}: {other:?}"),
        };
        encoded.insert(name.clone(), typed);
    }
    Ok(PageKey(Value::Object(encoded)))
}

/// Inverse of `attributes_to_key`.
pub fn key_to_attributes(key: &PageKey) -> Result<HashMap<String, AttributeValue>> {
    let fields = key
        .0
        .as_object()
        .context("DynamoDB continuation key must be a JSON object")?;

    let mut attributes = HashMap::with_capacity(fields.len());
    for (name, typed) in fields {
        let value = if let Some(s) = typed.get("S").and_then(Value::as_str) {
            AttributeValue::S(s.to_string())
        } else if let Some(n) = typed.get("N").and_then(Value::as_str) {
            AttributeValue::N(n.to_string())
        } else if let Some(bytes) = typed.get("B") {
            let bytes: Vec<u8> = serde_json::from_value(bytes.clone())
                .with_context(|| format!("Malformed binary key attribute {name}"))?;
            AttributeValue::B(Blob::new(bytes))
        } else {
            anyhow::bail!("Malformed key attribute {name}: {typed}");
        };
        attributes.insert(name.clone(), value);
    }
    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip_preserves_types() {
        let mut attributes = HashMap::new();
        attributes.insert("user_id".to_string(), AttributeValue::S("u-17".to_string()));
        attributes.insert("ts".to_string(), AttributeValue::N("1718000000".to_string()));
        attributes.insert("hash".to_string(), AttributeValue::B(Blob::new(vec![1u8, 2, 255])));

        let key = attributes_to_key(&attributes).unwrap();
        assert_eq!(key.0["user_id"]["S"], "u-17");
        assert_eq!(key.0["ts"]["N"], "1718000000");

        let decoded = key_to_attributes(&key).unwrap();
        assert_eq!(decoded, attributes);
    }

    #[test]
    fn test_unsupported_key_type_rejected() {
        let mut attributes = HashMap::new();
        attributes.insert("flag".to_string(), AttributeValue::Bool(true));
        assert!(attributes_to_key(&attributes).is_err());
    }

    #[test]
    fn test_malformed_key_rejected() {
        let key = PageKey(serde_json::json!({ "id": { "X": "?" } }));
        assert!(key_to_attributes(&key).is_err());
        assert!(key_to_attributes(&PageKey(serde_json::json!("nope"))).is_err());
    }
}
