use crate::config::StoreConfig;
use crate::domain::model::{NewRecord, Record};
use crate::domain::ports::RecordStore;
use crate::utils::error::{DirectoryError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use url::Url;

/// 每次建立請求最多 10 筆紀錄
pub const MAX_RECORDS_PER_CREATE: usize = 10;
const PAGE_SIZE: &str = "100";

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<Record>,
    #[serde(default)]
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    #[serde(default)]
    records: Vec<Record>,
}

/// Airtable 風格的 REST 紀錄庫客戶端
#[derive(Debug, Clone)]
pub struct AirtableClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl AirtableClient {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;

        let mut base_url =
            Url::parse(&config.endpoint).map_err(|e| DirectoryError::InvalidConfigValueError {
                field: "store.endpoint".to_string(),
                value: config.endpoint.clone(),
                reason: format!("Invalid URL format: {}", e),
            })?;
        base_url
            .path_segments_mut()
            .map_err(|_| DirectoryError::InvalidConfigValueError {
                field: "store.endpoint".to_string(),
                value: config.endpoint.clone(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .push(&config.base_id);

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// `{endpoint}/{base_id}/{collection}[/{id}]`，集合名稱會被編碼（例如 "Services Lists"）
    pub fn collection_url(&self, collection: &str, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(collection);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    async fn send(
        &self,
        request: RequestBuilder,
        collection: &str,
        id: Option<&str>,
    ) -> Result<Response> {
        let response = request.bearer_auth(&self.api_key).send().await?;
        let status = response.status();
        tracing::debug!("Record store response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(DirectoryError::NotFound {
                    collection: collection.to_string(),
                    id: id.to_string(),
                });
            }
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });
        tracing::warn!("❌ Record store request to '{}' failed: {} {}", collection, status, message);
        Err(DirectoryError::ApiError {
            status: status.as_u16(),
            message,
        })
    }
}

/// 解析 `{"error": {"message": ...}}` 或 `{"error": "NOT_FOUND"}`
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("error")? {
        serde_json::Value::String(kind) => Some(kind.clone()),
        serde_json::Value::Object(error) => error
            .get("message")
            .or_else(|| error.get("type"))
            .and_then(|v| v.as_str())
            .map(str::to_string),
        _ => None,
    }
}

#[async_trait]
impl RecordStore for AirtableClient {
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Record> {
        let url = self.collection_url(collection, Some(id));
        tracing::debug!("Fetching record {} from '{}'", id, collection);

        let response = self.send(self.client.get(url), collection, Some(id)).await?;
        Ok(response.json().await?)
    }

    async fn get_all(&self, collection: &str, filter: Option<&str>) -> Result<Vec<Record>> {
        let url = self.collection_url(collection, None);
        let mut records = Vec::new();
        let mut offset: Option<String> = None;

        // 依 offset 逐頁讀取直到沒有下一頁
        loop {
            let mut request = self.client.get(url.clone()).query(&[("pageSize", PAGE_SIZE)]);
            if let Some(filter) = filter {
                request = request.query(&[("filterByFormula", filter)]);
            }
            if let Some(offset) = &offset {
                request = request.query(&[("offset", offset.as_str())]);
            }

            let response = self.send(request, collection, None).await?;
            let page: ListResponse = response.json().await?;
            tracing::debug!(
                "Fetched {} records from '{}' (more pages: {})",
                page.records.len(),
                collection,
                page.offset.is_some()
            );
            records.extend(page.records);

            match page.offset {
                Some(next) if offset.as_deref() == Some(next.as_str()) => {
                    tracing::warn!(
                        "Record store repeated offset {} for '{}', stopping pagination",
                        next,
                        collection
                    );
                    break;
                }
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        Ok(records)
    }

    async fn create_records(
        &self,
        collection: &str,
        records: Vec<NewRecord>,
    ) -> Result<Vec<Record>> {
        let url = self.collection_url(collection, None);
        let mut created = Vec::with_capacity(records.len());

        for chunk in records.chunks(MAX_RECORDS_PER_CREATE) {
            tracing::debug!("Creating {} records in '{}'", chunk.len(), collection);
            let body = serde_json::json!({ "records": chunk });
            let response = self
                .send(self.client.post(url.clone()).json(&body), collection, None)
                .await?;
            let batch: RecordsResponse = response.json().await?;
            created.extend(batch.records);
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url_encodes_names() {
        let config = StoreConfig::new("key", "appBase");
        let client = AirtableClient::new(&config).unwrap();

        assert_eq!(
            client.collection_url("services", Some("recS1")).as_str(),
            "https://api.airtable.com/v0/appBase/services/recS1"
        );
        assert_eq!(
            client.collection_url("Services Lists", None).as_str(),
            "https://api.airtable.com/v0/appBase/Services%20Lists"
        );
    }

    #[test]
    fn test_collection_url_with_root_endpoint() {
        let config = StoreConfig::new("key", "appBase").with_endpoint("http://127.0.0.1:9000/");
        let client = AirtableClient::new(&config).unwrap();
        assert_eq!(
            client.collection_url("services", None).as_str(),
            "http://127.0.0.1:9000/appBase/services"
        );
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(r#"{"error": {"type": "INVALID_FILTER", "message": "bad formula"}}"#),
            Some("bad formula".to_string())
        );
        assert_eq!(
            error_message(r#"{"error": "NOT_FOUND"}"#),
            Some("NOT_FOUND".to_string())
        );
        assert_eq!(error_message("<html>"), None);
    }
}
