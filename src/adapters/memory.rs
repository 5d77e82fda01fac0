use crate::domain::model::{NewRecord, Record};
use crate::domain::ports::RecordStore;
use crate::utils::error::{DirectoryError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// 記憶體內的紀錄庫，用於離線資料與測試
#[derive(Debug, Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, Vec<Record>>>,
    next_id: AtomicU64,
    requests: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(self, collection: &str, records: Vec<Record>) -> Self {
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .extend(records);
        self
    }

    /// 讀取 `{"collection": [record, ...]}` 格式的 JSON 檔
    pub fn from_fixture_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_fixture_str(&content)
    }

    pub fn from_fixture_str(content: &str) -> Result<Self> {
        let collections: HashMap<String, Vec<Record>> = serde_json::from_str(content)?;
        tracing::debug!("Loaded fixture with {} collections", collections.len());
        Ok(Self {
            collections: Mutex::new(collections),
            ..Self::default()
        })
    }

    pub fn records(&self, collection: &str) -> Vec<Record> {
        self.lock().get(collection).cloned().unwrap_or_default()
    }

    /// 目前為止收到的請求數
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Record>>> {
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn track_request(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Record> {
        self.track_request();
        self.lock()
            .get(collection)
            .and_then(|records| records.iter().find(|record| record.id == id))
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
    }

    async fn get_all(&self, collection: &str, filter: Option<&str>) -> Result<Vec<Record>> {
        self.track_request();
        if let Some(filter) = filter {
            tracing::warn!(
                "In-memory store does not evaluate filter formulas, returning all of '{}' (filter: {})",
                collection,
                filter
            );
        }
        Ok(self.records(collection))
    }

    async fn create_records(
        &self,
        collection: &str,
        records: Vec<NewRecord>,
    ) -> Result<Vec<Record>> {
        self.track_request();
        let created: Vec<Record> = records
            .into_iter()
            .map(|record| {
                let sequence = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                Record {
                    id: format!("recMem{:06}", sequence),
                    created_time: Some(Utc::now()),
                    fields: record.fields,
                }
            })
            .collect();

        self.lock()
            .entry(collection.to_string())
            .or_default()
            .extend(created.iter().cloned());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIXTURE: &str = r#"{
        "services": [
            {"id": "recS1", "createdTime": "2024-01-05T10:00:00.000Z", "fields": {"name": "Food Bank"}},
            {"id": "recS2", "fields": {"name": "Clinic"}}
        ]
    }"#;

    #[tokio::test]
    async fn test_fixture_lookup() {
        let store = InMemoryStore::from_fixture_str(FIXTURE).unwrap();

        let record = store.get_by_id("services", "recS2").await.unwrap();
        assert_eq!(record.fields["name"], json!("Clinic"));

        let err = store.get_by_id("services", "recS9").await.unwrap_err();
        assert!(err.is_not_found());
        let err = store.get_by_id("physical_addresses", "recA1").await.unwrap_err();
        assert!(err.is_not_found());

        assert_eq!(store.get_all("services", None).await.unwrap().len(), 2);
        assert_eq!(
            store
                .get_all("services", Some("{name} = 'Clinic'"))
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(store.request_count(), 5);
    }

    #[tokio::test]
    async fn test_create_assigns_ids() {
        let store = InMemoryStore::new();
        let mut fields = serde_json::Map::new();
        fields.insert("name".to_string(), json!("Mine"));

        let created = store
            .create_records("Services Lists", vec![NewRecord { fields: fields.clone() }, NewRecord { fields }])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);
        assert!(created[0].id.starts_with("rec"));
        assert_eq!(store.records("Services Lists").len(), 2);
    }
}
