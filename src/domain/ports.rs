use crate::domain::model::{NewRecord, Record};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 以集合名稱與紀錄 id 存取的外部紀錄庫
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 找不到時回傳 `DirectoryError::NotFound`
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Record>;

    /// `filter` 原樣轉交給紀錄庫
    async fn get_all(&self, collection: &str, filter: Option<&str>) -> Result<Vec<Record>>;

    async fn create_records(&self, collection: &str, records: Vec<NewRecord>)
        -> Result<Vec<Record>>;
}

#[async_trait]
impl<T: RecordStore + ?Sized> RecordStore for std::sync::Arc<T> {
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Record> {
        (**self).get_by_id(collection, id).await
    }

    async fn get_all(&self, collection: &str, filter: Option<&str>) -> Result<Vec<Record>> {
        (**self).get_all(collection, filter).await
    }

    async fn create_records(
        &self,
        collection: &str,
        records: Vec<NewRecord>,
    ) -> Result<Vec<Record>> {
        (**self).create_records(collection, records).await
    }
}
