use crate::domain::model::{
    Address, CreateServicesListRequest, NewRecord, Record, Service, ServicesList, TaxonomyTerm,
};
use crate::domain::ports::RecordStore;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;

pub const SERVICES: &str = "services";
pub const PHYSICAL_ADDRESSES: &str = "physical_addresses";
pub const TAXONOMY_TERMS: &str = "taxonomy_term";
pub const SERVICES_LISTS: &str = "Services Lists";

/// Typed access to the directory's collections.
///
/// A missing record is reported as `None` rather than as an error.
#[derive(Debug, Clone)]
pub struct ServicesApi<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> ServicesApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn find<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<Option<T>> {
        match self.store.get_by_id(collection, id).await {
            Ok(record) => Ok(Some(record.decode()?)),
            Err(e) if e.is_not_found() => {
                tracing::debug!("{}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: Option<&str>,
    ) -> Result<Vec<T>> {
        let records = self.store.get_all(collection, filter).await?;
        records.iter().map(Record::decode).collect()
    }

    pub async fn get_service_list_by_id(&self, id: &str) -> Result<Option<ServicesList>> {
        self.find(SERVICES_LISTS, id).await
    }

    pub async fn get_service_by_id(&self, id: &str) -> Result<Option<Service>> {
        self.find(SERVICES, id).await
    }

    pub async fn get_address_by_id(&self, id: &str) -> Result<Option<Address>> {
        self.find(PHYSICAL_ADDRESSES, id).await
    }

    pub async fn get_all_services_lists(&self, filter: Option<&str>) -> Result<Vec<ServicesList>> {
        self.list(SERVICES_LISTS, filter).await
    }

    pub async fn get_all_taxonomies(&self, filter: Option<&str>) -> Result<Vec<TaxonomyTerm>> {
        self.list(TAXONOMY_TERMS, filter).await
    }

    pub async fn get_all_services(&self, filter: Option<&str>) -> Result<Vec<Service>> {
        self.list(SERVICES, filter).await
    }

    /// 空的批次不送出請求，回傳的 future 永遠不會完成
    pub async fn create_services_lists(
        &self,
        requests: Vec<CreateServicesListRequest>,
    ) -> Result<Vec<ServicesList>> {
        if requests.is_empty() {
            tracing::debug!("Empty create batch for '{}', nothing sent", SERVICES_LISTS);
            return std::future::pending().await;
        }

        let records = requests
            .iter()
            .map(NewRecord::from_fields)
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("📤 Creating {} services lists", records.len());
        let created = self.store.create_records(SERVICES_LISTS, records).await?;
        created.iter().map(Record::decode).collect()
    }
}
