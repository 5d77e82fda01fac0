use crate::app::services_api::ServicesApi;
use crate::core::create_list::CreateListState;
use crate::core::query_cache::{QueryCache, QueryKey};
use crate::domain::model::{CreateServicesListRequest, Service, ServicesList};
use crate::domain::ports::RecordStore;
use crate::utils::error::{DirectoryError, Result};

/// 建立清單頁面的工作階段：基礎服務只抓一次
pub struct CreateListSession<S: RecordStore> {
    api: ServicesApi<S>,
    cache: QueryCache<Vec<Service>>,
    pub state: CreateListState,
}

impl<S: RecordStore> CreateListSession<S> {
    pub fn new(api: ServicesApi<S>) -> Self {
        Self {
            api,
            cache: QueryCache::new(),
            state: CreateListState::new(),
        }
    }

    pub async fn load_base_services(&mut self) -> Result<()> {
        let api = &self.api;
        let result = self
            .cache
            .fetch(QueryKey::new(["allServices"]), || api.get_all_services(None))
            .await;

        match result {
            Ok(services) => {
                tracing::info!("📥 Loaded {} services for list creation", services.len());
                self.state.set_base_services(services);
                Ok(())
            }
            Err(e) => {
                self.state.set_load_failed(e.user_friendly_message());
                Err(e)
            }
        }
    }

    /// 依 id 把基礎集合中的服務加入選取
    pub fn select_by_id(&mut self, service_id: &str) -> Result<()> {
        let service = self
            .state
            .base_services()
            .iter()
            .find(|service| service.id == service_id)
            .cloned()
            .ok_or_else(|| DirectoryError::ValidationError {
                message: format!("Service {} is not in the directory", service_id),
            })?;
        self.state.add_service_to_list(service);
        Ok(())
    }

    pub fn submit(&mut self, status: &str) -> Result<CreateServicesListRequest> {
        self.state.submit(status)
    }

    /// 明確寫入紀錄庫；成功後不更新任何記憶體中的資料
    pub async fn persist(&self, request: CreateServicesListRequest) -> Result<Vec<ServicesList>> {
        self.api.create_services_lists(vec![request]).await
    }
}
