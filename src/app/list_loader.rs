use crate::app::services_api::ServicesApi;
use crate::core::list_view::{ListState, MemberData};
use crate::core::query_cache::{QueryCache, QueryKey};
use crate::domain::model::{Coordinates, ServicesList};
use crate::domain::ports::RecordStore;
use crate::utils::error::Result;
use std::collections::HashSet;

fn list_key(list_id: &str) -> QueryKey {
    QueryKey::new(["serviceList", list_id])
}

fn members_key(list_id: &str) -> QueryKey {
    QueryKey::new(["listServices", list_id])
}

/// Loads a services list with its member services and their addresses.
///
/// Results are cached per list id. Switching to another list drops the
/// previous list's entries; `refresh` drops the current ones and reloads.
pub struct ListDataLoader<S: RecordStore> {
    api: ServicesApi<S>,
    lists: QueryCache<Option<ServicesList>>,
    members: QueryCache<MemberData>,
    current: Option<String>,
    fallback_center: Option<Coordinates>,
}

impl<S: RecordStore> ListDataLoader<S> {
    pub fn new(api: ServicesApi<S>) -> Self {
        Self {
            api,
            lists: QueryCache::new(),
            members: QueryCache::new(),
            current: None,
            fallback_center: None,
        }
    }

    pub fn with_fallback_center(mut self, center: Option<Coordinates>) -> Self {
        self.fallback_center = center;
        self
    }

    pub fn api(&self) -> &ServicesApi<S> {
        &self.api
    }

    pub fn current_list_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// 載入失敗時回傳 `Failed` 狀態與空資料，不會回傳錯誤
    pub async fn load(&mut self, list_id: &str) -> ListState {
        if self.current.as_deref() != Some(list_id) {
            if let Some(previous) = self.current.take() {
                self.invalidate(&previous);
            }
            self.current = Some(list_id.to_string());
        }

        match self.try_load(list_id).await {
            Ok((list, members)) => {
                tracing::info!(
                    "📋 Loaded list {} with {} services and {} addresses",
                    list_id,
                    members.services.len(),
                    members.addresses.len()
                );
                ListState::ready(list_id, list, members, self.fallback_center)
            }
            Err(e) => {
                tracing::error!("❌ Loading list {} failed: {}", list_id, e);
                ListState::from_error(list_id, &e)
            }
        }
    }

    pub async fn refresh(&mut self) -> Option<ListState> {
        let list_id = self.current.clone()?;
        self.invalidate(&list_id);
        Some(self.load(&list_id).await)
    }

    pub async fn try_load(&mut self, list_id: &str) -> Result<(Option<ServicesList>, MemberData)> {
        let api = &self.api;

        let list = self
            .lists
            .fetch(list_key(list_id), || api.get_service_list_by_id(list_id))
            .await?;
        if list.is_none() {
            tracing::warn!("Services list {} not found", list_id);
        }

        let member_ids = list
            .as_ref()
            .map(|list| list.services.clone())
            .unwrap_or_default();
        let members = self
            .members
            .fetch(members_key(list_id), || fetch_members(api, member_ids))
            .await?;

        Ok((list, members))
    }

    fn invalidate(&mut self, list_id: &str) {
        self.lists.invalidate(&list_key(list_id));
        self.members.invalidate(&members_key(list_id));
    }
}

/// 依清單順序取得服務，再取得不重複的連結地址；找不到的略過
async fn fetch_members<S: RecordStore>(
    api: &ServicesApi<S>,
    member_ids: Vec<String>,
) -> Result<MemberData> {
    let mut services = Vec::with_capacity(member_ids.len());
    for id in &member_ids {
        match api.get_service_by_id(id).await? {
            Some(service) => services.push(service),
            None => tracing::warn!("Service {} listed but not found, skipping", id),
        }
    }

    let mut seen = HashSet::new();
    let mut addresses = Vec::new();
    for address_id in services.iter().filter_map(|service| service.address_id()) {
        if !seen.insert(address_id.to_string()) {
            continue;
        }
        match api.get_address_by_id(address_id).await? {
            Some(address) => addresses.push(address),
            None => tracing::warn!("Address {} not found, service shown without a pin", address_id),
        }
    }

    Ok(MemberData {
        services,
        addresses,
    })
}
