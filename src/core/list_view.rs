//! State behind the list page: what was loaded, and what the user is
//! currently searching, filtering and paging through.

use crate::core::address::{self, AddressIndex};
use crate::core::disclosure::Disclosure;
use crate::core::filter;
use crate::core::pagination::{self, Page, PageSize};
use crate::domain::model::{Address, Coordinates, Service, ServicesList};
use crate::utils::error::{DirectoryError, ErrorSeverity};
use std::collections::HashMap;

/// 清單成員：服務與其連結的地址
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberData {
    pub services: Vec<Service>,
    pub addresses: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ListState {
    pub list_id: String,
    pub status: LoadStatus,
    pub list_name: Option<String>,
    pub services: Vec<Service>,
    pub addresses: Vec<Address>,
    pub address_id_to_service_name: HashMap<String, String>,
    pub default_map_center: Option<Coordinates>,
    /// 載入失敗的嚴重程度；成功或尚未載入時為 None
    pub failure_severity: Option<ErrorSeverity>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedService<'a> {
    pub service: &'a Service,
    pub address: Option<&'a Address>,
}

impl ListState {
    pub fn pending(list_id: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            status: LoadStatus::Loading,
            list_name: None,
            services: Vec::new(),
            addresses: Vec::new(),
            address_id_to_service_name: HashMap::new(),
            default_map_center: None,
            failure_severity: None,
        }
    }

    /// 清單與成員都取得後才算載入完成
    pub fn ready(
        list_id: impl Into<String>,
        list: Option<ServicesList>,
        members: MemberData,
        fallback_center: Option<Coordinates>,
    ) -> Self {
        let default_map_center = address::default_map_center(&members.addresses).or(fallback_center);
        Self {
            list_id: list_id.into(),
            status: LoadStatus::Ready,
            list_name: list.map(|list| list.name),
            address_id_to_service_name: address::address_id_to_service_name(&members.services),
            services: members.services,
            addresses: members.addresses,
            default_map_center,
            failure_severity: None,
        }
    }

    pub fn failed(list_id: impl Into<String>, message: impl Into<String>) -> Self {
        let mut state = Self::pending(list_id);
        state.status = LoadStatus::Failed(message.into());
        state
    }

    /// 失敗狀態，保留錯誤的嚴重程度供 CLI 決定結束碼
    pub fn from_error(list_id: impl Into<String>, error: &DirectoryError) -> Self {
        let mut state = Self::failed(list_id, error.user_friendly_message());
        state.failure_severity = Some(error.severity());
        state
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn num_services(&self) -> usize {
        self.services.len()
    }

    pub fn address_index(&self) -> AddressIndex<'_> {
        AddressIndex::new(&self.addresses)
    }

    pub fn resolved_services(&self) -> Vec<ResolvedService<'_>> {
        let index = self.address_index();
        self.services
            .iter()
            .map(|service| ResolvedService {
                service,
                address: index.get_address(service),
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ListView {
    state: ListState,
    search_query: String,
    taxonomy_filters: Vec<String>,
    page_size: PageSize,
    page_index: usize,
    selected_address: Option<String>,
    pub drawer: Disclosure,
}

impl ListView {
    pub fn new(state: ListState) -> Self {
        Self {
            state,
            search_query: String::new(),
            taxonomy_filters: Vec::new(),
            page_size: PageSize::DEFAULT,
            page_index: 0,
            selected_address: None,
            drawer: Disclosure::new("listDrawer"),
        }
    }

    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// 換成另一份清單時清除所有篩選
    pub fn set_state(&mut self, state: ListState) {
        if state.list_id != self.state.list_id {
            self.search_query.clear();
            self.taxonomy_filters.clear();
            self.selected_address = None;
        }
        self.state = state;
        self.page_index = 0;
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn list_name(&self) -> Option<&str> {
        self.state.list_name.as_deref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        self.page_index = 0;
    }

    pub fn taxonomy_filters(&self) -> &[String] {
        &self.taxonomy_filters
    }

    pub fn set_taxonomy_filters(&mut self, filters: Vec<String>) {
        self.taxonomy_filters = filters;
        self.page_index = 0;
    }

    pub fn toggle_taxonomy(&mut self, tag: &str) {
        if let Some(position) = self.taxonomy_filters.iter().position(|t| t == tag) {
            self.taxonomy_filters.remove(position);
        } else {
            self.taxonomy_filters.push(tag.to_string());
        }
        self.page_index = 0;
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page_index = 0;
    }

    /// 選單選項；"All" 的值是清單的服務總數
    pub fn page_size_options(&self) -> Vec<(String, usize)> {
        PageSize::OPTIONS
            .iter()
            .map(|size| (size.label(), size.resolve(self.state.num_services())))
            .collect()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn set_page(&mut self, page_index: usize) {
        self.page_index = page_index;
    }

    pub fn selected_address(&self) -> Option<&Address> {
        let id = self.selected_address.as_deref()?;
        self.state.address_index().get(id)
    }

    pub fn select_address(&mut self, address_id: Option<String>) {
        self.selected_address = address_id;
    }

    /// 符合文字搜尋的服務
    pub fn visible_services(&self) -> Vec<&Service> {
        filter::text_filter(&self.state.services, &self.search_query)
    }

    pub fn available_taxonomies(&self) -> Vec<String> {
        filter::unique_taxonomies(&self.visible_services())
    }

    pub fn filtered_services(&self) -> Vec<&Service> {
        filter::taxonomy_filter(&self.visible_services(), &self.taxonomy_filters)
    }

    pub fn get_address(&self, service: &Service) -> Option<&Address> {
        self.state.address_index().get_address(service)
    }

    pub fn results(&self) -> ResultsView<'_> {
        let services = self.filtered_services();
        let page_size = self.page_size.resolve(services.len());
        ResultsView {
            services,
            page_size,
            page_index: self.page_index,
        }
    }

    pub fn map(&self) -> MapView<'_> {
        let index = self.state.address_index();
        let addresses = filter::map_addresses(
            &self.filtered_services(),
            &self.taxonomy_filters,
            &index,
            &self.state.addresses,
        );
        MapView {
            default_center: self.state.default_map_center,
            address_labels: &self.state.address_id_to_service_name,
            addresses,
            selected: self.selected_address(),
        }
    }
}

/// 篩選後的結果與目前頁面
#[derive(Debug, Clone)]
pub struct ResultsView<'a> {
    services: Vec<&'a Service>,
    page_size: usize,
    page_index: usize,
}

impl<'a> ResultsView<'a> {
    pub fn page(&self) -> Page<'_, &'a Service> {
        pagination::paginate(&self.services, self.page_size, self.page_index)
    }

    pub fn total(&self) -> usize {
        self.services.len()
    }

    pub fn page_count(&self) -> usize {
        pagination::page_count(self.services.len(), self.page_size)
    }

    pub fn summary(&self) -> String {
        pagination::results_summary(self.page_size, self.services.len())
    }
}

/// 地圖元件需要的資料
#[derive(Debug, Clone)]
pub struct MapView<'a> {
    pub default_center: Option<Coordinates>,
    pub address_labels: &'a HashMap<String, String>,
    pub addresses: Vec<&'a Address>,
    pub selected: Option<&'a Address>,
}
