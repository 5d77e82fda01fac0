use crate::core::disclosure::Disclosure;
use crate::core::filter;
use crate::domain::model::{CreateServicesListRequest, Service};
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::Validate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const FIELD_REQUIRED_MESSAGE: &str = "Cannot be blank";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Creator,
    Description,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Creator, FormField::Description];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Creator => "creator",
            FormField::Description => "description",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateListForm {
    pub name: String,
    pub creator: String,
    pub description: String,
}

impl CreateListForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Creator => &self.creator,
            FormField::Description => &self.description,
        }
    }

    pub fn validate_field(&self, field: FormField) -> Option<&'static str> {
        if self.value(field).trim().is_empty() {
            Some(FIELD_REQUIRED_MESSAGE)
        } else {
            None
        }
    }

    pub fn field_errors(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        for field in FormField::ALL {
            errors.set(field, self.validate_field(field));
        }
        errors
    }
}

impl Validate for CreateListForm {
    fn validate(&self) -> Result<()> {
        let errors = self.field_errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into_error())
        }
    }
}

/// 各欄位的錯誤訊息，顯示在欄位旁
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub name: Option<&'static str>,
    pub creator: Option<&'static str>,
    pub description: Option<&'static str>,
}

impl FormErrors {
    pub fn get(&self, field: FormField) -> Option<&'static str> {
        match field {
            FormField::Name => self.name,
            FormField::Creator => self.creator,
            FormField::Description => self.description,
        }
    }

    fn set(&mut self, field: FormField, error: Option<&'static str>) {
        match field {
            FormField::Name => self.name = error,
            FormField::Creator => self.creator = error,
            FormField::Description => self.description = error,
        }
    }

    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|field| self.get(*field).is_none())
    }

    fn into_error(self) -> DirectoryError {
        let message = FormField::ALL
            .iter()
            .filter_map(|field| self.get(*field).map(|msg| format!("{}: {}", field.as_str(), msg)))
            .collect::<Vec<_>>()
            .join("; ");
        DirectoryError::ValidationError { message }
    }
}

/// State of the create-list page.
///
/// `base_services` is the unfiltered set fetched once per session,
/// `services` the working set of potential members shown in the drawer,
/// and `selected` the user's picks in the order they were added.
#[derive(Debug, Clone)]
pub struct CreateListState {
    is_loading: bool,
    load_error: Option<String>,
    base_services: Vec<Service>,
    services: Vec<Service>,
    selected: IndexMap<String, Service>,
    pub alert: Disclosure,
    pub drawer: Disclosure,
    pub form: CreateListForm,
    errors: FormErrors,
}

impl Default for CreateListState {
    fn default() -> Self {
        Self::new()
    }
}

impl CreateListState {
    pub fn new() -> Self {
        Self {
            is_loading: true,
            load_error: None,
            base_services: Vec::new(),
            services: Vec::new(),
            selected: IndexMap::new(),
            alert: Disclosure::new("createListAlert"),
            drawer: Disclosure::new("createListDrawer"),
            form: CreateListForm::default(),
            errors: FormErrors::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn set_base_services(&mut self, services: Vec<Service>) {
        self.services = services.clone();
        self.base_services = services;
        self.is_loading = false;
        self.load_error = None;
    }

    pub fn set_load_failed(&mut self, message: impl Into<String>) {
        self.is_loading = false;
        self.load_error = Some(message.into());
    }

    pub fn base_services(&self) -> &[Service] {
        &self.base_services
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn set_services(&mut self, services: Vec<Service>) {
        self.services = services;
    }

    /// 以文字搜尋從基礎集合重新篩選工作集合
    pub fn search_services(&mut self, query: &str) {
        self.services = filter::text_filter(&self.base_services, query)
            .into_iter()
            .cloned()
            .collect();
    }

    pub fn selected_services(&self) -> &IndexMap<String, Service> {
        &self.selected
    }

    pub fn is_selected(&self, service_id: &str) -> bool {
        self.selected.contains_key(service_id)
    }

    /// 已存在的 id 保留原位置，只更新內容
    pub fn add_service_to_list(&mut self, service: Service) {
        self.selected.insert(service.id.clone(), service);
    }

    pub fn remove_service_from_list(&mut self, service_id: &str) -> Option<Service> {
        self.selected.shift_remove(service_id)
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// 離開欄位時只驗證該欄位
    pub fn blur_field(&mut self, field: FormField) {
        let error = self.form.validate_field(field);
        self.errors.set(field, error);
    }

    /// 驗證表單並產生送出的資料；目前只記錄，不寫入紀錄庫
    pub fn submit(&mut self, status: &str) -> Result<CreateServicesListRequest> {
        self.errors = self.form.field_errors();
        if !self.errors.is_empty() {
            tracing::debug!("Create list form has blank fields: {:?}", self.errors);
            return Err(self.errors.clone().into_error());
        }

        let request = CreateServicesListRequest {
            name: self.form.name.trim().to_string(),
            description: self.form.description.trim().to_string(),
            status: status.to_string(),
            services: self.selected.keys().cloned().collect(),
            creator: self.form.creator.trim().to_string(),
        };
        tracing::info!("📝 Create list submitted: {:?}", request);
        Ok(request)
    }
}
