use crate::utils::error::{DirectoryError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 紀錄庫回傳的原始紀錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "createdTime", default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            created_time: None,
            fields,
        }
    }

    /// 將 `id` 併入欄位後解析成型別化實體
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut object = self.fields.clone();
        object.insert("id".to_string(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(object))?)
    }
}

/// 尚未寫入的紀錄，只有欄位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub fields: Map<String, Value>,
}

impl NewRecord {
    pub fn from_fields<T: Serialize>(fields: &T) -> Result<Self> {
        match serde_json::to_value(fields)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(DirectoryError::ValidationError {
                message: format!("Record fields must be a JSON object, got {}", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "taxonomyString", default)]
    pub taxonomies: Vec<String>,
    /// 連結的地址紀錄，只採用第一筆
    #[serde(rename = "address", default)]
    pub address_ids: Vec<String>,
}

impl Service {
    pub fn address_id(&self) -> Option<&str> {
        self.address_ids.first().map(String::as_str)
    }

    pub fn has_any_taxonomy(&self, selected: &[String]) -> bool {
        selected.iter().any(|tag| self.taxonomies.contains(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub address_1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state_province: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl Address {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        let parts: Vec<&str> = [
            &self.address_1,
            &self.city,
            &self.state_province,
            &self.postal_code,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

        if parts.is_empty() {
            self.id.clone()
        } else {
            parts.join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicesList {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "Services", default)]
    pub services: Vec<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyTerm {
    pub id: String,
    #[serde(rename = "term", default)]
    pub label: String,
}

pub const DEFAULT_LIST_STATUS: &str = "Draft";

/// 建立清單時送出的欄位
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateServicesListRequest {
    pub name: String,
    pub description: String,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Services")]
    pub services: Vec<String>,
    pub creator: String,
}
