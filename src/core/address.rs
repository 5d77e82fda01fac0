use crate::domain::model::{Address, Coordinates, Service};
use std::collections::HashMap;

/// 地址 id 索引；同一 id 出現多次視為無法解析
#[derive(Debug, Clone)]
pub struct AddressIndex<'a> {
    by_id: HashMap<&'a str, Option<&'a Address>>,
}

impl<'a> AddressIndex<'a> {
    pub fn new(addresses: &'a [Address]) -> Self {
        let mut by_id: HashMap<&'a str, Option<&'a Address>> = HashMap::new();
        for address in addresses {
            by_id
                .entry(address.id.as_str())
                .and_modify(|slot| *slot = None)
                .or_insert(Some(address));
        }
        Self { by_id }
    }

    pub fn get(&self, address_id: &str) -> Option<&'a Address> {
        self.by_id.get(address_id).copied().flatten()
    }

    /// 服務沒有連結，或連結不能對應到唯一地址時回傳 None
    pub fn get_address(&self, service: &Service) -> Option<&'a Address> {
        service.address_id().and_then(|id| self.get(id))
    }
}

/// 預設地圖中心：所有具座標地址的算術平均
pub fn default_map_center(addresses: &[Address]) -> Option<Coordinates> {
    let points: Vec<Coordinates> = addresses.iter().filter_map(Address::coordinates).collect();
    if points.is_empty() {
        return None;
    }

    let count = points.len() as f64;
    let (lat_sum, lng_sum) = points.iter().fold((0.0, 0.0), |(lat, lng), point| {
        (lat + point.latitude, lng + point.longitude)
    });
    Some(Coordinates {
        latitude: lat_sum / count,
        longitude: lng_sum / count,
    })
}

/// 地圖標籤用：地址 id 對應到第一個連結它的服務名稱
pub fn address_id_to_service_name(services: &[Service]) -> HashMap<String, String> {
    let mut labels = HashMap::new();
    for service in services {
        if let Some(address_id) = service.address_id() {
            labels
                .entry(address_id.to_string())
                .or_insert_with(|| service.name.clone());
        }
    }
    labels
}
