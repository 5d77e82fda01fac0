//! Text search and taxonomy filtering over loaded services.
//!
//! The two filters compose by logical AND: `text_filter` narrows the visible
//! set, `taxonomy_filter` narrows it further. An empty query or an empty tag
//! selection is a pass-through.

use crate::core::address::AddressIndex;
use crate::domain::model::{Address, Service};
use std::collections::HashSet;

/// 名稱或描述包含查詢字串（不分大小寫）
pub fn matches_query(service: &Service, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    service.name.to_lowercase().contains(&needle)
        || service.description.to_lowercase().contains(&needle)
}

pub fn text_filter<'a, I>(services: I, query: &str) -> Vec<&'a Service>
where
    I: IntoIterator<Item = &'a Service>,
{
    services
        .into_iter()
        .filter(|service| matches_query(service, query))
        .collect()
}

pub fn taxonomy_filter<'a>(services: &[&'a Service], selected: &[String]) -> Vec<&'a Service> {
    if selected.is_empty() {
        return services.to_vec();
    }
    services
        .iter()
        .copied()
        .filter(|service| service.has_any_taxonomy(selected))
        .collect()
}

/// 目前可見服務的所有分類，依首次出現順序且不重複
pub fn unique_taxonomies(services: &[&Service]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut taxonomies = Vec::new();
    for service in services {
        for tag in &service.taxonomies {
            if seen.insert(tag.as_str()) {
                taxonomies.push(tag.clone());
            }
        }
    }
    taxonomies
}

/// Addresses to pin on the map.
///
/// With an active taxonomy selection only the addresses of the filtered
/// services are returned, deduplicated by address id. Without one the whole
/// loaded address set is returned, whatever the text query.
pub fn map_addresses<'a>(
    filtered: &[&Service],
    selected: &[String],
    index: &AddressIndex<'a>,
    all_addresses: &'a [Address],
) -> Vec<&'a Address> {
    if selected.is_empty() {
        return all_addresses.iter().collect();
    }

    let mut seen = HashSet::new();
    filtered
        .iter()
        .filter_map(|service| index.get_address(service))
        .filter(|address| seen.insert(address.id.clone()))
        .collect()
}
