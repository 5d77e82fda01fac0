use httpmock::prelude::*;
use serde_json::json;
use service_directory::utils::error::ErrorSeverity;
use service_directory::{
    AirtableClient, ListDataLoader, ListView, LoadStatus, PageSize, ServicesApi, StoreConfig,
};

fn client(server: &MockServer) -> AirtableClient {
    let config = StoreConfig::new("test-key", "appTest").with_endpoint(server.url("/v0"));
    AirtableClient::new(&config).unwrap()
}

fn mock_service(server: &MockServer, id: &str, name: &str, tags: &[&str], address: Option<&str>) {
    let path = format!("/v0/appTest/services/{}", id);
    let address: Vec<&str> = address.into_iter().collect();
    let body = json!({
        "id": id,
        "fields": {
            "name": name,
            "description": format!("{} description", name),
            "taxonomyString": tags,
            "address": address
        }
    });
    server.mock(|when, then| {
        when.method(GET).path(path);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    });
}

fn mock_address(server: &MockServer, id: &str, latitude: f64, longitude: f64) {
    let path = format!("/v0/appTest/physical_addresses/{}", id);
    let body = json!({
        "id": id,
        "fields": {
            "latitude": latitude,
            "longitude": longitude,
            "address_1": format!("{} Main St", id),
            "city": "Seattle"
        }
    });
    server.mock(|when, then| {
        when.method(GET).path(path);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    });
}

/// 七個服務，其中兩個共用同一個地址
fn directory(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path_contains("/recL1");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "id": "recL1",
                "fields": {
                    "name": "Downtown Resources",
                    "Services": ["recS1", "recS2", "recS3", "recS4", "recS5", "recS6", "recS7"]
                }
            }));
    });

    mock_service(server, "recS1", "Food Bank", &["food", "emergency"], Some("recA1"));
    mock_service(server, "recS2", "Community Pantry", &["food"], Some("recA1"));
    mock_service(server, "recS3", "Night Shelter", &["housing", "emergency"], Some("recA2"));
    mock_service(server, "recS4", "Legal Aid", &["legal"], Some("recA3"));
    mock_service(server, "recS5", "Tenant Hotline", &["housing", "legal"], None);
    mock_service(server, "recS6", "Free Clinic", &["health"], Some("recA4"));
    mock_service(server, "recS7", "Dental Van", &["health"], Some("recA5"));

    mock_address(server, "recA1", 47.0, -122.0);
    mock_address(server, "recA2", 48.0, -121.0);
    mock_address(server, "recA3", 47.0, -122.0);
    mock_address(server, "recA4", 49.0, -123.0);
    mock_address(server, "recA5", 44.0, -122.0);
}

#[tokio::test]
async fn test_list_page_end_to_end() {
    let server = MockServer::start();
    directory(&server);

    let mut loader = ListDataLoader::new(ServicesApi::new(client(&server)));
    let state = loader.load("recL1").await;

    assert_eq!(state.status, LoadStatus::Ready);
    assert_eq!(state.list_name.as_deref(), Some("Downtown Resources"));
    assert_eq!(state.num_services(), 7);
    assert_eq!(state.addresses.len(), 5);
    assert_eq!(state.address_id_to_service_name["recA1"], "Food Bank");

    let center = state.default_map_center.unwrap();
    assert!((center.latitude - 47.0).abs() < 1e-9);
    assert!((center.longitude + 122.0).abs() < 1e-9);

    let mut view = ListView::new(state);
    assert_eq!(view.page_size(), PageSize::Fixed(5));

    let results = view.results();
    assert_eq!(results.page().len(), 5);
    assert_eq!(results.page_count(), 2);
    assert_eq!(results.summary(), "Showing 5 out of 7 results.");
    assert_eq!(
        view.available_taxonomies(),
        vec!["food", "emergency", "housing", "legal", "health"]
    );
    // 沒有標籤篩選時地圖顯示全部地址
    assert_eq!(view.map().addresses.len(), 5);

    view.set_page(1);
    let names: Vec<String> = view
        .results()
        .page()
        .iter()
        .map(|service| service.name.clone())
        .collect();
    assert_eq!(names, vec!["Free Clinic", "Dental Van"]);

    view.set_search_query("PANTRY");
    let results = view.results();
    assert_eq!(results.summary(), "Showing 1 out of 1 results.");
    assert_eq!(results.page().index(), 0);
    assert_eq!(view.available_taxonomies(), vec!["food"]);

    view.set_search_query("");
    view.set_taxonomy_filters(vec!["food".to_string()]);
    assert_eq!(view.results().total(), 2);
    let map = view.map();
    let address_ids: Vec<&str> = map.addresses.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(address_ids, vec!["recA1"]);
}

#[tokio::test]
async fn test_list_page_failure_is_reported_in_state() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path_contains("/recL1");
        then.status(500)
            .header("Content-Type", "application/json")
            .json_body(json!({"error": {"type": "SERVER_ERROR", "message": "Try again later"}}));
    });

    let mut loader = ListDataLoader::new(ServicesApi::new(client(&server)));
    let state = loader.load("recL1").await;

    assert!(matches!(state.status, LoadStatus::Failed(_)));
    assert!(state.services.is_empty());
    assert!(state.default_map_center.is_none());
    assert_eq!(state.failure_severity, Some(ErrorSeverity::High));
    assert_eq!(state.failure_severity.map(|s| s.exit_code()), Some(1));

    let view = ListView::new(state);
    assert_eq!(view.results().summary(), "Showing 0 out of 0 results.");
    assert!(view.map().addresses.is_empty());
}

#[tokio::test]
async fn test_unreachable_store_fails_with_network_severity() {
    let config = StoreConfig::new("test-key", "appTest").with_endpoint("http://127.0.0.1:1/v0");
    let client = AirtableClient::new(&config).unwrap();

    let mut loader = ListDataLoader::new(ServicesApi::new(client));
    let state = loader.load("recL1").await;

    assert_eq!(
        state.status,
        LoadStatus::Failed("Could not reach the record store, loading failed".to_string())
    );
    assert!(state.services.is_empty());
    assert!(state.addresses.is_empty());
    assert_eq!(state.failure_severity, Some(ErrorSeverity::Medium));
    // 與其他指令的網路錯誤使用相同結束碼
    assert_eq!(state.failure_severity.map(|s| s.exit_code()), Some(2));

    let view = ListView::new(state);
    assert!(!view.is_loading());
    assert_eq!(view.results().summary(), "Showing 0 out of 0 results.");
}
