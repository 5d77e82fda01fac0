use crate::core::list_view::{ListView, LoadStatus};
use crate::domain::model::{Address, Coordinates, Service, ServicesList, TaxonomyTerm};
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// 表格輸出需要的欄位
pub trait TableRow: Serialize {
    fn headers() -> &'static [&'static str];
    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceRow {
    pub id: String,
    pub name: String,
    pub taxonomies: String,
    pub address: String,
}

impl ServiceRow {
    pub fn new(service: &Service, address: Option<&Address>) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            taxonomies: service.taxonomies.join("; "),
            address: address.map(Address::label).unwrap_or_default(),
        }
    }
}

impl TableRow for ServiceRow {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "TAXONOMIES", "ADDRESS"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.taxonomies.clone(),
            self.address.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressRow {
    pub id: String,
    pub label: String,
    pub service: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AddressRow {
    pub fn new(address: &Address, labels: &HashMap<String, String>) -> Self {
        Self {
            id: address.id.clone(),
            label: address.label(),
            service: labels.get(&address.id).cloned().unwrap_or_default(),
            latitude: address.latitude,
            longitude: address.longitude,
        }
    }
}

impl TableRow for AddressRow {
    fn headers() -> &'static [&'static str] {
        &["ID", "SERVICE", "ADDRESS", "LAT", "LNG"]
    }

    fn cells(&self) -> Vec<String> {
        let coordinate = |value: Option<f64>| value.map(|v| format!("{:.5}", v)).unwrap_or_default();
        vec![
            self.id.clone(),
            self.service.clone(),
            self.label.clone(),
            coordinate(self.latitude),
            coordinate(self.longitude),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicesListRow {
    pub id: String,
    pub name: String,
    pub status: String,
    pub creator: String,
    pub services: usize,
}

impl From<&ServicesList> for ServicesListRow {
    fn from(list: &ServicesList) -> Self {
        Self {
            id: list.id.clone(),
            name: list.name.clone(),
            status: list.status.clone().unwrap_or_default(),
            creator: list.creator.clone().unwrap_or_default(),
            services: list.services.len(),
        }
    }
}

impl TableRow for ServicesListRow {
    fn headers() -> &'static [&'static str] {
        &["ID", "NAME", "STATUS", "CREATOR", "SERVICES"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.status.clone(),
            self.creator.clone(),
            self.services.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonomyRow {
    pub id: String,
    pub term: String,
}

impl From<&TaxonomyTerm> for TaxonomyRow {
    fn from(term: &TaxonomyTerm) -> Self {
        Self {
            id: term.id.clone(),
            term: term.label.clone(),
        }
    }
}

impl TableRow for TaxonomyRow {
    fn headers() -> &'static [&'static str] {
        &["ID", "TERM"]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.id.clone(), self.term.clone()]
    }
}

pub fn write_rows<W: Write, R: TableRow>(out: &mut W, rows: &[R], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => write_table(out, rows),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
            Ok(())
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn write_table<W: Write, R: TableRow>(out: &mut W, rows: &[R]) -> Result<()> {
    let headers = R::headers();
    let cells: Vec<Vec<String>> = rows.iter().map(TableRow::cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |values: Vec<&str>| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| format!("{:<width$}", value, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(out, "{}", render(headers.to_vec()))?;
    for row in &cells {
        writeln!(out, "{}", render(row.iter().map(String::as_str).collect()))?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct MapReport {
    default_center: Option<Coordinates>,
    addresses: Vec<AddressRow>,
    selected: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListReport {
    list_id: String,
    list_name: Option<String>,
    search_query: String,
    available_taxonomies: Vec<String>,
    selected_taxonomies: Vec<String>,
    page: usize,
    page_count: usize,
    summary: String,
    services: Vec<ServiceRow>,
    map: MapReport,
}

/// 輸出清單頁面：目前頁面的服務、結果摘要與地圖資料
pub fn write_list_view<W: Write>(out: &mut W, view: &ListView, format: OutputFormat) -> Result<()> {
    let results = view.results();
    let rows: Vec<ServiceRow> = results
        .page()
        .iter()
        .map(|service| ServiceRow::new(service, view.get_address(service)))
        .collect();

    match format {
        OutputFormat::Csv => write_rows(out, &rows, format),
        OutputFormat::Json => {
            let map = view.map();
            let report = ListReport {
                list_id: view.state().list_id.clone(),
                list_name: view.list_name().map(str::to_string),
                search_query: view.search_query().to_string(),
                available_taxonomies: view.available_taxonomies(),
                selected_taxonomies: view.taxonomy_filters().to_vec(),
                page: results.page().index() + 1,
                page_count: results.page_count(),
                summary: results.summary(),
                services: rows,
                map: MapReport {
                    default_center: map.default_center,
                    addresses: map
                        .addresses
                        .iter()
                        .map(|address| AddressRow::new(address, map.address_labels))
                        .collect(),
                    selected: map.selected.map(|address| address.id.clone()),
                },
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
            Ok(())
        }
        OutputFormat::Table => {
            if let LoadStatus::Failed(message) = &view.state().status {
                writeln!(out, "Loading failed: {}", message)?;
                return Ok(());
            }

            writeln!(out, "{}", view.list_name().unwrap_or("(list not found)"))?;
            let taxonomies = view.available_taxonomies();
            if !taxonomies.is_empty() {
                writeln!(out, "Filter by: {}", taxonomies.join(", "))?;
            }
            writeln!(out)?;
            write_table(out, &rows)?;
            writeln!(out)?;
            writeln!(
                out,
                "{} (page {} of {})",
                results.summary(),
                results.page().index() + 1,
                results.page_count().max(1)
            )?;

            let map = view.map();
            writeln!(out)?;
            match map.default_center {
                Some(center) => writeln!(
                    out,
                    "Map center: {:.5}, {:.5}",
                    center.latitude, center.longitude
                )?,
                None => writeln!(out, "Map center: none")?,
            }
            let addresses: Vec<AddressRow> = map
                .addresses
                .iter()
                .map(|address| AddressRow::new(address, map.address_labels))
                .collect();
            write_table(out, &addresses)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::list_view::{ListState, MemberData};

    fn view() -> ListView {
        let services = vec![
            Service {
                id: "recS1".to_string(),
                name: "Food Bank".to_string(),
                description: String::new(),
                taxonomies: vec!["food".to_string(), "emergency".to_string()],
                address_ids: vec!["recA1".to_string()],
            },
            Service {
                id: "recS2".to_string(),
                name: "Legal Aid".to_string(),
                description: String::new(),
                taxonomies: vec!["legal".to_string()],
                address_ids: vec![],
            },
        ];
        let addresses = vec![Address {
            id: "recA1".to_string(),
            latitude: Some(47.6),
            longitude: Some(-122.3),
            address_1: Some("12 Pine St".to_string()),
            city: Some("Seattle".to_string()),
            state_province: None,
            postal_code: None,
        }];
        let list = ServicesList {
            id: "recL1".to_string(),
            name: "Downtown".to_string(),
            description: String::new(),
            services: vec![],
            status: None,
            creator: None,
        };
        ListView::new(ListState::ready(
            "recL1",
            Some(list),
            MemberData {
                services,
                addresses,
            },
            None,
        ))
    }

    fn render(view: &ListView, format: OutputFormat) -> String {
        let mut out = Vec::new();
        write_list_view(&mut out, view, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_output() {
        let text = render(&view(), OutputFormat::Table);
        assert!(text.starts_with("Downtown\n"));
        assert!(text.contains("Filter by: food, emergency, legal"));
        assert!(text.contains("12 Pine St, Seattle"));
        assert!(text.contains("Showing 2 out of 2 results. (page 1 of 1)"));
        assert!(text.contains("Map center: 47.60000, -122.30000"));
    }

    #[test]
    fn test_csv_output_has_header_and_rows() {
        let text = render(&view(), OutputFormat::Csv);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,name,taxonomies,address");
        assert_eq!(lines[1], "recS1,Food Bank,food; emergency,\"12 Pine St, Seattle\"");
        assert_eq!(lines[2], "recS2,Legal Aid,legal,");
    }

    #[test]
    fn test_json_output() {
        let mut view = view();
        view.set_taxonomy_filters(vec!["legal".to_string()]);
        let report: serde_json::Value =
            serde_json::from_str(&render(&view, OutputFormat::Json)).unwrap();

        assert_eq!(report["list_name"], "Downtown");
        assert_eq!(report["summary"], "Showing 1 out of 1 results.");
        assert_eq!(report["services"][0]["id"], "recS2");
        // legal 服務沒有地址，地圖沒有點
        assert_eq!(report["map"]["addresses"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_failed_state_table() {
        let view = ListView::new(ListState::failed("recL1", "Could not reach the record store"));
        let text = render(&view, OutputFormat::Table);
        assert_eq!(text, "Loading failed: Could not reach the record store\n");
    }

    #[test]
    fn test_write_rows_table_alignment() {
        let rows = vec![
            TaxonomyRow {
                id: "recT1".to_string(),
                term: "food".to_string(),
            },
            TaxonomyRow {
                id: "recT22".to_string(),
                term: "housing".to_string(),
            },
        ];
        let mut out = Vec::new();
        write_rows(&mut out, &rows, OutputFormat::Table).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "ID      TERM\nrecT1   food\nrecT22  housing\n");
    }
}
