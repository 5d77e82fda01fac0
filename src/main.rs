use anyhow::Context;
use clap::Parser;
use service_directory::app::report::{self, ServiceRow, ServicesListRow, TaxonomyRow};
use service_directory::config::{CliConfig, Command};
use service_directory::core::filter;
use service_directory::domain::ports::RecordStore;
use service_directory::utils::error::ErrorSeverity;
use service_directory::utils::{logger, validation::Validate};
use service_directory::{
    AirtableClient, CreateListSession, DirectoryConfig, DirectoryError, InMemoryStore,
    ListDataLoader, ListView, LoadStatus, ServicesApi, StoreConfig,
};
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("Starting service directory CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(cli).await {
        let exit_code = report_failure(&e);
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

/// 清單頁面已輸出，但載入失敗；保留原錯誤的嚴重程度
#[derive(Debug, thiserror::Error)]
#[error("Loading list {list_id} failed: {message}")]
struct ListLoadFailed {
    list_id: String,
    message: String,
    severity: ErrorSeverity,
}

/// 輸出錯誤並回傳結束碼
fn report_failure(e: &anyhow::Error) -> i32 {
    if let Some(error) = e.downcast_ref::<DirectoryError>() {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            error,
            error.category(),
            error.severity()
        );
        eprintln!("❌ {}", error.user_friendly_message());
        eprintln!("💡 Suggestion: {}", error.recovery_suggestion());
        return error.severity().exit_code();
    }

    if let Some(failed) = e.downcast_ref::<ListLoadFailed>() {
        tracing::error!("❌ {} (Severity: {:?})", failed, failed.severity);
        eprintln!("❌ {}", failed);
        return failed.severity.exit_code();
    }

    tracing::error!("❌ Command failed: {:#}", e);
    eprintln!("❌ {:#}", e);
    1
}

/// 設定來源優先序：--config 檔案，否則環境變數；命令列參數最後覆蓋
fn resolve_config(cli: &CliConfig) -> anyhow::Result<DirectoryConfig> {
    let mut config = match &cli.config {
        Some(path) => DirectoryConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => {
            let store = match StoreConfig::from_env() {
                Ok(store) => store,
                // 命令列可以補上缺少的憑證
                Err(_) if cli.api_key.is_some() && cli.base_id.is_some() => {
                    StoreConfig::new(String::new(), String::new())
                }
                Err(e) => return Err(e.into()),
            };
            DirectoryConfig::new(store)
        }
    };

    if let Some(api_key) = &cli.api_key {
        config.store.api_key = api_key.clone();
    }
    if let Some(base_id) = &cli.base_id {
        config.store.base_id = base_id.clone();
    }
    if let Some(endpoint) = &cli.endpoint {
        config.store.endpoint = endpoint.clone();
    }

    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");
    Ok(config)
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let (store, config): (Arc<dyn RecordStore>, Option<DirectoryConfig>) = match &cli.fixtures {
        Some(path) => {
            tracing::info!("📁 Using fixture records from {}", path);
            let store = InMemoryStore::from_fixture_file(path)
                .with_context(|| format!("Failed to read fixtures '{}'", path))?;
            let config = match &cli.config {
                Some(path) => Some(DirectoryConfig::from_file(path)?),
                None => None,
            };
            let store: Arc<dyn RecordStore> = Arc::new(store);
            (store, config)
        }
        None => {
            let config = resolve_config(&cli)?;
            let client: Arc<dyn RecordStore> = Arc::new(AirtableClient::new(&config.store)?);
            (client, Some(config))
        }
    };

    let api = ServicesApi::new(store);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let format = cli.format;

    match cli.command {
        Command::ShowList {
            list_id,
            query,
            tags,
            page_size,
            page,
            select_address,
        } => {
            let fallback_center = config.as_ref().and_then(|c| c.map.fallback_center);
            let default_page_size = config
                .as_ref()
                .map(|c| c.display.page_size())
                .unwrap_or_default();

            let mut loader = ListDataLoader::new(api).with_fallback_center(fallback_center);
            tracing::info!("🔍 Loading list {}", list_id);
            let state = loader.load(&list_id).await;

            let mut view = ListView::new(state).with_page_size(page_size.unwrap_or(default_page_size));
            view.set_search_query(query);
            view.set_taxonomy_filters(tags);
            view.set_page(page.saturating_sub(1));
            view.select_address(select_address);

            report::write_list_view(&mut out, &view, format)?;
            if let LoadStatus::Failed(message) = &view.state().status {
                out.flush()?;
                return Err(ListLoadFailed {
                    list_id,
                    message: message.clone(),
                    severity: view
                        .state()
                        .failure_severity
                        .unwrap_or(ErrorSeverity::High),
                }
                .into());
            }
        }
        Command::Services { filter: formula, query } => {
            let services = api.get_all_services(formula.as_deref()).await?;
            let visible = filter::text_filter(&services, query.as_deref().unwrap_or(""));
            let rows: Vec<ServiceRow> = visible
                .iter()
                .map(|service| ServiceRow::new(service, None))
                .collect();
            report::write_rows(&mut out, &rows, format)?;
        }
        Command::Lists { filter: formula } => {
            let lists = api.get_all_services_lists(formula.as_deref()).await?;
            let rows: Vec<ServicesListRow> = lists.iter().map(ServicesListRow::from).collect();
            report::write_rows(&mut out, &rows, format)?;
        }
        Command::Taxonomies { filter: formula } => {
            let terms = api.get_all_taxonomies(formula.as_deref()).await?;
            let rows: Vec<TaxonomyRow> = terms.iter().map(TaxonomyRow::from).collect();
            report::write_rows(&mut out, &rows, format)?;
        }
        Command::CreateList {
            name,
            creator,
            description,
            services,
            status,
            dry_run,
        } => {
            let mut session = CreateListSession::new(api);
            session.load_base_services().await?;
            for service_id in &services {
                session.select_by_id(service_id)?;
            }

            session.state.form.name = name;
            session.state.form.creator = creator;
            session.state.form.description = description;
            let request = session.submit(&status)?;

            if dry_run {
                tracing::info!("🔍 DRY RUN MODE - payload not written");
                serde_json::to_writer_pretty(&mut out, &request)?;
                writeln!(out)?;
                return Ok(());
            }

            let created = session.persist(request).await?;
            let rows: Vec<ServicesListRow> = created.iter().map(ServicesListRow::from).collect();
            report::write_rows(&mut out, &rows, format)?;
            writeln!(out, "✅ Created {} list(s)", created.len())?;
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_load_failure_keeps_severity_exit_code() {
        let network = anyhow::Error::new(ListLoadFailed {
            list_id: "recL1".to_string(),
            message: "Could not reach the record store, loading failed".to_string(),
            severity: ErrorSeverity::Medium,
        });
        assert_eq!(report_failure(&network), 2);

        let rejected = anyhow::Error::new(ListLoadFailed {
            list_id: "recL1".to_string(),
            message: "The record store rejected the request".to_string(),
            severity: ErrorSeverity::High,
        });
        assert_eq!(report_failure(&rejected), 1);
    }

    #[test]
    fn test_directory_errors_map_to_severity_exit_code() {
        let missing = anyhow::Error::new(DirectoryError::MissingConfigError {
            field: "RESOURCES_API_KEY".to_string(),
        });
        assert_eq!(report_failure(&missing), 3);

        let context = anyhow::Error::new(DirectoryError::ApiError {
            status: 422,
            message: "bad formula".to_string(),
        })
        .context("Listing services");
        assert_eq!(report_failure(&context), 1);

        assert_eq!(report_failure(&anyhow::anyhow!("plain failure")), 1);
    }
}
