pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{AirtableClient, InMemoryStore};
pub use app::{CreateListSession, ListDataLoader, ServicesApi};
pub use config::{DirectoryConfig, StoreConfig};
pub use core::list_view::{ListState, ListView, LoadStatus};
pub use core::pagination::PageSize;
pub use utils::error::{DirectoryError, Result};
