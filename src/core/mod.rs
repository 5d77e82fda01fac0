pub mod address;
pub mod create_list;
pub mod disclosure;
pub mod filter;
pub mod list_view;
pub mod pagination;
pub mod query_cache;

pub use crate::domain::model::{Address, Record, Service, ServicesList, TaxonomyTerm};
pub use crate::domain::ports::RecordStore;
pub use crate::utils::error::Result;
