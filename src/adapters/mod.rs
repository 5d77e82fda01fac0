// Adapters layer: concrete record stores behind the `RecordStore` port.

pub mod airtable;
pub mod memory;

pub use airtable::AirtableClient;
pub use memory::InMemoryStore;
