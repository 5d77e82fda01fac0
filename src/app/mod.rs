// Application layer: use cases wired on top of the record store port.

pub mod list_creation;
pub mod list_loader;
pub mod report;
pub mod services_api;

pub use list_creation::CreateListSession;
pub use list_loader::ListDataLoader;
pub use services_api::ServicesApi;
