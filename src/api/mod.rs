//! HTTP bindings for the two backend services.

pub mod catalog;
pub mod storage;

pub use catalog::CatalogClient;
pub use storage::StorageClient;
