//! Jobfeed Store - deduplicating JSON file storage for vacancies.
//!
//! - [`file_store`] - the [`JsonFileStore`] backend and its [`StorageRoot`]

pub mod file_store;

pub use file_store::{JsonFileStore, ReadStatus, StorageRoot, StoreContents};
