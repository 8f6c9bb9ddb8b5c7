//! Input dataset loading.

pub mod loader;

pub use loader::{load_records, DatasetError};
