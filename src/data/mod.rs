//! Data module - CSV loading, cleaning and caching

mod cache;
mod loader;
mod processor;
pub mod schema;

pub use cache::{CacheStats, Dataset, DatasetCache};
pub use loader::{DataLoader, LoaderError};
pub use processor::{DataProcessor, Status};
