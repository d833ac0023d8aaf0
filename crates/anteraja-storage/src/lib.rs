//! Result-table sinks: CSV export, local files and Azure Blob Storage.

pub mod azure;
pub mod csv_export;
pub mod error;

pub use azure::BlobClient;
pub use csv_export::{read_csv, to_csv, write_local};
pub use error::StorageError;
