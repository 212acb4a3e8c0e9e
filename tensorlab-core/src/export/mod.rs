//! Dataset persistence for the downstream training pipeline.

pub mod npy;

pub use npy::{load_dataset, save_dataset, DatasetMetadata, ExportError, SCHEMA_VERSION};
