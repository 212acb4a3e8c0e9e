//! Dataset persistence — NumPy `.npy` arrays plus a JSON manifest.
//!
//! A saved dataset directory contains:
//! - `tensor.npy` — f32, shape `[samples, lookback, 10, instruments]`
//! - `labels.npy` — f32, shape `[samples]`
//! - `metadata.json` — schema version, build config, config id, instrument ids
//!
//! The `.npy` format is consumed directly by the downstream (NumPy/PyTorch)
//! training pipeline. Loads reject unknown schema versions.

use crate::engine::{DatasetConfig, TensorDataset};
use ndarray::{Array1, Array4};
use ndarray_npy::{ReadNpyExt, WriteNpyExt};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

/// Current metadata schema version. Bump on breaking layout changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors raised while saving or loading a dataset directory.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("npy write error on {path}: {source}")]
    NpyWrite {
        path: String,
        #[source]
        source: ndarray_npy::WriteNpyError,
    },

    #[error("npy read error on {path}: {source}")]
    NpyRead {
        path: String,
        #[source]
        source: ndarray_npy::ReadNpyError,
    },

    #[error("metadata error on {path}: {source}")]
    Metadata {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported schema version {found} (max supported: {SCHEMA_VERSION})")]
    UnsupportedSchemaVersion { found: u32 },
}

/// Manifest persisted alongside the arrays.
///
/// `instruments` lists universe identifiers in their stable (lexicographic)
/// order; the tensor's last axis is *not* in this order — it is re-ranked per
/// sample day and the per-day permutation is not persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetMetadata {
    pub schema_version: u32,
    pub config: DatasetConfig,
    pub config_id: String,
    pub instruments: Vec<String>,
    pub tensor_shape: [usize; 4],
}

impl DatasetMetadata {
    pub fn new(config: &DatasetConfig, instruments: Vec<String>, dataset: &TensorDataset) -> Self {
        let shape = dataset.tensor.shape();
        Self {
            schema_version: SCHEMA_VERSION,
            config: config.clone(),
            config_id: config.config_id(),
            instruments,
            tensor_shape: [shape[0], shape[1], shape[2], shape[3]],
        }
    }
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Save a built dataset into `dir` (created if absent).
pub fn save_dataset(
    dataset: &TensorDataset,
    metadata: &DatasetMetadata,
    dir: &Path,
) -> Result<(), ExportError> {
    std::fs::create_dir_all(dir).map_err(io_err(dir))?;

    let tensor_path = dir.join("tensor.npy");
    let writer = BufWriter::new(File::create(&tensor_path).map_err(io_err(&tensor_path))?);
    dataset
        .tensor
        .write_npy(writer)
        .map_err(|source| ExportError::NpyWrite {
            path: tensor_path.display().to_string(),
            source,
        })?;

    let labels_path = dir.join("labels.npy");
    let writer = BufWriter::new(File::create(&labels_path).map_err(io_err(&labels_path))?);
    dataset
        .labels
        .write_npy(writer)
        .map_err(|source| ExportError::NpyWrite {
            path: labels_path.display().to_string(),
            source,
        })?;

    let meta_path = dir.join("metadata.json");
    let json = serde_json::to_string_pretty(metadata).map_err(|source| ExportError::Metadata {
        path: meta_path.display().to_string(),
        source,
    })?;
    std::fs::write(&meta_path, json).map_err(io_err(&meta_path))?;

    Ok(())
}

/// Load a dataset directory written by [`save_dataset`].
pub fn load_dataset(dir: &Path) -> Result<(TensorDataset, DatasetMetadata), ExportError> {
    let meta_path = dir.join("metadata.json");
    let json = std::fs::read_to_string(&meta_path).map_err(io_err(&meta_path))?;
    let metadata: DatasetMetadata =
        serde_json::from_str(&json).map_err(|source| ExportError::Metadata {
            path: meta_path.display().to_string(),
            source,
        })?;
    if metadata.schema_version > SCHEMA_VERSION {
        return Err(ExportError::UnsupportedSchemaVersion {
            found: metadata.schema_version,
        });
    }

    let tensor_path = dir.join("tensor.npy");
    let reader = File::open(&tensor_path).map_err(io_err(&tensor_path))?;
    let tensor = Array4::<f32>::read_npy(reader).map_err(|source| ExportError::NpyRead {
        path: tensor_path.display().to_string(),
        source,
    })?;

    let labels_path = dir.join("labels.npy");
    let reader = File::open(&labels_path).map_err(io_err(&labels_path))?;
    let labels = Array1::<f32>::read_npy(reader).map_err(|source| ExportError::NpyRead {
        path: labels_path.display().to_string(),
        source,
    })?;

    Ok((TensorDataset { tensor, labels }, metadata))
}
