//! Tensor construction engine: configuration, ranking, encoding, labeling,
//! and per-sample-day assembly.

pub mod builder;
pub mod config;
pub mod encoder;
pub mod labeler;
pub mod ranking;

pub use builder::{build_dataset, BuildError, TensorDataset};
pub use config::{ConfigError, ConfigId, DatasetConfig};
pub use encoder::{encode_signals, SignalVector};
pub use labeler::label_direction;
pub use ranking::rank_by_correlation;
