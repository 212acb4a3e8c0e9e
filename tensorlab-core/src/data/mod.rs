//! Data pipeline: ingestion, date alignment, and return derivation.

pub mod align;
pub mod ingest;
pub mod returns;

pub use align::{align_universe, AlignError};
pub use ingest::{load_series_csv, load_universe_from_dir, IngestError};
pub use returns::{compute_returns, ReturnSeries};
