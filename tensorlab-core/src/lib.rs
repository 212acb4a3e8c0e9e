//! TensorLab Core — labeled training tensors from daily market histories.
//!
//! The pipeline, leaves first:
//! - Domain types (daily records, indicator sets, instrument universes)
//! - CSV ingestion and date alignment onto a common calendar
//! - Daily return derivation
//! - Per-day correlation ranking, binary signal encoding, direction labeling
//! - 4D tensor assembly and `.npy` persistence
//!
//! The universe is constructed once and immutable; returns are derived once;
//! each sample day's ranking and encoding depends only on those two, which is
//! what makes the builder's per-sample-day loop embarrassingly parallel.

pub mod data;
pub mod domain;
pub mod engine;
pub mod export;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: everything crossing the rayon boundary is
    /// Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::DailyRecord>();
        require_sync::<domain::DailyRecord>();
        require_send::<domain::InstrumentUniverse>();
        require_sync::<domain::InstrumentUniverse>();
        require_send::<domain::AlignedUniverse>();
        require_sync::<domain::AlignedUniverse>();
        require_send::<data::ReturnSeries>();
        require_sync::<data::ReturnSeries>();
        require_send::<engine::DatasetConfig>();
        require_sync::<engine::DatasetConfig>();
        require_send::<engine::TensorDataset>();
        require_sync::<engine::TensorDataset>();
    }
}
