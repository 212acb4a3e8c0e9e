//! Tensor assembly — the per-sample-day orchestration loop.
//!
//! For each sample day: label the reference instrument, rank the universe by
//! rolling correlation, then encode every (offset day, ranked instrument)
//! pair into the output tensor. Sample days are independent — each depends
//! only on the immutable aligned universe and return series — so the loop
//! runs as a rayon parallel map merged by sample index.

use crate::data::ReturnSeries;
use crate::domain::{AlignedUniverse, INDICATOR_COUNT};
use crate::engine::config::{ConfigError, DatasetConfig};
use crate::engine::encoder::encode_signals;
use crate::engine::labeler::label_direction;
use crate::engine::ranking::rank_by_correlation;
use ndarray::{Array1, Array3, Array4};
use rayon::prelude::*;
use thiserror::Error;

/// Errors raised during tensor assembly.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("reference instrument '{reference}' is not in the aligned universe")]
    ReferenceNotFound { reference: String },
}

/// The built dataset: binary tensor plus one label per sample.
///
/// Tensor axes: `[sample, offset-in-window, indicator, instrument-rank]`.
/// The last axis is ordered per sample day by correlation to the reference,
/// so a given physical instrument can occupy different rank positions on
/// different samples. Values are 0.0/1.0, stored as f32 for the training
/// pipeline. Built once per run and not mutated afterwards.
#[derive(Debug, Clone)]
pub struct TensorDataset {
    pub tensor: Array4<f32>,
    pub labels: Array1<f32>,
}

impl TensorDataset {
    pub fn sample_count(&self) -> usize {
        self.tensor.shape()[0]
    }
}

/// Build the labeled tensor for the configured sample range.
///
/// The config is validated against the aligned calendar before any
/// computation; a sample range without enough lookback history or without a
/// labeling lookahead day is rejected, never clamped, and a reference
/// identifier that is not in the universe is an error, not a panic.
pub fn build_dataset(
    aligned: &AlignedUniverse,
    returns: &ReturnSeries,
    config: &DatasetConfig,
) -> Result<TensorDataset, BuildError> {
    config.validate(aligned.day_count())?;

    let lookback = config.lookback;
    let instrument_count = aligned.instrument_count();
    let sample_count = config.sample_count();
    let reference_series =
        aligned
            .series(&config.reference)
            .ok_or_else(|| BuildError::ReferenceNotFound {
                reference: config.reference.clone(),
            })?;

    let slices: Vec<(Array3<f32>, f32)> = (config.sample_start..config.sample_end)
        .into_par_iter()
        .map(|day| {
            let label = label_direction(reference_series, day) as f32;
            let ranked = rank_by_correlation(returns, &config.reference, day, lookback);

            let mut slice = Array3::<f32>::zeros((lookback, INDICATOR_COUNT, instrument_count));
            for (offset, subday) in (day - lookback..day).enumerate() {
                for (rank, instrument) in ranked.iter().enumerate() {
                    let series = aligned
                        .series(instrument)
                        .expect("ranking returned an instrument outside the universe");
                    let flags = encode_signals(series, subday);
                    for (indicator, &flag) in flags.iter().enumerate() {
                        slice[[offset, indicator, rank]] = flag as f32;
                    }
                }
            }
            (slice, label)
        })
        .collect();

    let mut tensor =
        Array4::<f32>::zeros((sample_count, lookback, INDICATOR_COUNT, instrument_count));
    let mut labels = Array1::<f32>::zeros(sample_count);
    for (index, (slice, label)) in slices.into_iter().enumerate() {
        tensor.index_axis_mut(ndarray::Axis(0), index).assign(&slice);
        labels[index] = label;
    }

    Ok(TensorDataset { tensor, labels })
}
