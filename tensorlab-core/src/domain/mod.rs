//! Domain types: daily records, indicator sets, and instrument universes.

pub mod record;
pub mod universe;

pub use record::{DailyRecord, IndicatorSet, INDICATOR_COUNT};
pub use universe::{AlignedUniverse, InstrumentUniverse, UniverseError};
