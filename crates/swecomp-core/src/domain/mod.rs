pub mod errors;

pub use errors::{CompareError, CompareErrorCategory, CompareResult};

/// Timestep index extracted from a result filename suffix.
///
/// Index 0 is reserved as the baseline (initial-condition) marker; see the
/// reconciliation rules in `modules::plan`.
pub type TimeIndex = usize;

/// Basename shared by one family of per-timestep result files, e.g. `"wave"`
/// for `wave_0.vtr`, `wave_5.vtr`.
pub type SeriesKey = String;

/// Filename suffix of the baseline snapshot.
pub const BASELINE_INDEX: TimeIndex = 0;
