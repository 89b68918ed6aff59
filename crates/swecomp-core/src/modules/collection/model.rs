use serde::Serialize;

/// One record of a collection manifest: a timestep value and the member
/// file it points at, in manifest order.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEntry {
    pub timestep: f64,
    pub file: String,
}

/// Conservation walk over one collection: per-entry volume totals measured
/// against the first entry's total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport {
    pub manifest_path: String,
    /// Total water volume of the first entry; NaN when unavailable.
    pub baseline_total: f64,
    pub entries: Vec<CollectionFrame>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionFrame {
    pub index: usize,
    pub timestep: f64,
    pub file: String,
    /// dx-weighted total water volume; NaN when the member file was
    /// unavailable or held no usable data.
    pub total: f64,
    pub delta: f64,
    pub lost: f64,
    pub lost_percent: f64,
}
