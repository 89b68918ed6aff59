mod model;
mod parser;

pub use model::{CollectionEntry, CollectionFrame, CollectionReport};
pub use parser::{parse_collection_file, parse_collection_source, CollectionParseError};

use crate::domain::{CompareError, CompareResult};
use crate::modules::conservation::loss_against_baseline;
use crate::modules::grid::parse_grid_file;
use crate::numerics::{cell_widths, finite_weighted_sum};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Walks one collection manifest and derives the conservation record for
/// every entry against the first entry's total.
///
/// Member files that fail to load or hold no usable data contribute a NaN
/// total and the walk continues; only the manifest itself is a hard stop.
pub fn walk_collection(manifest_path: impl AsRef<Path>) -> CompareResult<CollectionReport> {
    let manifest_path = manifest_path.as_ref();
    let entries = parse_collection_file(manifest_path).map_err(CompareError::from)?;
    if entries.is_empty() {
        return Err(CompareError::input_validation(
            "INPUT.COLLECTION_EMPTY",
            format!(
                "collection manifest '{}' lists no datasets",
                manifest_path.display()
            ),
        ));
    }

    let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
    let totals: Vec<f64> = entries
        .iter()
        .map(|entry| entry_volume_total(base_dir, &entry.file))
        .collect();
    let baseline_total = totals[0];

    let frames = entries
        .iter()
        .zip(&totals)
        .enumerate()
        .map(|(index, (entry, &total))| {
            let delta = total - baseline_total;
            let (lost, lost_percent) = loss_against_baseline(baseline_total, total);
            CollectionFrame {
                index,
                timestep: entry.timestep,
                file: entry.file.clone(),
                total,
                delta,
                lost,
                lost_percent,
            }
        })
        .collect();

    Ok(CollectionReport {
        manifest_path: manifest_path.display().to_string(),
        baseline_total,
        entries: frames,
    })
}

/// dx-weighted total water volume of one collection member, NaN when the
/// file or the required arrays are unavailable.
fn entry_volume_total(base_dir: &Path, file: &str) -> f64 {
    let path = base_dir.join(file);
    let record = match parse_grid_file(&path) {
        Ok(record) => record,
        Err(error) => {
            debug!(path = %path.display(), %error, "collection member unavailable");
            return f64::NAN;
        }
    };
    match (record.h.as_deref(), record.coordinates.as_deref()) {
        (Some(h), Some(coordinates)) => finite_weighted_sum(h, &cell_widths(coordinates)),
        _ => f64::NAN,
    }
}

pub fn write_collection_report(
    report: &CollectionReport,
    report_path: impl AsRef<Path>,
) -> CompareResult<()> {
    let report_path = report_path.as_ref();
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent).map_err(|source| {
            CompareError::io_system(
                "IO.REPORT_DIR",
                format!(
                    "failed to create report directory '{}': {}",
                    parent.display(),
                    source
                ),
            )
        })?;
    }
    let payload = serde_json::to_string_pretty(report).map_err(|source| {
        CompareError::internal(
            "SYS.REPORT_SERIALIZE",
            format!("failed to serialize collection report: {}", source),
        )
    })?;
    fs::write(report_path, payload).map_err(|source| {
        CompareError::io_system(
            "IO.REPORT_WRITE",
            format!(
                "failed to write report '{}': {}",
                report_path.display(),
                source
            ),
        )
    })
}

pub fn render_collection_summary(report: &CollectionReport) -> String {
    let mut lines = Vec::with_capacity(report.entries.len() + 1);
    lines.push(format!(
        "Collection {} ({} entries, baseline total {:.6})",
        report.manifest_path,
        report.entries.len(),
        report.baseline_total
    ));
    for frame in &report.entries {
        if frame.total.is_finite() {
            lines.push(format!(
                "  #{} t={:.2} {}: total={:.6} delta={:+.6} lost={:.6} ({:.2}%)",
                frame.index,
                frame.timestep,
                frame.file,
                frame.total,
                frame.delta,
                frame.lost,
                frame.lost_percent
            ));
        } else {
            lines.push(format!(
                "  #{} t={:.2} {}: no usable data",
                frame.index, frame.timestep, frame.file
            ));
        }
    }
    lines.join("\n")
}
