//! Frame assembly: one comparable dataset per (series, time index).
//!
//! A frame carries every active run's field arrays for that index, a shared
//! x axis, the conservation record against the series baseline, and the
//! series status block. Frames where no run supplies a water height array
//! are dropped, since there is nothing to compare.

use crate::domain::{CompareError, CompareResult, SeriesKey, TimeIndex};
use crate::modules::conservation::{
    acquire_baseline, build_status_lines, summarize_conservation, ConservationSummary,
};
use crate::modules::grid::parse_grid_file;
use crate::modules::plan::{ActiveRun, ActiveRuns, SeriesPlan};
use crate::modules::runlog::RunOutcome;
use crate::numerics::finite_sum;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One run's contribution to a frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRun {
    pub run: String,
    pub label: String,
    pub color: String,
    pub h: Option<Vec<f64>>,
    pub hu: Option<Vec<f64>>,
    pub b: Option<Vec<f64>>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDataset {
    pub series: SeriesKey,
    pub index: TimeIndex,
    pub x: Vec<f64>,
    pub runs: Vec<FrameRun>,
    pub conservation: ConservationSummary,
    pub status_lines: Vec<String>,
}

/// Builds every frame the plan names, in plan order. Runs whose file fails
/// to parse drop out of that frame only; frames with no water height data
/// in any run are dropped entirely.
pub fn build_frames(
    active: &ActiveRuns,
    plan: &SeriesPlan,
    logs: &[(String, BTreeMap<String, RunOutcome>)],
) -> Vec<FrameDataset> {
    let mut frames = Vec::new();
    for (series, indices) in plan {
        let baseline = acquire_baseline(active, series);
        let status_lines = build_status_lines(active, logs, series, baseline.is_missing());

        for &index in indices {
            let mut contributions: Vec<(&ActiveRun, FrameRun)> = Vec::new();
            let mut x: Option<Vec<f64>> = None;

            for run in active.runs_with_index(series, index) {
                let path = run.result_path(series, index);
                let record = match parse_grid_file(&path) {
                    Ok(record) => record,
                    Err(error) => {
                        debug!(run = %run.name, path = %path.display(), %error, "frame member unreadable");
                        continue;
                    }
                };
                if !record.has_any_field() {
                    continue;
                }
                if x.is_none() {
                    x = record.coordinates.clone();
                }
                let total = record.h.as_deref().map_or(f64::NAN, finite_sum);
                contributions.push((
                    run,
                    FrameRun {
                        run: run.name.clone(),
                        label: run.label.clone(),
                        color: run.color.clone(),
                        h: record.h,
                        hu: record.hu,
                        b: record.b,
                        total,
                    },
                ));
            }

            let Some(height_len) = contributions
                .iter()
                .find_map(|(_, frame_run)| frame_run.h.as_deref().map(<[f64]>::len))
            else {
                debug!(series = %series, index, "no water height data, frame dropped");
                continue;
            };
            let x = x.unwrap_or_else(|| (0..height_len).map(|cell| cell as f64).collect());

            let totals: Vec<(&ActiveRun, f64)> = contributions
                .iter()
                .map(|(run, frame_run)| (*run, frame_run.total))
                .collect();
            let conservation = summarize_conservation(&baseline, &totals);

            frames.push(FrameDataset {
                series: series.clone(),
                index,
                x,
                runs: contributions
                    .into_iter()
                    .map(|(_, frame_run)| frame_run)
                    .collect(),
                conservation,
                status_lines: status_lines.clone(),
            });
        }
    }
    frames
}

/// Writes one pretty-printed JSON artifact per frame, named
/// `{series}_i{index}.json`, under `out_dir`.
pub fn write_frame_reports(frames: &[FrameDataset], out_dir: &Path) -> CompareResult<()> {
    fs::create_dir_all(out_dir).map_err(|source| {
        CompareError::io_system(
            "IO.REPORT_DIR",
            format!("cannot create {}: {}", out_dir.display(), source),
        )
    })?;
    for frame in frames {
        let path = out_dir.join(format!("{}_i{}.json", frame.series, frame.index));
        let body = serde_json::to_string_pretty(frame).map_err(|source| {
            CompareError::internal(
                "SYS.REPORT_SERIALIZE",
                format!("cannot serialize frame {}: {}", path.display(), source),
            )
        })?;
        fs::write(&path, body).map_err(|source| {
            CompareError::io_system(
                "IO.REPORT_WRITE",
                format!("cannot write {}: {}", path.display(), source),
            )
        })?;
    }
    Ok(())
}

/// Human summary of the built frames, one block per series.
pub fn render_human_summary(frames: &[FrameDataset]) -> String {
    let mut out = String::new();
    let mut last_series: Option<&str> = None;
    for frame in frames {
        if last_series != Some(frame.series.as_str()) {
            out.push_str(&format!("== {} ==\n", frame.series));
            for line in &frame.status_lines {
                out.push_str(&format!("  {}\n", line));
            }
            last_series = Some(frame.series.as_str());
        }
        out.push_str(&format!(
            "  i={} runs={} baseline={}\n",
            frame.index,
            frame.runs.len(),
            frame
                .conservation
                .baseline_source
                .as_deref()
                .unwrap_or("missing"),
        ));
    }
    if frames.is_empty() {
        out.push_str("no frames to compare\n");
    }
    out
}
