//! Water-mass conservation tracking and run timing comparison.
//!
//! The baseline is the index-0 water height total of the first configured
//! run that can provide one. Every later frame is judged against that
//! single number, so all runs share one reference even when the run that
//! produced it drops out later in the series.

use crate::domain::BASELINE_INDEX;
use crate::modules::grid::parse_grid_file;
use crate::modules::plan::{ActiveRun, ActiveRuns};
use crate::modules::runlog::RunOutcome;
use crate::numerics::finite_sum;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Mass lost relative to the baseline, and that loss as a percentage of the
/// baseline. Gains count as zero loss. Any non-finite input, or a baseline
/// of zero or less for the percentage, yields NaN.
pub fn loss_against_baseline(baseline: f64, current: f64) -> (f64, f64) {
    if !baseline.is_finite() || !current.is_finite() {
        return (f64::NAN, f64::NAN);
    }
    let lost = (baseline - current).max(0.0);
    let percent = if baseline > 0.0 {
        100.0 * lost / baseline
    } else {
        f64::NAN
    };
    (lost, percent)
}

/// The reference total for a series, and the run that supplied it.
#[derive(Debug, Clone, Serialize)]
pub struct BaselineSample {
    pub total: f64,
    pub source: Option<String>,
}

impl BaselineSample {
    pub fn is_missing(&self) -> bool {
        self.source.is_none()
    }
}

/// Finds the series baseline: the first run in configured order whose
/// index-0 result file parses and yields a finite water height total.
/// Runs without the file, with unparseable files, or with no finite `h`
/// samples are skipped.
pub fn acquire_baseline(active: &ActiveRuns, series: &str) -> BaselineSample {
    for run in &active.runs {
        if !run.has_index(series, BASELINE_INDEX) {
            continue;
        }
        let path = run.result_path(series, BASELINE_INDEX);
        let record = match parse_grid_file(&path) {
            Ok(record) => record,
            Err(error) => {
                debug!(run = %run.name, path = %path.display(), %error, "baseline candidate unreadable");
                continue;
            }
        };
        let Some(h) = record.h.as_deref() else {
            continue;
        };
        let total = finite_sum(h);
        if total.is_finite() {
            return BaselineSample {
                total,
                source: Some(run.name.clone()),
            };
        }
    }
    BaselineSample {
        total: f64::NAN,
        source: None,
    }
}

/// One run's water total in a frame, with its loss against the baseline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConservation {
    pub run: String,
    pub label: String,
    pub total: f64,
    pub lost: f64,
    pub lost_percent: f64,
}

/// Per-frame conservation record: the shared baseline plus one entry per
/// run that contributed data, in configured run order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConservationSummary {
    pub baseline_total: f64,
    pub baseline_source: Option<String>,
    pub runs: Vec<RunConservation>,
}

pub fn summarize_conservation(
    baseline: &BaselineSample,
    totals: &[(&ActiveRun, f64)],
) -> ConservationSummary {
    let runs = totals
        .iter()
        .map(|(run, total)| {
            let (lost, lost_percent) = loss_against_baseline(baseline.total, *total);
            RunConservation {
                run: run.name.clone(),
                label: run.label.clone(),
                total: *total,
                lost,
                lost_percent,
            }
        })
        .collect();
    ConservationSummary {
        baseline_total: baseline.total,
        baseline_source: baseline.source.clone(),
        runs,
    }
}

/// Builds the human status block for one series. Line order is fixed: one
/// timing line per run in configured order, then the fastest run, then the
/// slowdown of every other completed run, then the baseline warning when no
/// run supplied an index-0 reference.
pub fn build_status_lines(
    active: &ActiveRuns,
    logs: &[(String, BTreeMap<String, RunOutcome>)],
    series: &str,
    baseline_missing: bool,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut completed: Vec<(&str, f64)> = Vec::new();

    for run in &active.runs {
        let outcome = logs
            .iter()
            .find(|(name, _)| name == &run.name)
            .and_then(|(_, entries)| entries.get(series));
        match outcome {
            None => lines.push(format!("{}: no log entry", run.label)),
            Some(RunOutcome::Failed { message }) => {
                lines.push(format!("{}: {}", run.label, message));
            }
            Some(RunOutcome::Completed { duration_seconds }) => {
                lines.push(format!("{}: {:.3}s", run.label, duration_seconds));
                completed.push((run.label.as_str(), *duration_seconds));
            }
        }
    }

    if let Some((fastest_at, &(fastest_label, fastest))) = completed
        .iter()
        .enumerate()
        .min_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
    {
        lines.push(format!("Fastest: {}", fastest_label));
        for (position, &(label, duration)) in completed.iter().enumerate() {
            if position == fastest_at {
                continue;
            }
            let slower_percent = if fastest > 0.0 {
                100.0 * (duration - fastest) / fastest
            } else {
                0.0
            };
            lines.push(format!(
                "{}: {:.1}% slower vs {}",
                label, slower_percent, fastest_label
            ));
        }
    }

    if baseline_missing {
        lines.push("Baseline i=0 missing in all folders".to_string());
    }
    lines
}
