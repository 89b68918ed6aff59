//! Run-folder discovery and series reconciliation.
//!
//! Scans the configured run folders once, groups result files by the
//! `{basename}_{index}.{ext}` convention, and merges the per-folder index
//! sets into one renderable plan. Index sets are merged by union, not
//! intersection: a run missing an index simply contributes no data point
//! there, so partial failure of one scheme never hides data from the others.

use crate::common::CompareSettings;
use crate::domain::{CompareError, CompareResult, SeriesKey, TimeIndex, BASELINE_INDEX};
use crate::modules::runlog::{parse_log_file, RunOutcome};
use globset::Glob;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// One run folder that exists on disk, with its scanned series index sets.
#[derive(Debug, Clone)]
pub struct ActiveRun {
    pub name: String,
    pub label: String,
    pub color: String,
    pub root: PathBuf,
    pub series: BTreeMap<SeriesKey, BTreeSet<TimeIndex>>,
    result_extension: String,
    log_filename: String,
}

impl ActiveRun {
    pub fn result_path(&self, series: &str, index: TimeIndex) -> PathBuf {
        self.root
            .join(format!("{}_{}.{}", series, index, self.result_extension))
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join(&self.log_filename)
    }

    pub fn has_index(&self, series: &str, index: TimeIndex) -> bool {
        self.series
            .get(series)
            .is_some_and(|indices| indices.contains(&index))
    }
}

/// Active run folders in configured order. Folders missing at scan time are
/// dropped for the session.
#[derive(Debug, Clone, Default)]
pub struct ActiveRuns {
    pub runs: Vec<ActiveRun>,
}

impl ActiveRuns {
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Runs that actually have a file for the given (series, index), in
    /// configured order.
    pub fn runs_with_index(&self, series: &str, index: TimeIndex) -> Vec<&ActiveRun> {
        self.runs
            .iter()
            .filter(|run| run.has_index(series, index))
            .collect()
    }

    /// Parses every active run's timing log, in configured order. Missing
    /// logs yield empty maps.
    pub fn load_logs(&self) -> Vec<(String, BTreeMap<String, RunOutcome>)> {
        self.runs
            .iter()
            .map(|run| (run.name.clone(), parse_log_file(run.log_path())))
            .collect()
    }
}

/// Ordered time indices to render, per series.
pub type SeriesPlan = BTreeMap<SeriesKey, Vec<TimeIndex>>;

/// Scans the configured run folders. Folders that do not exist or cannot be
/// listed are dropped with a warning; files not matching the result
/// extension or the `{basename}_{index}` convention are ignored.
pub fn scan_run_folders(settings: &CompareSettings) -> CompareResult<ActiveRuns> {
    let extension = settings.result_extension.as_str();
    let matcher = Glob::new(&format!("*.{}", extension))
        .map_err(|source| {
            CompareError::input_validation(
                "INPUT.RESULT_EXTENSION",
                format!("invalid result extension '{}': {}", extension, source),
            )
        })?
        .compile_matcher();

    let mut runs = Vec::with_capacity(settings.run_folders.len());
    for (position, folder) in settings.run_folders.iter().enumerate() {
        if !folder.path.is_dir() {
            warn!(run = %folder.name, path = %folder.path.display(), "run folder missing, dropped");
            continue;
        }
        let entries = match fs::read_dir(&folder.path) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(run = %folder.name, %error, "run folder unreadable, dropped");
                continue;
            }
        };

        let mut series: BTreeMap<SeriesKey, BTreeSet<TimeIndex>> = BTreeMap::new();
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if !matcher.is_match(file_name) {
                continue;
            }
            let Some((basename, index)) = parse_result_filename(file_name, extension) else {
                debug!(run = %folder.name, file = file_name, "ignoring unconventional result name");
                continue;
            };
            series.entry(basename).or_default().insert(index);
        }

        runs.push(ActiveRun {
            name: folder.name.clone(),
            label: folder.display_label().to_string(),
            color: settings.color_for(position).to_string(),
            root: folder.path.clone(),
            series,
            result_extension: extension.to_string(),
            log_filename: settings.log_filename.clone(),
        });
    }

    info!(
        active = runs.len(),
        configured = settings.run_folders.len(),
        "run folder scan complete"
    );
    Ok(ActiveRuns { runs })
}

/// Splits `{basename}_{index}.{ext}` into its parts. The basename may itself
/// contain underscores; the index is the final all-digit suffix segment.
pub fn parse_result_filename(file_name: &str, extension: &str) -> Option<(SeriesKey, TimeIndex)> {
    let stem = file_name.strip_suffix(extension)?.strip_suffix('.')?;
    let (basename, digits) = stem.rsplit_once('_')?;
    if basename.is_empty() || digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = digits.parse::<TimeIndex>().ok()?;
    Some((basename.to_string(), index))
}

/// Merges per-run index sets into the renderable plan: union across runs,
/// baseline index excluded unless it is the only index, empty series
/// dropped. BTreeMap keys give the deterministic lexicographic series
/// order.
pub fn build_plan(active: &ActiveRuns) -> SeriesPlan {
    let mut union: BTreeMap<SeriesKey, BTreeSet<TimeIndex>> = BTreeMap::new();
    for run in &active.runs {
        for (basename, indices) in &run.series {
            union.entry(basename.clone()).or_default().extend(indices);
        }
    }

    let mut plan = SeriesPlan::new();
    for (basename, indices) in union {
        let render: Vec<TimeIndex> = if indices.contains(&BASELINE_INDEX) && indices.len() > 1 {
            indices
                .into_iter()
                .filter(|&index| index != BASELINE_INDEX)
                .collect()
        } else {
            indices.into_iter().collect()
        };
        if !render.is_empty() {
            plan.insert(basename, render);
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::{build_plan, parse_result_filename, scan_run_folders};
    use crate::common::{CompareSettings, RunFolderSettings};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(root: &Path, names: &[&str]) {
        fs::create_dir_all(root).expect("run folder should be created");
        for name in names {
            fs::write(root.join(name), "<VTKFile/>").expect("file should be written");
        }
    }

    fn settings_for(temp: &TempDir, names: &[&str]) -> CompareSettings {
        CompareSettings::new(
            names
                .iter()
                .map(|name| RunFolderSettings::new(*name, temp.path().join(name)))
                .collect(),
        )
    }

    #[test]
    fn filename_convention_keeps_underscored_basenames() {
        assert_eq!(
            parse_result_filename("dam_break_12.vtr", "vtr"),
            Some(("dam_break".to_string(), 12))
        );
        assert_eq!(
            parse_result_filename("wave_0.vtr", "vtr"),
            Some(("wave".to_string(), 0))
        );
        assert_eq!(parse_result_filename("wave_x1.vtr", "vtr"), None);
        assert_eq!(parse_result_filename("wave.vtr", "vtr"), None);
        assert_eq!(parse_result_filename("_5.vtr", "vtr"), None);
        assert_eq!(parse_result_filename("wave_3.vtp", "vtr"), None);
    }

    #[test]
    fn missing_folders_are_dropped_from_the_active_set() {
        let temp = TempDir::new().expect("tempdir should be created");
        touch(&temp.path().join("aug_out"), &["wave_0.vtr"]);

        let settings = settings_for(&temp, &["aug_out", "ghost_out"]);
        let active = scan_run_folders(&settings).expect("scan should succeed");

        assert_eq!(active.runs.len(), 1);
        assert_eq!(active.runs[0].name, "aug_out");
    }

    #[test]
    fn plan_unions_indices_across_runs() {
        let temp = TempDir::new().expect("tempdir should be created");
        touch(&temp.path().join("a"), &["wave_1.vtr", "wave_2.vtr"]);
        touch(&temp.path().join("b"), &["wave_2.vtr", "wave_3.vtr"]);

        let settings = settings_for(&temp, &["a", "b"]);
        let active = scan_run_folders(&settings).expect("scan should succeed");
        let plan = build_plan(&active);

        assert_eq!(plan.get("wave"), Some(&vec![1, 2, 3]));
        let present = active.runs_with_index("wave", 1);
        assert_eq!(present.len(), 1);
        assert_eq!(present[0].name, "a");
    }

    #[test]
    fn baseline_index_is_excluded_unless_alone() {
        let temp = TempDir::new().expect("tempdir should be created");
        touch(
            &temp.path().join("a"),
            &["wave_0.vtr", "wave_2.vtr", "wave_5.vtr", "flat_0.vtr"],
        );
        touch(&temp.path().join("b"), &["wave_0.vtr"]);

        let settings = settings_for(&temp, &["a", "b"]);
        let active = scan_run_folders(&settings).expect("scan should succeed");
        let plan = build_plan(&active);

        assert_eq!(plan.get("wave"), Some(&vec![2, 5]));
        assert_eq!(plan.get("flat"), Some(&vec![0]));
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let temp = TempDir::new().expect("tempdir should be created");
        touch(
            &temp.path().join("a"),
            &["wave_1.vtr", "timing_log.txt", "notes.md", "wave_final.vtr"],
        );

        let settings = settings_for(&temp, &["a"]);
        let active = scan_run_folders(&settings).expect("scan should succeed");

        assert_eq!(active.runs[0].series.len(), 1);
        assert_eq!(
            active.runs[0].series["wave"].iter().copied().collect::<Vec<_>>(),
            vec![1]
        );
    }

    #[test]
    fn series_order_is_lexicographic() {
        let temp = TempDir::new().expect("tempdir should be created");
        touch(
            &temp.path().join("a"),
            &["surge_1.vtr", "dam_1.vtr", "wave_1.vtr"],
        );

        let settings = settings_for(&temp, &["a"]);
        let active = scan_run_folders(&settings).expect("scan should succeed");
        let plan = build_plan(&active);

        let order: Vec<&str> = plan.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["dam", "surge", "wave"]);
    }
}
