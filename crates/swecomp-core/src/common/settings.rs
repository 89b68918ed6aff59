//! Immutable comparison configuration: which run folders to compare, how to
//! label and color them, and where each run keeps its timing log.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOG_FILENAME: &str = "timing_log.txt";
pub const DEFAULT_RESULT_EXTENSION: &str = "vtr";

/// Fallback color cycle applied by configured position when a run does not
/// set an explicit color.
pub const DEFAULT_COLOR_CYCLE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

#[derive(Debug, Clone, Deserialize)]
pub struct CompareSettings {
    #[serde(rename = "runFolders")]
    pub run_folders: Vec<RunFolderSettings>,

    #[serde(rename = "logFilename", default = "default_log_filename")]
    pub log_filename: String,

    #[serde(rename = "resultExtension", default = "default_result_extension")]
    pub result_extension: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunFolderSettings {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl RunFolderSettings {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            label: None,
            color: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Display label for this run; falls back to the configured name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

impl CompareSettings {
    pub fn new(run_folders: Vec<RunFolderSettings>) -> Self {
        Self {
            run_folders,
            log_filename: default_log_filename(),
            result_extension: default_result_extension(),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&source).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(source: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(source).map_err(|source| SettingsError::Parse {
            path: PathBuf::from("<inline-settings>"),
            source,
        })
    }

    /// Effective display color of the run at the given configured position.
    pub fn color_for(&self, position: usize) -> &str {
        self.run_folders[position]
            .color
            .as_deref()
            .unwrap_or(DEFAULT_COLOR_CYCLE[position % DEFAULT_COLOR_CYCLE.len()])
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<SettingsError> for crate::domain::CompareError {
    fn from(error: SettingsError) -> Self {
        let message = error.to_string();
        match error {
            SettingsError::Read { .. } => Self::io_system("IO.SETTINGS_READ", message),
            SettingsError::Parse { .. } => {
                Self::input_validation("INPUT.SETTINGS_PARSE", message)
            }
        }
    }
}

fn default_log_filename() -> String {
    DEFAULT_LOG_FILENAME.to_string()
}

fn default_result_extension() -> String {
    DEFAULT_RESULT_EXTENSION.to_string()
}
