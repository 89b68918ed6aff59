pub mod settings;

pub use settings::{
    CompareSettings, RunFolderSettings, SettingsError, DEFAULT_COLOR_CYCLE, DEFAULT_LOG_FILENAME,
    DEFAULT_RESULT_EXTENSION,
};
