use super::model::RunOutcome;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

const ERROR_MARKER: &str = ", ERROR:";
const DURATION_MARKER: &str = ", duration=";

/// Parses one run's timing log into a series-key -> outcome map.
///
/// Line grammar, checked in order:
///   `KEY, ERROR: <message>`      -> Failed with the trimmed message
///   `KEY, duration=<number>[s]`  -> Completed with the parsed duration
/// A duration that fails to parse becomes a Failed outcome carrying a
/// descriptive message; corruption of one line never aborts the rest.
/// Lines matching neither marker are skipped.
pub fn parse_log_source(source: &str) -> BTreeMap<String, RunOutcome> {
    let mut outcomes = BTreeMap::new();
    for raw in source.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((key, message)) = line.split_once(ERROR_MARKER) {
            outcomes.insert(
                key.trim().to_string(),
                RunOutcome::Failed {
                    message: message.trim().to_string(),
                },
            );
        } else if let Some((key, duration)) = line.split_once(DURATION_MARKER) {
            let duration = duration.trim();
            let digits = duration.strip_suffix('s').unwrap_or(duration);
            let outcome = match digits.parse::<f64>() {
                Ok(duration_seconds) => RunOutcome::Completed { duration_seconds },
                Err(_) => RunOutcome::Failed {
                    message: format!("Bad duration '{}'", duration),
                },
            };
            outcomes.insert(key.trim().to_string(), outcome);
        }
    }
    outcomes
}

/// Reads and parses a timing log. A missing or unreadable file yields an
/// empty map: the run simply has no recorded outcomes.
pub fn parse_log_file(path: impl AsRef<Path>) -> BTreeMap<String, RunOutcome> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(source) => parse_log_source(&source),
        Err(error) => {
            debug!(path = %path.display(), %error, "timing log unavailable");
            BTreeMap::new()
        }
    }
}
