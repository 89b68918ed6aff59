/// Outcome recorded in a run's timing log for one series.
///
/// Absence of an entry is a distinct state (the run never logged the
/// series) and is represented by a missing map key, not by a variant.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed { duration_seconds: f64 },
    Failed { message: String },
}

impl RunOutcome {
    pub fn duration_seconds(&self) -> Option<f64> {
        match self {
            Self::Completed { duration_seconds } => Some(*duration_seconds),
            Self::Failed { .. } => None,
        }
    }
}
