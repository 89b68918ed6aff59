use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CompareResult<T> = Result<T, CompareError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareErrorCategory {
    InputValidation,
    IoSystem,
    Parse,
    Internal,
}

impl CompareErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidation => 2,
            Self::IoSystem => 3,
            Self::Parse => 4,
            Self::Internal => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InputValidation => "InputValidation",
            Self::IoSystem => "IoSystem",
            Self::Parse => "Parse",
            Self::Internal => "Internal",
        }
    }
}

/// Central error type for the comparison core.
///
/// Per-file failures (missing result files, unparseable grids, corrupt log
/// lines) are recovered locally as absence in the data model and never reach
/// this type; it covers the few hard stops: unreadable settings, a missing or
/// unparseable collection manifest, and report-writing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareError {
    category: CompareErrorCategory,
    code: &'static str,
    message: String,
}

impl CompareError {
    pub fn new(
        category: CompareErrorCategory,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            code,
            message: message.into(),
        }
    }

    pub fn input_validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(CompareErrorCategory::InputValidation, code, message)
    }

    pub fn io_system(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(CompareErrorCategory::IoSystem, code, message)
    }

    pub fn parse(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(CompareErrorCategory::Parse, code, message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(CompareErrorCategory::Internal, code, message)
    }

    pub const fn category(&self) -> CompareErrorCategory {
        self.category
    }

    pub const fn code(&self) -> &'static str {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.code, self.message)
    }
}

impl Display for CompareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.label(),
            self.code,
            self.message
        )
    }
}

impl Error for CompareError {}
