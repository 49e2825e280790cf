use chrono::NaiveDate;
use thiserror::Error;

/// Error returned by the `exrate` binary: a message plus the process exit code.
///
/// Exit codes:
/// - `2`: input, IO, or usage problems
/// - `3`: data problems (parse failures, empty input, missing columns)
/// - `4`: rendering or terminal failures
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// A cell that could not be coerced to its typed form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: invalid date '{value}' (expected YYYY-MM-DD)")]
    Date { line: usize, value: String },

    #[error("line {line}: non-numeric value '{value}' in column `{column}`")]
    Value {
        line: usize,
        column: String,
        value: String,
    },
}

/// Errors raised by the cleaning/smoothing pipeline. All of them abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("input contains headers but no data rows")]
    EmptyInput,

    #[error("missing required column `{0}` (after header normalization)")]
    MissingColumn(String),

    #[error("rolling window must be at least 1 observation")]
    InvalidWindow,

    #[error("segment '{label}': start {start} must be before end {end}")]
    InvalidSegment {
        label: String,
        start: NaiveDate,
        end: NaiveDate,
    },
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let exit_code = match err {
            PipelineError::InvalidWindow | PipelineError::InvalidSegment { .. } => 2,
            _ => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}
