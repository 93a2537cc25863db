use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, FoilError>;

/// Error type covering every way a sweep can fail, from validating the run
/// parameters through solving to writing the report.
#[derive(Debug, Error)]
pub enum FoilError {
    /// Raised when run parameters are out of range or malformed.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Raised when results are not aligned with the airfoil list or with the
    /// alpha sequence.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Raised when an airfoil identifier matches neither a NACA 4-digit code
    /// nor an entry of the coordinate database.
    #[error("cannot resolve airfoil '{airfoil}': {reason}")]
    GeometryResolution { airfoil: String, reason: String },

    /// Raised when the solver fails for a specific airfoil.
    #[error("solver failed for '{airfoil}': {failure}")]
    Solver {
        airfoil: String,
        failure: SolverFailure,
    },

    /// Raised when the finished workbook cannot be moved over the destination.
    #[error("cannot write report to {path}: {source}")]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing fails for run files.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a report workbook does not follow the expected layout.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl FoilError {
    /// Builds a [`FoilError::Configuration`] from anything printable.
    pub fn config(message: impl Into<String>) -> Self {
        FoilError::Configuration(message.into())
    }

    /// True for errors detected before any work starts: bad parameters and
    /// misaligned inputs.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FoilError::Configuration(_) | FoilError::ShapeMismatch(_)
        )
    }
}

/// Why a single solver invocation failed.
#[derive(Debug, Error)]
pub enum SolverFailure {
    /// One or more requested angles of attack did not converge.
    #[error("no converged solution at alpha {}", format_alphas(.alphas))]
    NotConverged { alphas: Vec<f64> },

    /// The solver did not finish within its wall-clock budget.
    #[error("timed out after {seconds} s")]
    Timeout { seconds: u64 },

    /// The solver process could not be started or talked to.
    #[error("could not launch solver: {0}")]
    Launch(#[source] std::io::Error),

    /// The solver finished but its output could not be interpreted.
    #[error("unreadable solver output: {0}")]
    Output(String),
}

fn format_alphas(alphas: &[f64]) -> String {
    alphas
        .iter()
        .map(|alpha| alpha.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
