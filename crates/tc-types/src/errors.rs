use thiserror::Error;

/// Main error type for Theorycrafter
#[derive(Error, Debug)]
pub enum TcError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while loading or constructing price histories
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid price for {ticker} on {date}: {price}")]
    InvalidPrice {
        ticker: String,
        date: String,
        price: f64,
    },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Data parsing error: {message}")]
    ParseError { message: String },
}

/// Errors raised for structurally invalid metric computations.
///
/// Numerically degenerate inputs never produce these; they surface as
/// undefined statistics instead.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("No tickers supplied")]
    NoTickers,

    #[error("Shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid metrics configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias for Theorycrafter operations
pub type TcResult<T> = Result<T, TcError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::TcError::Validation(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::TcError::Config(format!($($arg)*))
    };
}
