use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in bank '{bank}': {}", .problems.join("; "))]
    ConfigurationError { bank: String, problems: Vec<String> },

    #[error(
        "Conflicting values for {concept} in columns {headers:?} at row {row}: {values:?}"
    )]
    ConflictError {
        concept: String,
        headers: Vec<String>,
        row: usize,
        values: Vec<String>,
    },

    #[error("CSV file not found: {path}")]
    FileNotFoundError { path: String },

    #[error("Could not decode CSV file {path} as {encoding}")]
    DecodeError { path: String, encoding: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Config validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::ValidationError { .. } => ErrorSeverity::Medium,
            EtlError::ConflictError { .. }
            | EtlError::DecodeError { .. }
            | EtlError::FileNotFoundError { .. }
            | EtlError::CsvError(_) => ErrorSeverity::High,
            EtlError::ConfigurationError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::Critical,
            EtlError::IoError(_) | EtlError::SerializationError(_) => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ConfigurationError { .. } => {
                "Fix the bank definition: encoding, delimiter, row offsets, filename and mandatory column mappings"
            }
            EtlError::ConflictError { .. } => {
                "Inspect the source file: two columns mapped to the same concept disagree"
            }
            EtlError::FileNotFoundError { .. } => {
                "Check banks_base_path and that <base>/<bank>/<csv_filename> exists"
            }
            EtlError::DecodeError { .. } => "Check the csv_encoding configured for this bank",
            EtlError::ValidationError { .. } => {
                "Export a longer statement or lower settings.min_rows"
            }
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => "Check the TOML configuration file",
            EtlError::CsvError(_) => "Check the csv_delimiter and csv_header_row for this bank",
            EtlError::IoError(_) | EtlError::SerializationError(_) => {
                "Check file permissions and available disk space"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
