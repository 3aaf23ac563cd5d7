//! Domain error types.

/// Why an outbound request produced no data.
///
/// Exchange lookups log it and carry on with nothing. Only a failed catalog
/// listing turns it into a [`BondExportError`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("malformed body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout => "timeout",
            FetchError::Transport(_) => "transport",
            FetchError::Status(_) => "status",
            FetchError::Decode(_) => "decode",
        }
    }
}

/// Top-level error type for bondexport.
#[derive(Debug, thiserror::Error)]
pub enum BondExportError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("{variable} not found in {file} or in the environment")]
    MissingToken { variable: String, file: String },

    #[error("instrument catalog unavailable: {0}")]
    Catalog(#[source] FetchError),

    #[error("cannot build HTTP client: {reason}")]
    HttpClient { reason: String },

    #[error("failed to write report {path}: {reason}")]
    Report { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BondExportError {
    /// Process exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            BondExportError::Io(_)
            | BondExportError::Report { .. }
            | BondExportError::HttpClient { .. } => 1,
            BondExportError::ConfigParse { .. }
            | BondExportError::ConfigInvalid { .. }
            | BondExportError::MissingToken { .. } => 2,
            BondExportError::Catalog(_) => 3,
        }
    }
}

impl From<&BondExportError> for std::process::ExitCode {
    fn from(err: &BondExportError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
