//! Domain error types.

/// Top-level error type for housewatch.
#[derive(Debug, thiserror::Error)]
pub enum HousewatchError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    /// The disclosure feed rejected the API key. Aborts the whole run.
    #[error("disclosure feed rejected the API key (HTTP 401)")]
    FeedUnauthorized,

    #[error("feed error fetching {context}: {reason}")]
    Feed { context: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&HousewatchError> for std::process::ExitCode {
    fn from(err: &HousewatchError) -> Self {
        let code: u8 = match err {
            HousewatchError::Io(_) => 1,
            HousewatchError::ConfigParse { .. }
            | HousewatchError::ConfigMissing { .. }
            | HousewatchError::ConfigInvalid { .. } => 2,
            HousewatchError::Database { .. } | HousewatchError::DatabaseQuery { .. } => 3,
            HousewatchError::FeedUnauthorized => 4,
            HousewatchError::Feed { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
