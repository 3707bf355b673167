use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // Input shape errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{entity} not found: id={id}")]
    NotFound { entity: &'static str, id: i64 },

    // State conflicts
    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Fixture {fixture_id} has already been played (match_id={match_id})")]
    AlreadyPlayed { fixture_id: i64, match_id: i64 },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Date/time parsing error: {0}")]
    DateTimeParse(String),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Create a validation error for malformed input
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error for the given entity kind and id
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Create a conflict error (duplicate fixture pairing and similar)
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create an already played error for a fixture that has a match
    pub fn already_played(fixture_id: i64, match_id: i64) -> Self {
        Self::AlreadyPlayed {
            fixture_id,
            match_id,
        }
    }

    /// Create a storage error with context
    pub fn storage_error(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a date/time parsing error with context
    pub fn datetime_parse_error(msg: impl Into<String>) -> Self {
        Self::DateTimeParse(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Check if error is a state conflict. `AlreadyPlayed` counts as one.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            AppError::Conflict { .. } | AppError::AlreadyPlayed { .. }
        )
    }

    /// Check if error is the simulator's already-played conflict.
    /// Callers simulating a whole season treat this as a no-op.
    pub fn is_already_played(&self) -> bool {
        matches!(self, AppError::AlreadyPlayed { .. })
    }

    /// Check if error indicates a missing season, fixture, club or player
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound { .. })
    }
}
