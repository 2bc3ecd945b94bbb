/// Convenience result type used across the crate.
pub type ArborResult<T> = Result<T, ArborError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Asset, recolor and collaborator failures are recoverable: the engine converts them into
/// [`crate::Notice`]s or fallback chat messages at the boundary where they occur.
#[derive(thiserror::Error, Debug)]
pub enum ArborError {
    /// A template asset is missing or could not be parsed.
    #[error("asset load error: {key}: {reason}")]
    AssetLoad {
        /// Human readable asset key (e.g. `roots/fillable`).
        key: String,
        /// Underlying cause.
        reason: String,
    },

    /// A fillable asset could not be recolored.
    #[error("recolor error: {0}")]
    Recolor(String),

    /// The external assistant failed.
    #[error("collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    /// A history index outside `0..len` was requested.
    #[error("history index {step} out of bounds (len {len})")]
    HistoryBounds {
        /// Requested index.
        step: usize,
        /// History length at the time of the request.
        len: usize,
    },

    /// A stage transition was refused by the submission gate.
    #[error("stage gate: {0}")]
    Gate(String),

    /// Invalid caller-provided data or an operation not allowed in the current state.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ArborError {
    /// Build an [`ArborError::AssetLoad`] value.
    pub fn asset_load(key: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::AssetLoad {
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an [`ArborError::Recolor`] value.
    pub fn recolor(msg: impl Into<String>) -> Self {
        Self::Recolor(msg.into())
    }

    /// Build an [`ArborError::Gate`] value.
    pub fn gate(msg: impl Into<String>) -> Self {
        Self::Gate(msg.into())
    }

    /// Build an [`ArborError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build an [`ArborError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ArborError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

/// Failures reported by the external assistant service.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    /// Transport-level failure (DNS, connection reset, timeout).
    #[error("network: {0}")]
    Network(String),

    /// Missing or rejected credentials.
    #[error("auth: {0}")]
    Auth(String),

    /// The service asked the client to slow down.
    #[error("rate limited{}", retry_suffix(.retry_after_secs))]
    RateLimited {
        /// Suggested wait before retrying, if the service sent one.
        retry_after_secs: Option<u64>,
    },

    /// The service answered with something that is not usable text.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The dispatcher went away before a reply was produced.
    #[error("assistant worker disconnected")]
    Disconnected,
}

fn retry_suffix(retry_after_secs: &Option<u64>) -> String {
    retry_after_secs
        .map(|s| format!(" (retry after {s}s)"))
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
