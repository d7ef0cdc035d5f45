/// Convenience result type used across Marionette.
pub type MarionetteResult<T> = Result<T, MarionetteError>;

/// Top-level error taxonomy used by rig, asset, and surface APIs.
#[derive(thiserror::Error, Debug)]
pub enum MarionetteError {
    /// Malformed rig description or invalid caller-provided values.
    #[error("validation error: {0}")]
    Validation(String),

    /// Vector art that could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Surface or bitmap allocation and drawing failures.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MarionetteError {
    /// Build a [`MarionetteError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MarionetteError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`MarionetteError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`MarionetteError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
