//! Error types for Horizon Icons.

/// Result type alias for icon cache operations.
pub type Result<T> = std::result::Result<T, IconError>;

/// Errors that can occur while resolving icons.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IconError {
    /// The icon name could not be parsed.
    #[error("Invalid icon name '{0}'")]
    InvalidName(String),

    /// The icon was confirmed absent by its source.
    #[error("Icon '{0}' does not exist")]
    NotFound(String),

    /// The icon source could not be reached or returned no usable data.
    #[error("Icon source for '{provider}:{prefix}' is unavailable: {message}")]
    Unavailable {
        provider: String,
        prefix: String,
        message: String,
    },

    /// A custom loader reported a failure.
    #[error("Loader error: {0}")]
    Loader(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IconError {
    /// Create an unavailable-source error.
    pub fn unavailable(
        provider: impl Into<String>,
        prefix: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Unavailable {
            provider: provider.into(),
            prefix: prefix.into(),
            message: message.into(),
        }
    }

    /// Create a loader error.
    pub fn loader(message: impl Into<String>) -> Self {
        Self::Loader(message.into())
    }

    /// Returns `true` if this error means the source could not be consulted,
    /// as opposed to a definitive negative answer.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Loader(_))
    }
}
