//! Error types for reframe-av.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or launching a transcode.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A transcode option is malformed: an unrecognized choice label, an
    /// empty input path or output name, or an output name with no usable
    /// file component.
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// The external tool could not be launched.
    #[error("failed to launch {tool}: {message}")]
    Launch { tool: String, message: String },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid option error.
    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::InvalidOption(message.into())
    }

    /// Create a launch error for the given tool.
    pub fn launch(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Launch {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
