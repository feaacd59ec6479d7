//! Error types for blockreplace-core

/// Result type for blockreplace-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a pass or fail configuration
///
/// Conditions local to one block (absent attributes, malformed tables,
/// rejected writes) never surface here; they are skipped or reported through
/// [`crate::PassWarning`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The root tree could not be read; nothing was visited
    #[error("Unable to read the block tree: {source}")]
    TreeUnavailable {
        #[source]
        source: blockreplace_tree::Error,
    },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Invalid host version '{version}': {reason}")]
    Version { version: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Logging setup failed: {message}")]
    Logging { message: String },
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
