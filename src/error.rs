use thiserror::Error;

/// Errors raised by the audio core.
///
/// None of these ever leave a public playback entry point: the controller
/// logs them and carries on. They exist so backends and the registry can
/// report *why* something did not play.

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    #[error("No audio resource registered for '{0}'")]
    MissingResource(String),

    #[error("Playback rejected for '{name}': {reason}")]
    PlaybackRejected { name: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to initialize audio output stream: {0}")]
    StreamInitFailed(String),

    #[error("Failed to decode audio for '{name}': {reason}")]
    DecodeFailed { name: String, reason: String },

    #[error("Failed to load audio file: {path}: {reason}")]
    LoadFailed { path: String, reason: String },
}

impl AudioError {
    /// Shorthand used by backends that refuse a play request.
    pub fn rejected(name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        AudioError::PlaybackRejected {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
