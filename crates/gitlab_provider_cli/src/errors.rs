use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the `gitlab-hooks` command line tool.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading or saving configuration.
    ///
    /// Covers the TOML configuration file, the desired attributes file and the
    /// environment variables that supply the connection settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// A lifecycle operation failed in the provider.
    #[error(transparent)]
    Provider(#[from] gitlab_provider::Error),

    /// Command output could not be rendered as JSON.
    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The local state file could not be read or written.
    #[error("State file error: {0}")]
    State(String),
}
