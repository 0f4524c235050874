use thiserror::Error;

/// Top-level error type for the Critique core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The identity document could not be read. Fatal at startup: the
    /// document defines every behavioural constraint the assistant follows.
    #[error("Identity document not found at {path}: {source}")]
    ResourceNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
