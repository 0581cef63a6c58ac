use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, FilemodError>;

#[derive(Debug, thiserror::Error)]
pub enum FilemodError {
    /// Malformed include/exclude patterns or missing required options.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The virtual tree failed underneath the run.
    #[error("Filesystem error: {0}")]
    Tree(#[from] unifs::Error),

    /// A lifecycle hook failed. The whole run is aborted; no command computed
    /// before the failure survives.
    #[error("Handler failed at {path}: {source}")]
    Handler {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl FilemodError {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        FilemodError::Configuration {
            message: message.into(),
        }
    }

    pub fn handler<P: Into<PathBuf>>(path: P, source: anyhow::Error) -> Self {
        FilemodError::Handler {
            path: path.into(),
            source,
        }
    }
}
