use std::path::PathBuf;

/// Errors that can occur in gffbars.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    Parameter(String),

    #[error("I/O error: {source} ({path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("annotation parsing error: {0}")]
    Annotation(String),

    #[error("chart rendering error: {message} ({path})")]
    Render { path: PathBuf, message: String },
}

impl Error {
    /// Convenience for wrapping an `io::Error` with a path context.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }

    /// Wrap a renderer failure for the chart being written to `path`.
    pub fn render(message: impl ToString, path: impl Into<PathBuf>) -> Self {
        Self::Render {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            source: err,
            path: PathBuf::from("<unknown>"),
        }
    }
}
