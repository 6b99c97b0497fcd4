//! Errors raised while reading, rendering, or writing a preview.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("failed to read source {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write preview {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to render markdown: {message}")]
    Render { message: String },
    #[error("shared buffer lock poisoned")]
    Poisoned,
}

impl PreviewError {
    pub(crate) fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

pub type Result<T, E = PreviewError> = std::result::Result<T, E>;
