use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{PreviewError, Result};

/// The live input holding the markdown being edited.
///
/// The updater only ever reads from a source.
pub trait TextSource {
    /// Current content of the source.
    ///
    /// # Errors
    /// Returns an error if the content cannot be read right now.
    fn value(&self) -> Result<String>;
}

/// A markdown file on disk, re-read on every call.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for FileSource {
    fn value(&self) -> Result<String> {
        let bytes = std::fs::read(&self.path).map_err(|source| PreviewError::Read {
            path: self.path.clone(),
            source,
        })?;
        // Editors occasionally save in legacy encodings; keep previewing.
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }
}

/// In-memory text shared between an editor and the updater.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedText {
    inner: Arc<Mutex<String>>,
}

impl SharedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(text.into())),
        }
    }

    /// Replace the buffer content.
    ///
    /// # Errors
    /// Returns an error if the buffer lock is poisoned.
    pub fn set(&self, text: impl Into<String>) -> Result<()> {
        *self.inner.lock().map_err(|_| PreviewError::Poisoned)? = text.into();
        Ok(())
    }
}

impl TextSource for SharedText {
    fn value(&self) -> Result<String> {
        self.inner
            .lock()
            .map(|text| text.clone())
            .map_err(|_| PreviewError::Poisoned)
    }
}

impl<S: TextSource + ?Sized> TextSource for &S {
    fn value(&self) -> Result<String> {
        (**self).value()
    }
}
