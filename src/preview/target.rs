use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::document::standalone_page;
use crate::error::{PreviewError, Result};

/// The sink whose content is replaced with rendered markup.
///
/// Targets are write-only: the updater never reads them back.
pub trait OutputTarget {
    /// Replace the whole content of the target with `markup`.
    ///
    /// # Errors
    /// Returns an error if the target cannot be written.
    fn replace(&mut self, markup: &str) -> Result<()>;
}

/// An HTML file rewritten on every render.
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_err(&self, source: std::io::Error) -> PreviewError {
        PreviewError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl OutputTarget for FileTarget {
    fn replace(&mut self, markup: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| self.write_err(err))?;
        }
        std::fs::write(&self.path, markup).map_err(|err| self.write_err(err))
    }
}

/// Writes a render to stdout, followed by a flush.
///
/// Stdout cannot be rewound, so this only holds the latest render when it is
/// written once.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutTarget;

impl OutputTarget for StdoutTarget {
    fn replace(&mut self, markup: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(markup.as_bytes())
            .and_then(|()| out.flush())
            .map_err(|source| PreviewError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            })
    }
}

/// In-memory markup shared with whoever displays it.
///
/// Clones share the same buffer. The number of writes is tracked so callers
/// can tell a rewrite of identical markup apart from no write at all.
#[derive(Debug, Clone, Default)]
pub struct SharedMarkup {
    inner: Arc<Mutex<MarkupState>>,
}

#[derive(Debug, Default)]
struct MarkupState {
    markup: String,
    writes: usize,
}

impl SharedMarkup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current markup.
    ///
    /// # Errors
    /// Returns an error if the buffer lock is poisoned.
    pub fn markup(&self) -> Result<String> {
        self.inner
            .lock()
            .map(|state| state.markup.clone())
            .map_err(|_| PreviewError::Poisoned)
    }

    /// How many times the markup has been replaced.
    ///
    /// # Errors
    /// Returns an error if the buffer lock is poisoned.
    pub fn writes(&self) -> Result<usize> {
        self.inner
            .lock()
            .map(|state| state.writes)
            .map_err(|_| PreviewError::Poisoned)
    }
}

impl OutputTarget for SharedMarkup {
    fn replace(&mut self, markup: &str) -> Result<()> {
        let mut state = self.inner.lock().map_err(|_| PreviewError::Poisoned)?;
        markup.clone_into(&mut state.markup);
        state.writes += 1;
        Ok(())
    }
}

/// Wraps every fragment into a standalone page before handing it on.
#[derive(Debug, Clone)]
pub struct StandalonePage<T> {
    inner: T,
    title: String,
}

impl<T: OutputTarget> StandalonePage<T> {
    pub fn new(inner: T, title: impl Into<String>) -> Self {
        Self {
            inner,
            title: title.into(),
        }
    }

    pub const fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: OutputTarget> OutputTarget for StandalonePage<T> {
    fn replace(&mut self, markup: &str) -> Result<()> {
        self.inner.replace(&standalone_page(&self.title, markup)?)
    }
}

impl<T: OutputTarget + ?Sized> OutputTarget for Box<T> {
    fn replace(&mut self, markup: &str) -> Result<()> {
        (**self).replace(markup)
    }
}
