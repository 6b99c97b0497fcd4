//! Application wiring for the `weekly-preview` binary.
//!
//! [`App`] builds a [`PreviewUpdater`](crate::preview::PreviewUpdater) over a
//! markdown file, hands it to a [`Ticker`](crate::ticker::Ticker), and keeps
//! it running until the process ends.

mod event_loop;

pub use event_loop::Running;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};

use crate::document::ComrakHtmlRenderer;
use crate::preview::{FileTarget, OutputTarget, StandalonePage, StdoutTarget};
use crate::ticker::DEFAULT_INTERVAL;

/// Boxed output target that can move onto the ticker thread.
pub type DynTarget = Box<dyn OutputTarget + Send>;

/// Live preview of one markdown file.
#[derive(Debug, Clone)]
pub struct App {
    source_path: PathBuf,
    output_path: Option<PathBuf>,
    interval: Duration,
    watch_enabled: bool,
    standalone: bool,
    highlight: bool,
}

impl App {
    /// Create an app previewing `source_path` every second.
    ///
    /// Live mode needs [`App::with_output`]; without it only
    /// [`App::render_once`] works, printing to stdout.
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self {
            source_path: source_path.into(),
            output_path: None,
            interval: DEFAULT_INTERVAL,
            watch_enabled: false,
            standalone: false,
            highlight: false,
        }
    }

    /// Write HTML to this file.
    #[must_use]
    pub fn with_output(mut self, path: Option<PathBuf>) -> Self {
        self.output_path = path;
        self
    }

    /// Set the polling interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Wake early on filesystem events for the source file.
    #[must_use]
    pub const fn with_watch(mut self, enabled: bool) -> Self {
        self.watch_enabled = enabled;
        self
    }

    /// Wrap output in a complete HTML page.
    #[must_use]
    pub const fn with_standalone(mut self, enabled: bool) -> Self {
        self.standalone = enabled;
        self
    }

    /// Syntax-highlight fenced code blocks.
    #[must_use]
    pub const fn with_highlight(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    fn renderer(&self) -> ComrakHtmlRenderer {
        ComrakHtmlRenderer::new().with_highlighting(self.highlight)
    }

    /// Target for a single render: the output file, or stdout.
    fn once_target(&self) -> DynTarget {
        match &self.output_path {
            Some(path) => self.wrap(Box::new(FileTarget::new(path))),
            None => self.wrap(Box::new(StdoutTarget)),
        }
    }

    /// Target for live mode. Stdout only appends, so an output file is required.
    fn live_target(&self) -> Result<DynTarget> {
        let Some(path) = &self.output_path else {
            bail!(
                "Live preview needs an output file (--output <PATH>); \
                 use --once to print to stdout"
            );
        };
        Ok(self.wrap(Box::new(FileTarget::new(path))))
    }

    fn wrap(&self, base: DynTarget) -> DynTarget {
        if self.standalone {
            Box::new(StandalonePage::new(base, self.page_title()))
        } else {
            base
        }
    }

    fn page_title(&self) -> String {
        self.source_path
            .file_name()
            .map_or_else(|| self.source_path.display().to_string(), |name| {
                name.to_string_lossy().into_owned()
            })
    }
}

#[cfg(test)]
mod tests;
