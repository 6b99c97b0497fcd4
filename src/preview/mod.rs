//! Live preview: observe a text source and keep an output target rendered.
//!
//! [`PreviewUpdater`] owns the last content it rendered and re-renders only
//! when a [`poll`](PreviewUpdater::poll) sees different text. It holds no
//! timer of its own; [`crate::ticker`] drives it on an interval, and tests
//! drive it by calling `poll` directly.

mod source;
mod target;

pub use source::{FileSource, SharedText, TextSource};
pub use target::{FileTarget, OutputTarget, SharedMarkup, StandalonePage, StdoutTarget};

use tracing::debug;

use crate::document::{ComrakHtmlRenderer, ComrakParser, HtmlRenderer, MarkdownParser, TreeArena};
use crate::error::Result;

/// Read `source`, render it, and overwrite `target` with the markup.
///
/// # Errors
/// Returns an error if the source cannot be read, the renderer fails, or the
/// target cannot be written.
pub fn render<S, T, P, R>(source: &S, target: &mut T, parser: &P, renderer: &R) -> Result<()>
where
    S: TextSource + ?Sized,
    T: OutputTarget + ?Sized,
    P: MarkdownParser + ?Sized,
    R: HtmlRenderer + ?Sized,
{
    let text = source.value()?;
    render_text(&text, target, parser, renderer)
}

/// Render already-read `text` into `target`.
///
/// The markup reaches the target exactly as the renderer produced it.
///
/// # Errors
/// Returns an error if the renderer fails or the target cannot be written.
pub fn render_text<T, P, R>(text: &str, target: &mut T, parser: &P, renderer: &R) -> Result<()>
where
    T: OutputTarget + ?Sized,
    P: MarkdownParser + ?Sized,
    R: HtmlRenderer + ?Sized,
{
    let _scope = crate::perf::scope("preview.render");
    let arena = TreeArena::new();
    let tree = parser.parse(&arena, text);
    let markup = renderer.render(tree)?;
    crate::perf::log_event(
        "preview.render",
        format!("source_bytes={} markup_bytes={}", text.len(), markup.len()),
    );
    target.replace(&markup)
}

/// Outcome of one [`PreviewUpdater::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Source matched the last rendered content; nothing was written.
    Unchanged,
    /// Source changed and the target was re-rendered.
    Rendered,
}

/// Keeps an output target in sync with a text source.
#[derive(Debug)]
pub struct PreviewUpdater<S, T, P = ComrakParser, R = ComrakHtmlRenderer> {
    source: S,
    target: T,
    parser: P,
    renderer: R,
    last_seen: String,
    renders: usize,
}

impl<S, T> PreviewUpdater<S, T>
where
    S: TextSource,
    T: OutputTarget,
{
    /// Create an updater using the comrak parser and renderer.
    ///
    /// # Errors
    /// See [`PreviewUpdater::new`].
    pub fn with_defaults(source: S, target: T) -> Result<Self> {
        Self::new(source, target, ComrakParser::default(), ComrakHtmlRenderer::default())
    }
}

impl<S, T, P, R> PreviewUpdater<S, T, P, R>
where
    S: TextSource,
    T: OutputTarget,
    P: MarkdownParser,
    R: HtmlRenderer,
{
    /// Create an updater and render the source's current content right away.
    ///
    /// # Errors
    /// Returns an error if the first read, render, or write fails. The
    /// updater does not start in that case.
    pub fn new(source: S, mut target: T, parser: P, renderer: R) -> Result<Self> {
        let last_seen = source.value()?;
        render_text(&last_seen, &mut target, &parser, &renderer)?;
        debug!(bytes = last_seen.len(), "initial preview rendered");

        Ok(Self {
            source,
            target,
            parser,
            renderer,
            last_seen,
            renders: 1,
        })
    }

    /// Check the source once and re-render if its content changed.
    ///
    /// The snapshot is updated before rendering, so content that fails to
    /// render is not retried until it changes again.
    ///
    /// # Errors
    /// Returns an error if the source cannot be read (the snapshot is left
    /// untouched) or if rendering the new content fails.
    pub fn poll(&mut self) -> Result<Tick> {
        let current = self.source.value()?;
        if current == self.last_seen {
            return Ok(Tick::Unchanged);
        }

        debug!(
            old_bytes = self.last_seen.len(),
            new_bytes = current.len(),
            "source changed, re-rendering"
        );
        self.last_seen = current;
        self.renders += 1;
        render_text(&self.last_seen, &mut self.target, &self.parser, &self.renderer)?;
        Ok(Tick::Rendered)
    }

    /// Content of the most recent render.
    pub fn last_seen(&self) -> &str {
        &self.last_seen
    }

    /// Number of renders triggered, including the initial one.
    pub const fn render_count(&self) -> usize {
        self.renders
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    pub const fn target(&self) -> &T {
        &self.target
    }

    /// Release the collaborators.
    pub fn into_parts(self) -> (S, T, P, R) {
        (self.source, self.target, self.parser, self.renderer)
    }
}
