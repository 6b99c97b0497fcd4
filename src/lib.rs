#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    clippy::module_name_repetitions
)]

//! # Weekly Preview
//!
//! Live markdown-to-HTML preview.
//!
//! A [`PreviewUpdater`](preview::PreviewUpdater) watches a text source by
//! polling it, and whenever the content differs from what it rendered last
//! it parses the markdown, renders HTML, and replaces the output target.
//!
//! ## Modules
//!
//! - [`preview`]: Sources, targets, and the updater
//! - [`document`]: Markdown parsing and HTML rendering (comrak)
//! - [`ticker`]: Recurring timer with a stop handle
//! - [`watcher`]: Optional filesystem wake-ups
//! - [`app`]: Wiring used by the binary
//! - [`config`]: Saved flag defaults

pub mod app;
pub mod config;
pub mod document;
pub mod error;
pub mod perf;
pub mod preview;
pub mod ticker;
pub mod watcher;

pub use error::PreviewError;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::App;
    pub use crate::document::{ComrakHtmlRenderer, ComrakParser, HtmlRenderer, MarkdownParser};
    pub use crate::error::PreviewError;
    pub use crate::preview::{OutputTarget, PreviewUpdater, TextSource, Tick};
    pub use crate::ticker::{Ticker, TickerHandle};
}
