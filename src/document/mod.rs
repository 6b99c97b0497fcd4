//! Markdown parsing and HTML rendering.
//!
//! This module handles:
//! - Parsing markdown into a comrak syntax tree
//! - Rendering that tree to an HTML fragment
//! - Wrapping a fragment into a standalone preview page
//!
//! The updater only sees the [`MarkdownParser`] and [`HtmlRenderer`] traits,
//! so tests and embedders can swap either side.

mod html;
mod parser;

pub use html::{ComrakHtmlRenderer, standalone_page};
pub use parser::ComrakParser;

use comrak::Arena;
use comrak::nodes::AstNode;

use crate::error::Result;

/// Arena that owns every node of one parsed [`Tree`].
///
/// One arena is created per render and dropped with it.
pub type TreeArena<'a> = Arena<AstNode<'a>>;

/// Root node of a parsed markdown document.
pub type Tree<'a> = &'a AstNode<'a>;

/// Converts markdown text into a [`Tree`].
///
/// Parsing is total: every string is valid markdown.
pub trait MarkdownParser {
    fn parse<'a>(&self, arena: &'a TreeArena<'a>, text: &str) -> Tree<'a>;
}

/// Converts a [`Tree`] into HTML markup.
pub trait HtmlRenderer {
    /// Render `tree` to a markup string.
    ///
    /// # Errors
    /// Returns an error if the renderer cannot produce UTF-8 markup.
    fn render(&self, tree: Tree<'_>) -> Result<String>;
}

impl<P: MarkdownParser + ?Sized> MarkdownParser for Box<P> {
    fn parse<'a>(&self, arena: &'a TreeArena<'a>, text: &str) -> Tree<'a> {
        (**self).parse(arena, text)
    }
}

impl<R: HtmlRenderer + ?Sized> HtmlRenderer for Box<R> {
    fn render(&self, tree: Tree<'_>) -> Result<String> {
        (**self).render(tree)
    }
}

/// Render markdown to an HTML fragment with the default comrak collaborators.
///
/// # Example
///
/// ```
/// use weekly_preview::document::markdown_to_html;
///
/// let html = markdown_to_html("# Title").unwrap();
/// assert_eq!(html, "<h1>Title</h1>\n");
/// ```
///
/// # Errors
/// Returns an error if rendering fails.
pub fn markdown_to_html(text: &str) -> Result<String> {
    let arena = TreeArena::new();
    let tree = ComrakParser::default().parse(&arena, text);
    ComrakHtmlRenderer::default().render(tree)
}
