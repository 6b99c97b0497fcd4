//! Markdown parsing with comrak.

use comrak::{Options, parse_document};

use super::{MarkdownParser, Tree, TreeArena};

/// Parses markdown with comrak's GFM extensions enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComrakParser {
    _private: (),
}

impl MarkdownParser for ComrakParser {
    fn parse<'a>(&self, arena: &'a TreeArena<'a>, text: &str) -> Tree<'a> {
        let mut options = Options::default();
        configure_extensions(&mut options);
        parse_document(arena, text, &options)
    }
}

/// Extension set shared by parsing and rendering.
///
/// The renderer needs the same flags so extension nodes (tables, task items,
/// footnotes) are emitted with their matching markup.
pub(super) fn configure_extensions(options: &mut Options) {
    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;

    // Emoji shortcodes like :tada:
    options.extension.shortcodes = true;
}
