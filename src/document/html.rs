//! HTML rendering with comrak.

use comrak::plugins::syntect::SyntectAdapter;
use comrak::{Options, Plugins, format_html, format_html_with_plugins};

use super::parser::configure_extensions;
use super::{HtmlRenderer, Tree};
use crate::error::{PreviewError, Result};

const HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// Renders a comrak tree to an HTML fragment.
///
/// Raw HTML in the source is passed through untouched; the output is not
/// sanitized.
pub struct ComrakHtmlRenderer {
    highlighter: Option<SyntectAdapter>,
}

impl ComrakHtmlRenderer {
    pub fn new() -> Self {
        Self { highlighter: None }
    }

    /// Highlight fenced code blocks with syntect, using inline styles.
    #[must_use]
    pub fn with_highlighting(mut self, enabled: bool) -> Self {
        self.highlighter = enabled.then(|| SyntectAdapter::new(Some(HIGHLIGHT_THEME)));
        self
    }

    pub const fn highlighting(&self) -> bool {
        self.highlighter.is_some()
    }
}

impl Default for ComrakHtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComrakHtmlRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComrakHtmlRenderer")
            .field("highlighting", &self.highlighting())
            .finish()
    }
}

impl HtmlRenderer for ComrakHtmlRenderer {
    fn render(&self, tree: Tree<'_>) -> Result<String> {
        let mut options = Options::default();
        configure_extensions(&mut options);
        options.render.unsafe_ = true;

        let mut out = Vec::new();
        let written = if let Some(adapter) = &self.highlighter {
            let mut plugins = Plugins::default();
            plugins.render.codefence_syntax_highlighter = Some(adapter);
            format_html_with_plugins(tree, &options, &mut out, &plugins)
        } else {
            format_html(tree, &options, &mut out)
        };
        written.map_err(|err| PreviewError::render(err.to_string()))?;

        String::from_utf8(out).map_err(|_| PreviewError::render("renderer produced invalid UTF-8"))
    }
}

/// Wrap a rendered fragment into a self-contained HTML page.
///
/// The fragment lands in `#Preview .Weekly`, the same container the
/// in-browser editor renders into.
///
/// # Errors
/// Returns an error if the escaped title is not valid UTF-8.
pub fn standalone_page(title: &str, body: &str) -> Result<String> {
    let mut escaped = Vec::with_capacity(title.len());
    comrak::html::escape(&mut escaped, title.as_bytes())
        .map_err(|err| PreviewError::render(err.to_string()))?;
    let title = String::from_utf8(escaped)
        .map_err(|_| PreviewError::render("page title is not valid UTF-8"))?;

    Ok(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <div id=\"Preview\">\n\
         <div class=\"Weekly\">\n\
         {body}\
         </div>\n\
         </div>\n\
         </body>\n\
         </html>\n"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ComrakParser, MarkdownParser, TreeArena};

    fn render_with(renderer: &ComrakHtmlRenderer, text: &str) -> String {
        let arena = TreeArena::new();
        let tree = ComrakParser::default().parse(&arena, text);
        renderer.render(tree).unwrap()
    }

    #[test]
    fn test_render_paragraph() {
        let html = render_with(&ComrakHtmlRenderer::default(), "Hello world");
        assert_eq!(html, "<p>Hello world</p>\n");
    }

    #[test]
    fn test_render_passes_raw_html_through() {
        let html = render_with(&ComrakHtmlRenderer::default(), "<span class=\"x\">hi</span>");
        assert!(html.contains("<span class=\"x\">hi</span>"), "got: {html}");
    }

    #[test]
    fn test_render_gfm_strikethrough_and_tasklist() {
        let renderer = ComrakHtmlRenderer::default();
        assert!(render_with(&renderer, "~~gone~~").contains("<del>gone</del>"));
        let tasks = render_with(&renderer, "- [x] done\n- [ ] todo");
        assert!(tasks.contains("type=\"checkbox\""), "got: {tasks}");
    }

    #[test]
    fn test_render_table() {
        let html = render_with(&ComrakHtmlRenderer::default(), "| a |\n|---|\n| 1 |");
        assert!(html.contains("<table>"), "got: {html}");
        assert!(html.contains("<td>1</td>"), "got: {html}");
    }

    #[test]
    fn test_highlighting_adds_inline_styles_to_code() {
        let renderer = ComrakHtmlRenderer::new().with_highlighting(true);
        assert!(renderer.highlighting());
        let html = render_with(&renderer, "```rust\nfn main() {}\n```");
        assert!(html.contains("style="), "highlighted code should carry styles: {html}");
        assert!(html.contains("main"));
    }

    #[test]
    fn test_plain_code_block_without_highlighting() {
        let html = render_with(&ComrakHtmlRenderer::default(), "```\nlet x = 1;\n```");
        assert_eq!(html, "<pre><code>let x = 1;\n</code></pre>\n");
    }

    #[test]
    fn test_standalone_page_wraps_fragment() {
        let page = standalone_page("notes <draft>.md", "<h1>Title</h1>\n").unwrap();
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>notes &lt;draft&gt;.md</title>"));
        assert!(page.contains("<div class=\"Weekly\">\n<h1>Title</h1>\n</div>"));
        assert!(page.contains("<div id=\"Preview\">"));
    }

    #[test]
    fn test_standalone_page_escapes_quotes_and_ampersands_in_title() {
        let page = standalone_page("Q&A \"week 3\"", "").unwrap();
        assert!(page.contains("<title>Q&amp;A &quot;week 3&quot;</title>"), "got: {page}");
    }
}
