//! Markdown to HTML rendering for generated notes.
//!
//! The backend returns note bodies as Markdown; this renders the subset
//! the note generator actually emits: headers, bold/italic, flat lists,
//! links, code, and paragraph breaks. Tables, blockquotes, images and
//! nested lists are out of scope.

use std::sync::OnceLock;

use regex::Regex;

fn re(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).unwrap())
}

/// Render a Markdown string to an HTML fragment.
///
/// The input is split into blocks on blank lines and each block is
/// rendered on its own, so headers and lists keep their line anchors no
/// matter where they sit in the document. Empty input renders to an
/// empty string. No HTML escaping is applied; the input is trusted
/// backend output, not arbitrary user content.
pub fn to_html(markdown: &str) -> String {
    markdown
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .map(render_block)
        .collect()
}

/// Render one blank-line-delimited block: a header, a list run, a code
/// fence, or a paragraph.
fn render_block(block: &str) -> String {
    static H4: OnceLock<Regex> = OnceLock::new();
    static H3: OnceLock<Regex> = OnceLock::new();
    static H2: OnceLock<Regex> = OnceLock::new();
    static H1: OnceLock<Regex> = OnceLock::new();
    static BOLD_ITALIC: OnceLock<Regex> = OnceLock::new();
    static BOLD: OnceLock<Regex> = OnceLock::new();
    static ITALIC: OnceLock<Regex> = OnceLock::new();
    static BOLD_ALT: OnceLock<Regex> = OnceLock::new();
    static ITALIC_ALT: OnceLock<Regex> = OnceLock::new();
    static UNORDERED_ITEM: OnceLock<Regex> = OnceLock::new();
    static ORDERED_ITEM: OnceLock<Regex> = OnceLock::new();
    static LINK: OnceLock<Regex> = OnceLock::new();
    static CODE_BLOCK: OnceLock<Regex> = OnceLock::new();
    static INLINE_CODE: OnceLock<Regex> = OnceLock::new();
    static BREAK_BEFORE_ITEM: OnceLock<Regex> = OnceLock::new();
    static BREAK_AFTER_ITEM: OnceLock<Regex> = OnceLock::new();
    static LIST_RUN: OnceLock<Regex> = OnceLock::new();

    let block = block.trim_matches('\n');

    // Deepest header level first so `####` is never half-matched by `#`.
    let html = re(&H4, r"(?m)^#### (.*?)(\n|$)").replace_all(block, "<h4>$1</h4>");
    let html = re(&H3, r"(?m)^### (.*?)(\n|$)").replace_all(&html, "<h3>$1</h3>");
    let html = re(&H2, r"(?m)^## (.*?)(\n|$)").replace_all(&html, "<h2>$1</h2>");
    let html = re(&H1, r"(?m)^# (.*?)(\n|$)").replace_all(&html, "<h1>$1</h1>");

    let html = re(&BOLD_ITALIC, r"\*\*\*(.*?)\*\*\*")
        .replace_all(&html, "<strong><em>$1</em></strong>");
    let html = re(&BOLD, r"\*\*(.*?)\*\*").replace_all(&html, "<strong>$1</strong>");
    let html = re(&ITALIC, r"\*(.*?)\*").replace_all(&html, "<em>$1</em>");
    let html = re(&BOLD_ALT, r"__(.*?)__").replace_all(&html, "<strong>$1</strong>");
    let html = re(&ITALIC_ALT, r"_(.*?)_").replace_all(&html, "<em>$1</em>");

    let html = re(&UNORDERED_ITEM, r"(?m)^\s*[-*]\s+(.*)$").replace_all(&html, "<li>$1</li>");
    let html = re(&ORDERED_ITEM, r"(?m)^\s*\d+\.\s+(.*)$").replace_all(&html, "<li>$1</li>");

    let html = re(&LINK, r"\[(.*?)\]\((.*?)\)").replace_all(
        &html,
        r#"<a href="$2" target="_blank" rel="noopener noreferrer">$1</a>"#,
    );

    let html = re(&CODE_BLOCK, r"(?s)```(.*?)```")
        .replace_all(&html, "<pre><code>$1</code></pre>");
    let html = re(&INLINE_CODE, r"`([^`]+)`").replace_all(&html, "<code>$1</code>");

    let mut html = html.replace('\n', "<br />");

    // Wrap plain text in a paragraph; block-level output stands alone.
    if !html.starts_with("<h") && !html.starts_with("<li") && !html.starts_with("<pre") {
        html = format!("<p>{}</p>", html);
    }

    // Drop the line breaks that list conversion left between items.
    let html = re(&BREAK_BEFORE_ITEM, r"<br /><li>").replace_all(&html, "<li>");
    let html = re(&BREAK_AFTER_ITEM, r"<li>(.*?)<br />").replace_all(&html, "<li>$1");

    // Wrap each run of consecutive items in a single list.
    re(&LIST_RUN, r"(?:<li>.*?</li>)+")
        .replace_all(&html, |caps: &regex::Captures| {
            format!("<ul>{}</ul>", &caps[0])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(to_html(""), "");
    }

    #[test]
    fn test_headers() {
        assert_eq!(to_html("# Title"), "<h1>Title</h1>");
        assert_eq!(to_html("## Section"), "<h2>Section</h2>");
        assert_eq!(to_html("### Sub"), "<h3>Sub</h3>");
        assert_eq!(to_html("#### Minor"), "<h4>Minor</h4>");
    }

    #[test]
    fn test_header_consumes_its_newline() {
        let html = to_html("# Title\nBody text");
        assert_eq!(html, "<h1>Title</h1>Body text");
    }

    #[test]
    fn test_headers_after_blank_lines() {
        // The usual shape of generated notes: every block is separated
        // by a blank line, headers included.
        assert_eq!(
            to_html("# Title\n\nIntro text\n\n## Section One\n\n- point"),
            "<h1>Title</h1><p>Intro text</p><h2>Section One</h2><ul><li>point</li></ul>"
        );
    }

    #[test]
    fn test_header_never_swallows_following_blocks() {
        let html = to_html("## Summary\n\nFirst paragraph\n\nSecond paragraph");
        assert_eq!(
            html,
            "<h2>Summary</h2><p>First paragraph</p><p>Second paragraph</p>"
        );
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(to_html("**bold**"), "<p><strong>bold</strong></p>");
        assert_eq!(to_html("*italic*"), "<p><em>italic</em></p>");
        assert_eq!(
            to_html("***both***"),
            "<p><strong><em>both</em></strong></p>"
        );
        assert_eq!(to_html("__bold__"), "<p><strong>bold</strong></p>");
        assert_eq!(to_html("_italic_"), "<p><em>italic</em></p>");
    }

    #[test]
    fn test_unordered_list_is_wrapped() {
        assert_eq!(
            to_html("- first\n- second"),
            "<ul><li>first</li><li>second</li></ul>"
        );
    }

    #[test]
    fn test_ordered_list_is_wrapped() {
        assert_eq!(
            to_html("1. first\n2. second"),
            "<ul><li>first</li><li>second</li></ul>"
        );
    }

    #[test]
    fn test_list_items_keep_inline_markup() {
        assert_eq!(
            to_html("- **key** point"),
            "<ul><li><strong>key</strong> point</li></ul>"
        );
    }

    #[test]
    fn test_links() {
        assert_eq!(
            to_html("[Rust](https://rust-lang.org)"),
            r#"<p><a href="https://rust-lang.org" target="_blank" rel="noopener noreferrer">Rust</a></p>"#
        );
    }

    #[test]
    fn test_code() {
        assert_eq!(to_html("`let x = 1;`"), "<p><code>let x = 1;</code></p>");
        assert_eq!(
            to_html("```let x = 1;```"),
            "<pre><code>let x = 1;</code></pre>"
        );
    }

    #[test]
    fn test_paragraph_breaks() {
        assert_eq!(to_html("one\n\ntwo"), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_extra_blank_lines_are_ignored() {
        assert_eq!(to_html("one\n\n\n\ntwo"), "<p>one</p><p>two</p>");
    }

    #[test]
    fn test_single_line_breaks() {
        assert_eq!(to_html("one\ntwo"), "<p>one<br />two</p>");
    }
}
