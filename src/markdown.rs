//! Markdown rendering for bot replies.
//!
//! Bot messages are trusted backend content and rendered as rich markup;
//! user text never passes through here (it is rendered as plain text nodes,
//! which the view layer escapes).

use pulldown_cmark::{Event, Options, Parser, html};

/// Renders backend markdown to an HTML fragment.
///
/// Tables and strikethrough are enabled, and soft line breaks become hard
/// breaks, so a single newline in a reply renders as a line break.
pub fn render(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_inline_emphasis() {
        let html = render("some **bold** advice");
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn single_newline_becomes_line_break() {
        let html = render("first line\nsecond line");
        assert!(html.contains("<br"));
    }

    #[test]
    fn renders_fenced_code_blocks() {
        let html = render("```\nlet x = 1;\n```");
        assert!(html.contains("<code>"));
        assert!(html.contains("let x = 1;"));
    }

    #[test]
    fn plain_text_becomes_paragraph() {
        assert_eq!(render("hello"), "<p>hello</p>\n");
    }
}
