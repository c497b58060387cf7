//! Markdown to sanitized HTML

use pulldown_cmark::{Event, Options, Parser, html};

/// Render GitHub-flavoured Markdown, keeping single line breaks, and strip
/// anything unsafe (scripts, event handlers, `javascript:` links) from the
/// result.
pub fn markdown_to_html(source: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut rendered = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut rendered, parser);
    ammonia::clean(&rendered)
}
