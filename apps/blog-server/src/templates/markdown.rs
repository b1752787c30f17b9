//! Markdown rendering for post bodies.
//!
//! Raw HTML embedded in a body is escaped, not passed through.

use pulldown_cmark::{Event, Options, Parser, html as md_html};

fn parser(markdown: &str) -> impl Iterator<Item = Event<'_>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    })
}

/// Render Markdown to an HTML fragment.
pub fn render_markdown(markdown: &str) -> String {
    let mut html_output = String::with_capacity(markdown.len() * 2);
    md_html::push_html(&mut html_output, parser(markdown));
    html_output
}

/// The text a reader sees once the Markdown is rendered, markup dropped.
pub fn plain_text(markdown: &str) -> String {
    let mut text = String::with_capacity(markdown.len());
    for event in parser(markdown) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::End(_) => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Keep the first `limit` words, appending an ellipsis if anything was cut.
pub fn truncate_words(text: &str, limit: usize) -> String {
    let mut words = text.split_whitespace();
    let kept: Vec<&str> = words.by_ref().take(limit).collect();
    let mut out = kept.join(" ");
    if words.next().is_some() {
        out.push_str(" …");
    }
    out
}

/// Plain-text summary of a post body: its first `limit` rendered words.
pub fn summary(markdown: &str, limit: usize) -> String {
    truncate_words(&plain_text(markdown), limit)
}
