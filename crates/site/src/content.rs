//! Markdown rendering for product descriptions.

use comrak::{Options, markdown_to_html};

/// Render a product description to HTML.
///
/// GitHub-flavoured extensions are on; raw HTML in the source is escaped.
#[must_use]
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.render.hardbreaks = true;
    options.render.escape = true;

    markdown_to_html(content, &options)
}

/// First paragraph of a description as plain text, for card captions.
#[must_use]
pub fn summary(content: &str, max_chars: usize) -> String {
    let first = content
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty())
        .unwrap_or_default();
    let plain: String = first
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '#' | '`'))
        .collect();

    if plain.chars().count() <= max_chars {
        return plain;
    }
    let cut: String = plain.chars().take(max_chars).collect();
    let cut = cut.rsplit_once(' ').map_or(cut.as_str(), |(head, _)| head);
    format!("{}…", cut.trim_end())
}
