//! Markdown input handling.
//!
//! Rarity is about the words a reader sees. Code, HTML, and frontmatter are
//! full of identifiers that would all score as maximally rare, so they are
//! dropped before tokenizing. Headings, table cells, list items, and link
//! text stay: they are prose too.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Reduce markdown to the text a reader would see, minus code.
///
/// Removes fenced and indented code blocks, inline code, raw HTML, and YAML
/// frontmatter. Block boundaries become spaces so words never fuse across
/// them.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn visible_text(text: &str) -> String {
    let text = strip_frontmatter(text);

    let options =
        Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES;
    let parser = Parser::new_ext(text, options);

    let mut result = String::with_capacity(text.len() / 2);
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(t) if !in_code_block => result.push_str(&t),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::TableCell
                | TagEnd::BlockQuote(_),
            ) => result.push(' '),
            _ => {}
        }
    }

    result
}

/// Strip YAML frontmatter delimited by `---` lines.
fn strip_frontmatter(text: &str) -> &str {
    let trimmed = text.trim_start();
    let Some(after_opening) = trimmed.strip_prefix("---") else {
        return text;
    };
    let Some(close_pos) = after_opening.find("\n---") else {
        return text;
    };

    let remainder = &after_opening[close_pos + 4..];
    remainder.strip_prefix('\n').unwrap_or(remainder)
}
