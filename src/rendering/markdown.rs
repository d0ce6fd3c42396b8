/*!
 * Markdown pass.
 *
 * Converts placeholder-bearing text to HTML with line-break-sensitive
 * paragraphs. Raw HTML in the source is emitted as escaped text and links
 * with script-capable schemes are neutralised, so definition content can
 * never execute.
 */

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

use super::escape::is_script_url;
use super::math::{strip_placeholders, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};

fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render markdown to HTML, turning single newlines into `<br />`
pub fn to_html(text: &str) -> String {
    let mut image_depth = 0usize;

    let events = Parser::new_ext(text, markdown_options()).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: neutralise_url(dest_url),
            title: without_placeholders(title),
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => {
            image_depth += 1;
            Event::Start(Tag::Image {
                link_type,
                dest_url: neutralise_url(dest_url),
                title: without_placeholders(title),
                id,
            })
        }
        Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(without_placeholders(info))))
        }
        Event::End(TagEnd::Image) => {
            image_depth = image_depth.saturating_sub(1);
            Event::End(TagEnd::Image)
        }
        // Alt text, titles and fence info end up in attributes, where a math element cannot live
        Event::Text(text) if image_depth > 0 => Event::Text(without_placeholders(text)),
        other => other,
    });

    let mut output = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut output, events);
    output
}

fn without_placeholders(text: CowStr<'_>) -> CowStr<'_> {
    if text.contains([PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE]) {
        CowStr::from(strip_placeholders(&text))
    } else {
        text
    }
}

fn neutralise_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_script_url(&url) {
        CowStr::Borrowed("#")
    } else {
        url
    }
}
