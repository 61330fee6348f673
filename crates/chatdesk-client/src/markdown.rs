use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use url::{ParseError, Url};

/// URL schemes allowed in rendered links and images
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// Render markdown to sanitized HTML.
///
/// Raw HTML in the source is shown as text and unsafe link targets are
/// replaced with `#`, so the output can be assigned to `innerHTML`.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let parser = Parser::new_ext(markdown, options).map(sanitize_event);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    add_code_highlighting_classes(&html_output)
}

fn sanitize_event(event: Event<'_>) -> Event<'_> {
    match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        Event::Start(Tag::HtmlBlock) => Event::Start(Tag::Paragraph),
        Event::End(TagEnd::HtmlBlock) => Event::End(TagEnd::Paragraph),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => Event::Start(Tag::Link {
            link_type,
            dest_url: sanitize_url(dest_url),
            title,
            id,
        }),
        Event::Start(Tag::Image { link_type, dest_url, title, id }) => Event::Start(Tag::Image {
            link_type,
            dest_url: sanitize_url(dest_url),
            title,
            id,
        }),
        other => other,
    }
}

fn sanitize_url(url: CowStr<'_>) -> CowStr<'_> {
    if is_safe_url(&url) {
        url
    } else {
        CowStr::Borrowed("#")
    }
}

/// Relative URLs and the schemes in [`SAFE_SCHEMES`] pass.
pub fn is_safe_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => SAFE_SCHEMES.contains(&parsed.scheme()),
        Err(ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

/// Tag code blocks with the highlight.js class
fn add_code_highlighting_classes(html: &str) -> String {
    html.replace("<pre><code class=\"language-", "<pre><code class=\"hljs language-")
        .replace("<pre><code>", "<pre><code class=\"hljs\">")
}

/// Render a message with markdown support
pub fn render_message_content(content: &str, use_markdown: bool) -> String {
    if use_markdown {
        render_markdown(content)
    } else {
        crate::utils::escape_html(content).replace('\n', "<br>")
    }
}
