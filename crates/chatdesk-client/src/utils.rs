use chatdesk_types::AttachedFile;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Display format of message timestamps, e.g. `09:05 PM`
pub const TIMESTAMP_FORMAT: &str = "%I:%M %p";

/// Current local time formatted like the chat store's timestamps
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Escape HTML to prevent XSS
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Everything outside the RFC 3986 unreserved set
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode an id for use as one URL path segment
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}

/// Message sent in place of empty text when only a file is attached
pub fn attachment_prompt(file: &AttachedFile) -> String {
    format!(
        "Please analyze the attached {} file \"{}\" and summarize its content.",
        file.file_type, file.name
    )
}

/// One-line description of a pending attachment, e.g. `report.pdf (pdf, 1234 chars)`
pub fn describe_attachment(file: &AttachedFile) -> String {
    let mut parts = vec![file.file_type.to_string(), format!("{} chars", file.text_len())];
    if let Some(pages) = file.metadata.get("pages").and_then(|p| p.as_u64()) {
        parts.push(format!("{} pages", pages));
    }
    if let Some(method) = &file.extraction_method {
        parts.push(method.clone());
    }
    format!("{} ({})", file.name, parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatdesk_types::FileType;
    use serde_json::json;

    fn pdf() -> AttachedFile {
        AttachedFile {
            name: "report.pdf".to_string(),
            file_type: FileType::Pdf,
            metadata: json!({"pages": 2}),
            extraction_method: Some("pypdf".to_string()),
            text: "abc".to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_safe_truncate() {
        assert_eq!(safe_truncate("short", 10), "short");
        assert_eq!(safe_truncate("héllo wörld", 8), "héllo...");
        assert_eq!(safe_truncate("abcdef", 2), "...");
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("abc-1_2.3~"), "abc-1_2.3~");
        assert_eq!(encode_path_segment("é"), "%C3%A9");
        assert_eq!(encode_path_segment("a b/c?d"), "a%20b%2Fc%3Fd");
    }

    #[test]
    fn test_attachment_prompt_names_file() {
        let prompt = attachment_prompt(&pdf());
        assert!(prompt.contains("pdf file \"report.pdf\""));
    }

    #[test]
    fn test_describe_attachment() {
        assert_eq!(describe_attachment(&pdf()), "report.pdf (pdf, 3 chars, 2 pages, pypdf)");
    }

    #[test]
    fn test_timestamp_shape() {
        let ts = now_timestamp();
        assert_eq!(ts.len(), 8);
        assert!(ts.ends_with("AM") || ts.ends_with("PM"));
    }
}
