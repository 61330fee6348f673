//! Core types shared by every chatdesk crate
//!
//! This crate holds the chat data model and the JSON payloads exchanged with
//! the chat store.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

pub mod protocol;

pub use protocol::*;

// ============================================================================
// Constants
// ============================================================================

/// Title the chat store gives a freshly created chat
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// Extensions accepted by the file processor, grouped by detected type
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff"];
pub const SUPPORTED_PDF_EXTENSIONS: &[&str] = &["pdf"];
pub const SUPPORTED_DOCX_EXTENSIONS: &[&str] = &["docx"];
pub const SUPPORTED_TEXT_EXTENSIONS: &[&str] = &["txt"];

// ============================================================================
// Chat Types
// ============================================================================

/// Opaque chat identifier assigned by the chat store
pub type ChatId = String;

/// Helper function to deserialize string or null values
pub fn deserialize_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        _ => Ok(String::new()),
    }
}

fn default_title() -> String {
    DEFAULT_CHAT_TITLE.to_string()
}

/// A persisted conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: ChatId,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Chronological order; the list position is authoritative
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Chat {
    pub fn new(id: impl Into<ChatId>) -> Self {
        Self {
            id: id.into(),
            title: default_title(),
            created_at: None,
            messages: Vec::new(),
        }
    }

    /// Title to show in lists, falling back to the default for blank titles
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            DEFAULT_CHAT_TITLE
        } else {
            &self.title
        }
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Label shown next to a rendered message
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(deserialize_with = "deserialize_string_or_null")]
    pub content: String,
    /// Display string only, never used for ordering
    #[serde(default, deserialize_with = "deserialize_string_or_null")]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_attachment: bool,
}

impl Message {
    pub fn user(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: timestamp.into(),
            has_attachment: false,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: timestamp.into(),
            has_attachment: false,
        }
    }

    pub fn with_attachment(mut self, has_attachment: bool) -> Self {
        self.has_attachment = has_attachment;
        self
    }
}

// ============================================================================
// Attachment Types
// ============================================================================

/// File category detected by the file processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Pdf,
    Docx,
    Text,
    #[serde(other)]
    Unknown,
}

impl FileType {
    /// Detect the type from a file name's extension (case-insensitive).
    /// Returns `None` for files the processor does not accept.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())?;

        let groups: [(FileType, &[&str]); 4] = [
            (FileType::Image, SUPPORTED_IMAGE_EXTENSIONS),
            (FileType::Pdf, SUPPORTED_PDF_EXTENSIONS),
            (FileType::Docx, SUPPORTED_DOCX_EXTENSIONS),
            (FileType::Text, SUPPORTED_TEXT_EXTENSIONS),
        ];

        groups
            .iter()
            .find(|(_, exts)| exts.contains(&ext.as_str()))
            .map(|(file_type, _)| *file_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Pdf => "pdf",
            FileType::Docx => "docx",
            FileType::Text => "text",
            FileType::Unknown => "file",
        }
    }

    /// All accepted extensions, dotted, in processor order
    pub fn supported_extensions() -> Vec<String> {
        SUPPORTED_IMAGE_EXTENSIONS
            .iter()
            .chain(SUPPORTED_PDF_EXTENSIONS)
            .chain(SUPPORTED_DOCX_EXTENSIONS)
            .chain(SUPPORTED_TEXT_EXTENSIONS)
            .map(|ext| format!(".{}", ext))
            .collect()
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted text of an uploaded file, pending inclusion in the next message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachedFile {
    pub name: String,
    pub file_type: FileType,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<String>,
    pub text: String,
}

impl AttachedFile {
    /// Number of characters of extracted text
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Raw file selected by the user, before extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_file_type_detection() {
        assert_eq!(FileType::from_file_name("scan.PNG"), Some(FileType::Image));
        assert_eq!(FileType::from_file_name("report.pdf"), Some(FileType::Pdf));
        assert_eq!(FileType::from_file_name("notes.docx"), Some(FileType::Docx));
        assert_eq!(FileType::from_file_name("a.b.txt"), Some(FileType::Text));
        assert_eq!(FileType::from_file_name("archive.zip"), None);
        assert_eq!(FileType::from_file_name("README"), None);
    }

    #[test]
    fn test_supported_extensions_are_dotted() {
        let exts = FileType::supported_extensions();
        assert_eq!(exts.first().map(String::as_str), Some(".png"));
        assert_eq!(exts.last().map(String::as_str), Some(".txt"));
        assert_eq!(exts.len(), 9);
    }

    #[test]
    fn test_message_null_content_and_missing_timestamp() {
        let msg: Message = serde_json::from_str(r#"{"role":"assistant","content":null}"#).unwrap();
        assert_eq!(msg, Message::assistant("", ""));
    }

    #[test]
    fn test_chat_defaults() {
        let chat: Chat = serde_json::from_str(r#"{"id":"17"}"#).unwrap();
        assert_eq!(chat.title, DEFAULT_CHAT_TITLE);
        assert!(chat.messages.is_empty());

        let blank = Chat { title: "  ".to_string(), ..Chat::new("1") };
        assert_eq!(blank.display_title(), DEFAULT_CHAT_TITLE);
    }

    #[test]
    fn test_has_attachment_only_serialized_when_set() {
        let plain = serde_json::to_value(Message::user("hi", "10:00 AM")).unwrap();
        assert!(plain.get("has_attachment").is_none());

        let flagged = serde_json::to_value(Message::user("hi", "10:00 AM").with_attachment(true)).unwrap();
        assert_eq!(flagged["has_attachment"], serde_json::json!(true));
    }

    #[test]
    fn test_unknown_file_type_deserializes() {
        let ft: FileType = serde_json::from_str(r#""spreadsheet""#).unwrap();
        assert_eq!(ft, FileType::Unknown);
    }
}
