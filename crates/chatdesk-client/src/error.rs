use thiserror::Error;

/// Errors surfaced by chat store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The request never produced an HTTP response
    #[error("request failed: {0}")]
    Transport(String),

    /// Non-2xx status; `message` carries the store's `error` text if any
    #[error("chat store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to parse response: {0}")]
    Decode(String),

    /// The store answered but reported `success: false`
    #[error("{0}")]
    Rejected(String),

    #[error("Unsupported file type: {name}. Supported: {supported}")]
    UnsupportedFile { name: String, supported: String },

    #[error("chat store returned no assistant message")]
    EmptyReply,

    /// Refused because a message is still being sent
    #[error("another request is still in progress")]
    Busy,
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
    }

    pub fn unsupported_file(name: &str) -> Self {
        ClientError::UnsupportedFile {
            name: name.to_string(),
            supported: chatdesk_types::FileType::supported_extensions().join(", "),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
