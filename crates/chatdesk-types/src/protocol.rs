use serde::{Deserialize, Serialize};

use crate::{AttachedFile, Chat, ChatId, FileType, Message, Role};

/// `GET /get_chats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatListResponse {
    #[serde(default)]
    pub chats: Vec<Chat>,
}

/// `POST /create_chat` and `GET /get_chat/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub chat: Chat,
}

/// `POST /send_message` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: ChatId,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,
}

/// `POST /send_message` response.
///
/// Stores reply either with the bare `assistant_message` or with the whole
/// updated `chat`; both shapes are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<Chat>,
}

impl SendMessageResponse {
    pub fn into_assistant_message(self) -> Option<Message> {
        if let Some(message) = self.assistant_message {
            return Some(message);
        }
        self.chat?
            .messages
            .into_iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
    }
}

/// `POST /rename_chat/{id}` request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenameChatRequest {
    pub title: String,
}

/// Error body returned alongside non-2xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `POST /process_file` response, either outcome
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessFileResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileType>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessFileResponse {
    /// Turn the response into the pending attachment for `uploaded_name`,
    /// or the processor's error text.
    pub fn into_attachment(self, uploaded_name: &str) -> Result<AttachedFile, String> {
        if !self.success {
            return Err(self
                .error
                .unwrap_or_else(|| "Error processing file".to_string()));
        }

        let file_type = self
            .file_type
            .or_else(|| FileType::from_file_name(uploaded_name))
            .unwrap_or(FileType::Unknown);

        Ok(AttachedFile {
            name: uploaded_name.to_string(),
            file_type,
            metadata: self.metadata,
            extraction_method: self.extraction_method,
            text: self.text.unwrap_or_default(),
        })
    }
}
