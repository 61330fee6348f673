use async_trait::async_trait;
use chatdesk_types::{AttachedFile, Chat, FileUpload, Message, SendMessageRequest};

use crate::error::Result;

/// Chat store endpoint paths, relative to the store's base URL
pub mod endpoints {
    use crate::utils::encode_path_segment;

    pub const GET_CHATS: &str = "/get_chats";
    pub const CREATE_CHAT: &str = "/create_chat";
    pub const SEND_MESSAGE: &str = "/send_message";
    pub const PROCESS_FILE: &str = "/process_file";

    /// Multipart field carrying the uploaded file
    pub const FILE_FIELD: &str = "file";

    pub fn get_chat(id: &str) -> String {
        format!("/get_chat/{}", encode_path_segment(id))
    }

    pub fn delete_chat(id: &str) -> String {
        format!("/delete_chat/{}", encode_path_segment(id))
    }

    pub fn rename_chat(id: &str) -> String {
        format!("/rename_chat/{}", encode_path_segment(id))
    }
}

/// Transport to the chat store and file processor.
///
/// Futures are not required to be `Send`: the browser implementation runs on
/// the single-threaded JS event loop.
#[async_trait(?Send)]
pub trait ChatApi {
    /// `GET /get_chats`
    async fn list_chats(&self) -> Result<Vec<Chat>>;

    /// `POST /create_chat`
    async fn create_chat(&self) -> Result<Chat>;

    /// `GET /get_chat/{id}`
    async fn get_chat(&self, id: &str) -> Result<Chat>;

    /// `DELETE /delete_chat/{id}`
    async fn delete_chat(&self, id: &str) -> Result<()>;

    /// `POST /rename_chat/{id}`
    async fn rename_chat(&self, id: &str, title: &str) -> Result<()>;

    /// `POST /send_message`, returning the assistant's reply
    async fn send_message(&self, request: &SendMessageRequest) -> Result<Message>;

    /// `POST /process_file` (multipart)
    async fn process_file(&self, upload: &FileUpload) -> Result<AttachedFile>;
}

#[cfg(test)]
mod tests {
    use super::endpoints;

    #[test]
    fn test_chat_paths() {
        assert_eq!(endpoints::get_chat("1712345678123456"), "/get_chat/1712345678123456");
        assert_eq!(endpoints::delete_chat("a b/c"), "/delete_chat/a%20b%2Fc");
        assert_eq!(endpoints::rename_chat("x"), "/rename_chat/x");
    }
}
