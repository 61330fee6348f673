#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock chat store for exercising the HTTP client
pub struct ChatStoreMockServer {
    server: MockServer,
}

impl ChatStoreMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub fn chat_json(id: &str, title: &str, messages: Value) -> Value {
        json!({
            "id": id,
            "title": title,
            "created_at": "2024-03-01T09:15:00",
            "messages": messages
        })
    }

    pub fn message_json(role: &str, content: &str) -> Value {
        json!({
            "role": role,
            "content": content,
            "timestamp": "09:15 AM"
        })
    }

    /// `GET /get_chats` returning the given chats
    pub async fn mock_list_chats(&self, chats: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/get_chats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "chats": chats })))
            .mount(&self.server)
            .await;
    }

    /// `POST /create_chat` returning an empty chat
    pub async fn mock_create_chat(&self, id: &str) {
        Mock::given(method("POST"))
            .and(path("/create_chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "chat": Self::chat_json(id, "New Chat", json!([]))
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// `GET /get_chat/{id}`
    pub async fn mock_get_chat(&self, chat: Value) {
        let id = chat["id"].as_str().unwrap_or_default().to_string();
        Mock::given(method("GET"))
            .and(path(format!("/get_chat/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "chat": chat })))
            .mount(&self.server)
            .await;
    }

    /// `GET /get_chat/{id}` answering 404 with the store's error body
    pub async fn mock_chat_not_found(&self, id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/get_chat/{}", id)))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": "Chat not found"
            })))
            .mount(&self.server)
            .await;
    }

    /// `DELETE /delete_chat/{id}`
    pub async fn mock_delete_chat(&self, id: &str) {
        Mock::given(method("DELETE"))
            .and(path(format!("/delete_chat/{}", id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// `POST /rename_chat/{id}` expecting the new title in the body
    pub async fn mock_rename_chat(&self, id: &str, title: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/rename_chat/{}", id)))
            .and(body_json(json!({ "title": title })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// `POST /send_message` answering with a bare `assistant_message`
    pub async fn mock_send_message(&self, chat_id: &str, message: &str, reply: &str) {
        Mock::given(method("POST"))
            .and(path("/send_message"))
            .and(body_partial_json(json!({
                "chat_id": chat_id,
                "message": message
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "assistant_message": Self::message_json("assistant", reply)
            })))
            .mount(&self.server)
            .await;
    }

    /// `POST /send_message` answering with the whole updated chat
    pub async fn mock_send_message_full_chat(&self, chat_id: &str, message: &str, reply: &str) {
        Mock::given(method("POST"))
            .and(path("/send_message"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "chat": Self::chat_json(chat_id, message, json!([
                    Self::message_json("user", message),
                    Self::message_json("assistant", reply)
                ]))
            })))
            .mount(&self.server)
            .await;
    }

    /// `POST /send_message` answering with a status and the store's error body
    pub async fn mock_send_message_error(&self, status: u16, error: &str) {
        Mock::given(method("POST"))
            .and(path("/send_message"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "error": error })))
            .mount(&self.server)
            .await;
    }

    /// `POST /process_file` extracting `text` from an uploaded file named `file_name`
    pub async fn mock_process_file(&self, file_name: &str, file_type: &str, text: &str) {
        Mock::given(method("POST"))
            .and(path("/process_file"))
            .and(body_string_contains(format!("filename=\"{}\"", file_name)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "file_type": file_type,
                "filename": file_name,
                "metadata": { "pages": 2 },
                "extraction_method": "direct",
                "text": text
            })))
            .mount(&self.server)
            .await;
    }

    /// `POST /process_file` failing with `success: false`
    pub async fn mock_process_file_rejected(&self, error: &str) {
        Mock::given(method("POST"))
            .and(path("/process_file"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "error": error
            })))
            .mount(&self.server)
            .await;
    }
}
