#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use chatdesk_client::{ChatApi, ChatView, ClientError, RenderedMessage, Result};
use chatdesk_client::types::{
    AttachedFile, Chat, FileType, FileUpload, Message, Role, SendMessageRequest,
};

// ============================================================================
// In-memory chat store
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ListChats,
    CreateChat,
    GetChat,
    DeleteChat,
    RenameChat,
    SendMessage,
    ProcessFile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListChats,
    CreateChat,
    GetChat(String),
    DeleteChat(String),
    RenameChat(String, String),
    SendMessage(SendMessageRequest),
    ProcessFile(String),
}

impl ApiCall {
    pub fn is_write(&self) -> bool {
        !matches!(self, ApiCall::ListChats | ApiCall::GetChat(_))
    }
}

/// Behaves like the chat store: newest chats first, the first user message
/// becomes the title, replies echo the prompt.
#[derive(Default)]
pub struct MockChatApi {
    chats: RefCell<Vec<Chat>>,
    calls: RefCell<Vec<ApiCall>>,
    failing: RefCell<Vec<Endpoint>>,
    rejections: RefCell<Vec<String>>,
    next_id: Cell<u32>,
}

impl MockChatApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chats(titles: &[&str]) -> Self {
        let api = Self::new();
        for title in titles {
            let id = api.allocate_id();
            api.chats.borrow_mut().push(Chat {
                title: title.to_string(),
                ..Chat::new(id)
            });
        }
        api
    }

    pub fn fail_on(&self, endpoint: Endpoint) {
        self.failing.borrow_mut().push(endpoint);
    }

    pub fn recover(&self, endpoint: Endpoint) {
        self.failing.borrow_mut().retain(|e| *e != endpoint);
    }

    /// Next `process_file` answers `success: false` with `error`
    pub fn reject_next_file(&self, error: &str) {
        self.rejections.borrow_mut().push(error.to_string());
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    pub fn write_calls(&self) -> Vec<ApiCall> {
        self.calls().into_iter().filter(ApiCall::is_write).collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn chat_ids(&self) -> Vec<String> {
        self.chats.borrow().iter().map(|c| c.id.clone()).collect()
    }

    pub fn stored_chat(&self, id: &str) -> Option<Chat> {
        self.chats.borrow().iter().find(|c| c.id == id).cloned()
    }

    fn allocate_id(&self) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("chat-{}", id)
    }

    fn record(&self, call: ApiCall, endpoint: Endpoint) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.failing.borrow().contains(&endpoint) {
            return Err(ClientError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    fn not_found() -> ClientError {
        ClientError::Status {
            status: 404,
            message: "Chat not found".to_string(),
        }
    }
}

#[async_trait(?Send)]
impl ChatApi for MockChatApi {
    async fn list_chats(&self) -> Result<Vec<Chat>> {
        self.record(ApiCall::ListChats, Endpoint::ListChats)?;
        Ok(self.chats.borrow().clone())
    }

    async fn create_chat(&self) -> Result<Chat> {
        self.record(ApiCall::CreateChat, Endpoint::CreateChat)?;
        let chat = Chat::new(self.allocate_id());
        self.chats.borrow_mut().insert(0, chat.clone());
        Ok(chat)
    }

    async fn get_chat(&self, id: &str) -> Result<Chat> {
        self.record(ApiCall::GetChat(id.to_string()), Endpoint::GetChat)?;
        self.stored_chat(id).ok_or_else(Self::not_found)
    }

    async fn delete_chat(&self, id: &str) -> Result<()> {
        self.record(ApiCall::DeleteChat(id.to_string()), Endpoint::DeleteChat)?;
        self.chats.borrow_mut().retain(|c| c.id != id);
        Ok(())
    }

    async fn rename_chat(&self, id: &str, title: &str) -> Result<()> {
        self.record(
            ApiCall::RenameChat(id.to_string(), title.to_string()),
            Endpoint::RenameChat,
        )?;
        let mut chats = self.chats.borrow_mut();
        let chat = chats.iter_mut().find(|c| c.id == id).ok_or_else(Self::not_found)?;
        chat.title = title.to_string();
        Ok(())
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<Message> {
        self.record(ApiCall::SendMessage(request.clone()), Endpoint::SendMessage)?;

        // Give concurrently polled futures a chance to run
        tokio::task::yield_now().await;

        let mut chats = self.chats.borrow_mut();
        let chat = chats
            .iter_mut()
            .find(|c| c.id == request.chat_id)
            .ok_or_else(Self::not_found)?;

        chat.messages.push(
            Message::user(request.message.clone(), "10:00 AM")
                .with_attachment(request.file_content.is_some()),
        );
        if chat.messages.len() == 1 {
            chat.title = request.message.chars().take(50).collect();
        }

        let reply = Message::assistant(format!("Echo: {}", request.message), "10:01 AM");
        chat.messages.push(reply.clone());
        Ok(reply)
    }

    async fn process_file(&self, upload: &FileUpload) -> Result<AttachedFile> {
        self.record(ApiCall::ProcessFile(upload.name.clone()), Endpoint::ProcessFile)?;

        if let Some(error) = self.rejections.borrow_mut().pop() {
            return Err(ClientError::Rejected(error));
        }

        Ok(AttachedFile {
            name: upload.name.clone(),
            file_type: FileType::from_file_name(&upload.name).unwrap_or(FileType::Unknown),
            metadata: serde_json::json!({ "size_bytes": upload.bytes.len() }),
            extraction_method: None,
            text: String::from_utf8_lossy(&upload.bytes).into_owned(),
        })
    }
}

// ============================================================================
// Recording view
// ============================================================================

/// Keeps the state a DOM would show, plus the alerts raised
pub struct RecordingView {
    pub title: RefCell<String>,
    pub chat_list: RefCell<Vec<String>>,
    pub highlighted: RefCell<Option<String>>,
    pub messages: RefCell<Vec<RenderedMessage>>,
    pub empty_state: Cell<bool>,
    pub typing: Cell<bool>,
    pub input_enabled: Cell<bool>,
    pub send_enabled: Cell<bool>,
    pub input_cleared: Cell<u32>,
    pub attachment: RefCell<Option<String>>,
    pub alerts: RefCell<Vec<String>>,
    pub scrolls: Cell<u32>,
}

impl Default for RecordingView {
    fn default() -> Self {
        Self {
            title: RefCell::new(String::new()),
            chat_list: RefCell::new(Vec::new()),
            highlighted: RefCell::new(None),
            messages: RefCell::new(Vec::new()),
            empty_state: Cell::new(false),
            typing: Cell::new(false),
            input_enabled: Cell::new(true),
            send_enabled: Cell::new(true),
            input_cleared: Cell::new(0),
            attachment: RefCell::new(None),
            alerts: RefCell::new(Vec::new()),
            scrolls: Cell::new(0),
        }
    }
}

impl RecordingView {
    pub fn shown(&self) -> Vec<(Role, String)> {
        self.messages
            .borrow()
            .iter()
            .map(|m| (m.role, m.text.clone()))
            .collect()
    }

    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }
}

impl ChatView for RecordingView {
    fn render_chat_list(&self, chats: &[Chat], active_id: Option<&str>) {
        *self.chat_list.borrow_mut() = chats.iter().map(|c| c.display_title().to_string()).collect();
        *self.highlighted.borrow_mut() = active_id.map(str::to_string);
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn clear_messages(&self) {
        self.messages.borrow_mut().clear();
        self.empty_state.set(false);
    }

    fn show_empty_state(&self) {
        self.empty_state.set(true);
    }

    fn append_message(&self, message: &RenderedMessage) {
        self.empty_state.set(false);
        self.messages.borrow_mut().push(message.clone());
    }

    fn scroll_to_latest(&self) {
        self.scrolls.set(self.scrolls.get() + 1);
    }

    fn show_typing_indicator(&self) {
        self.typing.set(true);
    }

    fn hide_typing_indicator(&self) {
        self.typing.set(false);
    }

    // Like the DOM view, the send button follows the input
    fn set_input_enabled(&self, enabled: bool) {
        self.input_enabled.set(enabled);
        self.send_enabled.set(enabled);
    }

    fn clear_input(&self) {
        self.input_cleared.set(self.input_cleared.get() + 1);
    }

    fn set_send_enabled(&self, enabled: bool) {
        self.send_enabled.set(enabled);
    }

    fn show_attachment_processing(&self, name: &str) {
        *self.attachment.borrow_mut() = Some(format!("processing {}", name));
    }

    fn show_attachment(&self, file: &AttachedFile) {
        *self.attachment.borrow_mut() = Some(file.name.clone());
    }

    fn clear_attachment(&self) {
        *self.attachment.borrow_mut() = None;
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

pub fn text_upload(name: &str, contents: &str) -> FileUpload {
    FileUpload::new(name, contents.as_bytes().to_vec())
}
