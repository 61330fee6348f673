use std::cell::{Cell, Ref, RefCell};

use chatdesk_types::{ChatId, FileType, FileUpload, Message, SendMessageRequest, DEFAULT_CHAT_TITLE};

use crate::api::ChatApi;
use crate::error::{ClientError, Result};
use crate::render::{RenderMode, Renderer};
use crate::session::ChatSession;
use crate::utils;
use crate::view::ChatView;

/// Shown in place of the assistant reply when a send fails
pub const SEND_FAILED_MESSAGE: &str = "Sorry, I encountered an error while processing your message. Please try again.";

/// Result of [`ChatController::send_message`]
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Nothing to send; no request was issued
    Skipped,
    /// A send or an attachment upload is still in flight
    Blocked,
    Delivered(Message),
    Failed(ClientError),
}

/// Drives one chat window.
///
/// Every operation takes `&self` so the controller can be shared with UI
/// callbacks (`Rc<ChatController<..>>`). Session state is only borrowed
/// between awaits, never across one.
pub struct ChatController<A, V> {
    api: A,
    view: V,
    renderer: Cell<Renderer>,
    session: RefCell<ChatSession>,
}

impl<A, V> ChatController<A, V>
where
    A: ChatApi,
    V: ChatView,
{
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            renderer: Cell::new(Renderer::default()),
            session: RefCell::new(ChatSession::new()),
        }
    }

    pub fn with_renderer(self, renderer: Renderer) -> Self {
        self.renderer.set(renderer);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn session(&self) -> Ref<'_, ChatSession> {
        self.session.borrow()
    }

    pub fn active_chat_id(&self) -> Option<ChatId> {
        self.session.borrow().active_chat_id().map(str::to_string)
    }

    // ========================================================================
    // Chat list
    // ========================================================================

    /// Reload the chat list. When nothing is open, the first chat is opened.
    ///
    /// Failures are logged here; callers may ignore the returned error.
    pub async fn load_chats(&self) -> Result<()> {
        match self.refresh_chat_list().await? {
            Some(first) => self.load_chat(&first).await,
            None => Ok(()),
        }
    }

    /// Fetch and render the list. Returns the chat to open when none is active.
    async fn refresh_chat_list(&self) -> Result<Option<ChatId>> {
        let chats = self.api.list_chats().await.map_err(|e| {
            log::error!("Failed to load chats: {}", e);
            e
        })?;

        log::debug!("Loaded {} chats", chats.len());

        let first = {
            let mut session = self.session.borrow_mut();
            session.replace_chats(chats);
            match session.active_title() {
                Some(title) => {
                    self.view.set_title(title);
                    None
                }
                None => session.chats().first().map(|c| c.id.clone()),
            }
        };

        self.render_chat_list();
        Ok(first)
    }

    /// Create a chat on the store and open it. Returns the new id.
    pub async fn create_chat(&self) -> Result<ChatId> {
        self.ensure_idle("create chat")?;
        self.open_new_chat().await
    }

    async fn open_new_chat(&self) -> Result<ChatId> {
        let chat = self.api.create_chat().await.map_err(|e| {
            log::error!("Failed to create chat: {}", e);
            e
        })?;

        log::info!("Created chat {}", chat.id);
        let id = chat.id.clone();
        self.session.borrow_mut().activate(chat);

        // The chat exists either way; a stale list is tolerable.
        if let Err(e) = self.refresh_chat_list().await {
            log::warn!("Chat list not refreshed after create: {}", e);
        }

        self.show_active_chat();
        Ok(id)
    }

    /// Fetch a chat's full history and open it
    pub async fn load_chat(&self, id: &str) -> Result<()> {
        self.ensure_idle("open chat")?;
        let chat = self.api.get_chat(id).await.map_err(|e| {
            log::error!("Failed to load chat {}: {}", id, e);
            e
        })?;

        self.session.borrow_mut().activate(chat);
        self.show_active_chat();
        Ok(())
    }

    /// Delete a chat. If it was open, the first remaining chat is opened, or
    /// the view is cleared when none remain.
    pub async fn delete_chat(&self, id: &str) -> Result<()> {
        self.ensure_idle("delete chat")?;
        self.api.delete_chat(id).await.map_err(|e| {
            log::error!("Failed to delete chat {}: {}", id, e);
            e
        })?;

        log::info!("Deleted chat {}", id);
        self.session.borrow_mut().remove_chat(id);

        // Without a fresh list, fall back to what is known locally
        let next = match self.refresh_chat_list().await {
            Ok(next) => next,
            Err(_) => self.session.borrow().chats().first().map(|c| c.id.clone()),
        };

        if self.session.borrow().active_chat_id().is_some() {
            return Ok(());
        }

        match next {
            Some(next) => self.load_chat(&next).await,
            None => {
                self.show_no_chat();
                Ok(())
            }
        }
    }

    /// Rename a chat; blank titles are refused without a request
    pub async fn rename_chat(&self, id: &str, title: &str) -> Result<()> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ClientError::Rejected("Chat title cannot be empty".to_string()));
        }

        self.api.rename_chat(id, title).await.map_err(|e| {
            log::error!("Failed to rename chat {}: {}", id, e);
            e
        })?;

        let is_active = {
            let mut session = self.session.borrow_mut();
            session.rename_chat(id, title);
            session.is_active(id)
        };

        if is_active {
            self.view.set_title(title);
        }
        self.render_chat_list();
        Ok(())
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// Send `text` together with the pending attachment, if any.
    ///
    /// The user message is shown before the store answers. Input controls
    /// are re-enabled on every path that issued a request.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let text = text.trim();

        {
            let mut session = self.session.borrow_mut();
            if text.is_empty() && session.pending_attachment().is_none() {
                return SendOutcome::Skipped;
            }
            if session.is_processing_attachment() || !session.begin_send() {
                log::warn!("Send ignored: another operation is in flight");
                return SendOutcome::Blocked;
            }
        }

        self.view.set_input_enabled(false);
        let outcome = self.deliver(text).await;

        self.session.borrow_mut().finish_send();
        self.view.set_input_enabled(true);
        if self.session.borrow().is_processing_attachment() {
            self.view.set_send_enabled(false);
        }
        outcome
    }

    async fn deliver(&self, text: &str) -> SendOutcome {
        let active = self.active_chat_id();
        let chat_id = match active {
            Some(id) => id,
            None => match self.open_new_chat().await {
                Ok(id) => id,
                Err(e) => return SendOutcome::Failed(e),
            },
        };

        let attachment = self.session.borrow().pending_attachment().cloned();
        let message = match &attachment {
            Some(file) if text.is_empty() => utils::attachment_prompt(file),
            _ => text.to_string(),
        };

        let user_message =
            Message::user(message.clone(), utils::now_timestamp()).with_attachment(attachment.is_some());
        self.session.borrow_mut().push_message(user_message.clone());
        self.renderer
            .get()
            .render(&self.view, std::slice::from_ref(&user_message), RenderMode::Append);
        self.view.show_typing_indicator();

        let request = SendMessageRequest {
            chat_id,
            message,
            file_content: attachment.as_ref().map(|file| file.text.clone()),
        };

        log::debug!(
            "Sending to chat {}: {}",
            request.chat_id,
            utils::safe_truncate(&request.message, 80)
        );

        let result = self.api.send_message(&request).await;

        // The reply belongs to the chat it was sent to, which may no longer be open
        self.view.hide_typing_indicator();
        let still_open = self.session.borrow().is_active(&request.chat_id);
        if !still_open {
            log::warn!("Chat {} was closed before its reply arrived", request.chat_id);
        }

        match result {
            Ok(reply) => {
                if still_open {
                    self.session.borrow_mut().push_message(reply.clone());
                    self.renderer
                        .get()
                        .render(&self.view, std::slice::from_ref(&reply), RenderMode::Append);
                }

                // Only the file that went out is consumed; one picked mid-send stays
                let consumed = {
                    let mut session = self.session.borrow_mut();
                    if attachment.is_some() && session.pending_attachment() == attachment.as_ref() {
                        session.take_attachment()
                    } else {
                        None
                    }
                };
                if consumed.is_some() {
                    self.view.clear_attachment();
                }
                self.view.clear_input();

                // Picks up the title the store derives from the first message
                if let Err(e) = self.refresh_chat_list().await {
                    log::warn!("Chat list not refreshed after send: {}", e);
                }

                SendOutcome::Delivered(reply)
            }
            Err(e) => {
                log::error!("Failed to send message to chat {}: {}", request.chat_id, e);
                if still_open {
                    let placeholder = Message::assistant(SEND_FAILED_MESSAGE, utils::now_timestamp());
                    self.renderer
                        .get()
                        .render(&self.view, std::slice::from_ref(&placeholder), RenderMode::Append);
                }
                SendOutcome::Failed(e)
            }
        }
    }

    // ========================================================================
    // Attachment
    // ========================================================================

    /// Upload a file for text extraction; on success it becomes the single
    /// pending attachment, replacing any earlier one.
    pub async fn attach_file(&self, upload: FileUpload) -> Result<()> {
        if FileType::from_file_name(&upload.name).is_none() {
            let err = ClientError::unsupported_file(&upload.name);
            self.view.alert(&err.to_string());
            return Err(err);
        }

        self.session.borrow_mut().begin_attachment(&upload.name);
        self.view.show_attachment_processing(&upload.name);
        self.view.set_send_enabled(false);

        let result = self.api.process_file(&upload).await;

        let outcome = match result {
            Ok(file) => {
                log::info!("Attached {} ({} chars)", file.name, file.text_len());
                self.view.show_attachment(&file);
                if let Some(previous) = self.session.borrow_mut().set_attachment(file) {
                    log::debug!("Replaced pending attachment {}", previous.name);
                }
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to process {}: {}", upload.name, e);
                self.session.borrow_mut().clear_attachment();
                self.view.clear_attachment();
                let notice = match &e {
                    ClientError::Rejected(message) => message.clone(),
                    other => format!("Error processing file: {}", other),
                };
                self.view.alert(&notice);
                Err(e)
            }
        };

        // A send in flight keeps its controls disabled until it finishes
        if !self.session.borrow().is_sending() {
            self.view.set_send_enabled(true);
        }
        outcome
    }

    pub fn remove_attachment(&self) {
        self.session.borrow_mut().clear_attachment();
        self.view.clear_attachment();
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    pub fn markdown_enabled(&self) -> bool {
        self.renderer.get().markdown_enabled()
    }

    /// Switch Markdown rendering and redraw the open chat
    pub fn set_markdown_enabled(&self, enabled: bool) {
        self.renderer.set(Renderer::new(enabled));
        if self.session.borrow().active_chat_id().is_some() {
            let session = self.session.borrow();
            self.renderer.get().render(&self.view, session.messages(), RenderMode::Replace);
        }
    }

    /// Chat switches are refused while a message is in flight
    fn ensure_idle(&self, action: &str) -> Result<()> {
        if self.session.borrow().is_sending() {
            log::warn!("Cannot {} while a message is being sent", action);
            return Err(ClientError::Busy);
        }
        Ok(())
    }

    fn render_chat_list(&self) {
        let session = self.session.borrow();
        self.view.render_chat_list(session.chats(), session.active_chat_id());
    }

    fn show_active_chat(&self) {
        {
            let session = self.session.borrow();
            self.view.set_title(session.active_title().unwrap_or(DEFAULT_CHAT_TITLE));
            self.renderer.get().render(&self.view, session.messages(), RenderMode::Replace);
        }
        self.render_chat_list();
    }

    fn show_no_chat(&self) {
        self.view.set_title(DEFAULT_CHAT_TITLE);
        self.renderer.get().render(&self.view, &[], RenderMode::Replace);
        self.render_chat_list();
    }
}
