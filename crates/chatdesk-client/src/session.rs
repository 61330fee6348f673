//! Client-visible state of one chat window.

use chatdesk_types::{AttachedFile, Chat, ChatId, Message};

/// Lifecycle of the single pending attachment
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttachmentState {
    #[default]
    Empty,
    /// Uploaded and waiting for the file processor
    Processing { name: String },
    Ready(AttachedFile),
}

/// Message send state machine: `Idle -> Sending -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendState {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveChat {
    id: ChatId,
    title: String,
    messages: Vec<Message>,
}

/// The chat list, the open chat and what is pending to send.
///
/// The active chat, when set, is always present in `chats`.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    chats: Vec<Chat>,
    active: Option<ActiveChat>,
    attachment: AttachmentState,
    send_state: SendState,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Chat list
    // ------------------------------------------------------------------

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn chat(&self, id: &str) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == id)
    }

    /// Install a freshly loaded list. An active chat missing from it is
    /// dropped; a listed one picks up the store's title.
    pub fn replace_chats(&mut self, chats: Vec<Chat>) {
        self.chats = chats;

        let listed = self
            .active
            .as_ref()
            .and_then(|active| self.chats.iter().find(|c| c.id == active.id))
            .map(|c| c.title.clone());

        match listed {
            Some(title) => {
                if let Some(active) = self.active.as_mut() {
                    active.title = title;
                }
            }
            None => {
                if let Some(stale) = self.active.take() {
                    log::debug!("Active chat {} no longer listed", stale.id);
                }
            }
        }
    }

    /// Drop a chat locally; deactivates it if it was open.
    pub fn remove_chat(&mut self, id: &str) -> bool {
        let before = self.chats.len();
        self.chats.retain(|c| c.id != id);
        if self.is_active(id) {
            self.active = None;
        }
        self.chats.len() != before
    }

    pub fn rename_chat(&mut self, id: &str, title: &str) {
        if let Some(chat) = self.chats.iter_mut().find(|c| c.id == id) {
            chat.title = title.to_string();
        }
        if let Some(active) = self.active.as_mut().filter(|a| a.id == id) {
            active.title = title.to_string();
        }
    }

    // ------------------------------------------------------------------
    // Active chat
    // ------------------------------------------------------------------

    pub fn active_chat_id(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.id.as_str())
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_chat_id() == Some(id)
    }

    pub fn active_title(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.title.as_str())
    }

    /// Messages of the active chat, oldest first; empty when none is active
    pub fn messages(&self) -> &[Message] {
        self.active.as_ref().map(|a| a.messages.as_slice()).unwrap_or(&[])
    }

    /// Open `chat`, adding it to the front of the list if it is not there yet.
    pub fn activate(&mut self, chat: Chat) {
        match self.chats.iter_mut().find(|c| c.id == chat.id) {
            Some(listed) => *listed = chat.clone(),
            None => self.chats.insert(0, chat.clone()),
        }

        self.active = Some(ActiveChat {
            title: chat.display_title().to_string(),
            id: chat.id,
            messages: chat.messages,
        });
    }

    /// Append to the active chat. Returns `false` when no chat is active.
    pub fn push_message(&mut self, message: Message) -> bool {
        match self.active.as_mut() {
            Some(active) => {
                active.messages.push(message);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Attachment
    // ------------------------------------------------------------------

    pub fn attachment(&self) -> &AttachmentState {
        &self.attachment
    }

    pub fn pending_attachment(&self) -> Option<&AttachedFile> {
        match &self.attachment {
            AttachmentState::Ready(file) => Some(file),
            _ => None,
        }
    }

    pub fn is_processing_attachment(&self) -> bool {
        matches!(self.attachment, AttachmentState::Processing { .. })
    }

    pub fn begin_attachment(&mut self, name: &str) {
        self.attachment = AttachmentState::Processing { name: name.to_string() };
    }

    /// Store `file` as the one pending attachment, returning the one it replaced.
    pub fn set_attachment(&mut self, file: AttachedFile) -> Option<AttachedFile> {
        match std::mem::replace(&mut self.attachment, AttachmentState::Ready(file)) {
            AttachmentState::Ready(previous) => Some(previous),
            _ => None,
        }
    }

    pub fn take_attachment(&mut self) -> Option<AttachedFile> {
        match std::mem::take(&mut self.attachment) {
            AttachmentState::Ready(file) => Some(file),
            _ => None,
        }
    }

    pub fn clear_attachment(&mut self) {
        self.attachment = AttachmentState::Empty;
    }

    // ------------------------------------------------------------------
    // Send state
    // ------------------------------------------------------------------

    pub fn send_state(&self) -> SendState {
        self.send_state
    }

    pub fn is_sending(&self) -> bool {
        self.send_state == SendState::Sending
    }

    /// Move to `Sending`. Returns `false` if a send is already in flight.
    pub fn begin_send(&mut self) -> bool {
        if self.is_sending() {
            return false;
        }
        self.send_state = SendState::Sending;
        true
    }

    pub fn finish_send(&mut self) {
        self.send_state = SendState::Idle;
    }
}
