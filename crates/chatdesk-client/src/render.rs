use chatdesk_types::{Message, Role};

use crate::markdown;
use crate::view::ChatView;

/// How a batch of messages lands in the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Add after what is already shown
    Append,
    /// Clear the view first; an empty batch shows the empty state
    Replace,
}

/// A message prepared for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub role: Role,
    pub role_label: &'static str,
    /// Sanitized HTML, safe for `innerHTML`
    pub html: String,
    /// Original Markdown source, for text-only views
    pub text: String,
    pub timestamp: String,
    pub has_attachment: bool,
}

/// Turns message lists into view updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Renderer {
    markdown_enabled: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self { markdown_enabled: true }
    }
}

impl Renderer {
    pub fn new(markdown_enabled: bool) -> Self {
        Self { markdown_enabled }
    }

    pub fn markdown_enabled(&self) -> bool {
        self.markdown_enabled
    }

    pub fn prepare(&self, message: &Message) -> RenderedMessage {
        RenderedMessage {
            role: message.role,
            role_label: message.role.label(),
            html: markdown::render_message_content(&message.content, self.markdown_enabled),
            text: message.content.clone(),
            timestamp: message.timestamp.clone(),
            has_attachment: message.has_attachment,
        }
    }

    pub fn render<V>(&self, view: &V, messages: &[Message], mode: RenderMode)
    where
        V: ChatView + ?Sized,
    {
        if mode == RenderMode::Replace {
            view.clear_messages();
            if messages.is_empty() {
                view.show_empty_state();
            }
        }

        for message in messages {
            view.append_message(&self.prepare(message));
        }

        view.scroll_to_latest();
    }
}
