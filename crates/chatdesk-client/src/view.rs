use chatdesk_types::{AttachedFile, Chat};

use crate::render::RenderedMessage;

/// Everything the controller needs from a user interface.
///
/// Implementations hold explicit references to their widgets (DOM elements,
/// a terminal writer) handed in at construction time. All methods take
/// `&self`; views are expected to use interior mutability where needed.
pub trait ChatView {
    /// Redraw the sidebar, highlighting `active_id` if present
    fn render_chat_list(&self, chats: &[Chat], active_id: Option<&str>);

    fn set_title(&self, title: &str);

    /// Remove every rendered message
    fn clear_messages(&self);

    /// Placeholder shown for a chat without messages
    fn show_empty_state(&self);

    fn append_message(&self, message: &RenderedMessage);

    fn scroll_to_latest(&self);

    fn show_typing_indicator(&self);

    fn hide_typing_indicator(&self);

    /// Message input and send control, toggled around a send
    fn set_input_enabled(&self, enabled: bool);

    fn clear_input(&self);

    /// Send control only, toggled around file processing
    fn set_send_enabled(&self, enabled: bool);

    fn show_attachment_processing(&self, name: &str);

    fn show_attachment(&self, file: &AttachedFile);

    fn clear_attachment(&self);

    /// Blocking, user-visible error notice
    fn alert(&self, message: &str);
}
