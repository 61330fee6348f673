use colored::Colorize;
use std::cell::RefCell;
use std::io::{self, Write};

use chatdesk_client::utils::describe_attachment;
use chatdesk_client::{ChatView, RenderedMessage};
use chatdesk_types::{AttachedFile, Chat, Role};

/// Chat view writing to a terminal stream.
///
/// The chat list is only remembered here; it is printed on request through
/// [`TerminalView::print_chat_list`] so background refreshes stay quiet.
pub struct TerminalView<W: Write> {
    out: RefCell<W>,
    show_timestamps: bool,
    chats: RefCell<Vec<(String, String)>>,
    active: RefCell<Option<String>>,
    title: RefCell<Option<String>>,
    attachment: RefCell<Option<String>>,
}

impl TerminalView<io::Stdout> {
    pub fn stdout(show_timestamps: bool) -> Self {
        Self::new(io::stdout(), show_timestamps)
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, show_timestamps: bool) -> Self {
        Self {
            out: RefCell::new(out),
            show_timestamps,
            chats: RefCell::new(Vec::new()),
            active: RefCell::new(None),
            title: RefCell::new(None),
            attachment: RefCell::new(None),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    /// Id of the `index`-th chat as last rendered (1-based)
    pub fn chat_id_at(&self, index: usize) -> Option<String> {
        index
            .checked_sub(1)
            .and_then(|i| self.chats.borrow().get(i).map(|(id, _)| id.clone()))
    }

    pub fn attachment_name(&self) -> Option<String> {
        self.attachment.borrow().clone()
    }

    pub fn print_chat_list(&self) {
        let chats = self.chats.borrow();
        let active = self.active.borrow();

        if chats.is_empty() {
            self.line(&"No chats yet. Type a message to start one.".bright_black().to_string());
            return;
        }

        for (i, (id, title)) in chats.iter().enumerate() {
            let marker = if active.as_deref() == Some(id.as_str()) { "*" } else { " " };
            self.line(&format!(
                "{} {:>3}. {} {}",
                marker.green().bold(),
                i + 1,
                title,
                format!("({})", id).bright_black()
            ));
        }
    }

    /// Print a status line in the client's muted style
    pub fn info(&self, text: &str) {
        self.line(&text.bright_black().to_string());
    }

    fn line(&self, text: &str) {
        let mut out = self.out.borrow_mut();
        let _ = writeln!(out, "{}", text);
    }

    fn flush(&self) {
        let _ = self.out.borrow_mut().flush();
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render_chat_list(&self, chats: &[Chat], active_id: Option<&str>) {
        *self.chats.borrow_mut() = chats
            .iter()
            .map(|c| (c.id.clone(), c.display_title().to_string()))
            .collect();
        *self.active.borrow_mut() = active_id.map(str::to_string);
    }

    fn set_title(&self, title: &str) {
        let changed = self.title.borrow().as_deref() != Some(title);
        if changed {
            *self.title.borrow_mut() = Some(title.to_string());
            self.line(&format!("── {} ──", title).bright_cyan().bold().to_string());
        }
    }

    fn clear_messages(&self) {}

    fn show_empty_state(&self) {
        self.line(&"(no messages yet)".bright_black().to_string());
    }

    fn append_message(&self, message: &RenderedMessage) {
        let label = match message.role {
            Role::User => message.role_label.green().bold(),
            Role::Assistant => message.role_label.blue().bold(),
        };

        let mut header = String::new();
        if self.show_timestamps && !message.timestamp.is_empty() {
            header.push_str(&format!("[{}] ", message.timestamp).bright_black().to_string());
        }
        header.push_str(&label.to_string());
        if message.has_attachment {
            header.push_str(" 📎");
        }

        self.line(&format!("{}:", header));
        self.line(&message.text);
    }

    fn scroll_to_latest(&self) {
        self.flush();
    }

    fn show_typing_indicator(&self) {
        let mut out = self.out.borrow_mut();
        let _ = write!(out, "{}", "Assistant is typing...".bright_black());
        let _ = out.flush();
    }

    fn hide_typing_indicator(&self) {
        let mut out = self.out.borrow_mut();
        let _ = write!(out, "\r\x1b[2K");
        let _ = out.flush();
    }

    // The readline prompt is not shown while a request awaits.
    fn set_input_enabled(&self, _enabled: bool) {}

    fn clear_input(&self) {}

    fn set_send_enabled(&self, _enabled: bool) {}

    fn show_attachment_processing(&self, name: &str) {
        self.line(&format!("Processing {}...", name).bright_black().to_string());
    }

    fn show_attachment(&self, file: &AttachedFile) {
        *self.attachment.borrow_mut() = Some(file.name.clone());
        self.line(&format!("📎 Attached {}", describe_attachment(file)).yellow().to_string());
    }

    fn clear_attachment(&self) {
        *self.attachment.borrow_mut() = None;
    }

    fn alert(&self, message: &str) {
        self.line(&format!("⚠️  {}", message).red().bold().to_string());
    }
}
