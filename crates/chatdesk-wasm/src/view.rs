use std::cell::RefCell;

use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

use chatdesk_client::utils::{describe_attachment, escape_html};
use chatdesk_client::{ChatView, RenderedMessage};
use chatdesk_types::{AttachedFile, Chat};

use crate::dom;

const EMPTY_STATE_TEXT: &str = "Start the conversation by typing a message or attaching a file.";

/// Page elements the chat UI writes to, looked up once at startup
#[derive(Clone)]
pub struct ViewRefs {
    pub chat_list: Element,
    pub title: Element,
    pub messages: Element,
    pub input: HtmlTextAreaElement,
    pub send_button: HtmlButtonElement,
    pub new_chat_button: HtmlButtonElement,
    pub file_input: HtmlInputElement,
    pub attachment_preview: HtmlElement,
    pub markdown_toggle: HtmlInputElement,
}

impl ViewRefs {
    pub fn from_document(document: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            chat_list: dom::get_element_by_id(document, "chatList")?,
            title: dom::get_element_by_id(document, "chatTitle")?,
            messages: dom::get_element_by_id(document, "messagesContainer")?,
            input: dom::get_typed_by_id(document, "messageInput")?,
            send_button: dom::get_typed_by_id(document, "sendButton")?,
            new_chat_button: dom::get_typed_by_id(document, "newChatButton")?,
            file_input: dom::get_typed_by_id(document, "fileInput")?,
            attachment_preview: dom::get_typed_by_id(document, "attachmentPreview")?,
            markdown_toggle: dom::get_typed_by_id(document, "markdownToggle")?,
        })
    }
}

/// [`ChatView`] over the page DOM
pub struct DomChatView {
    document: Document,
    refs: ViewRefs,
    typing: RefCell<Option<Element>>,
}

impl DomChatView {
    pub fn new(document: Document, refs: ViewRefs) -> Self {
        Self {
            document,
            refs,
            typing: RefCell::new(None),
        }
    }

    pub fn refs(&self) -> &ViewRefs {
        &self.refs
    }

    fn chat_item(&self, chat: &Chat, active: bool) -> Result<Element, JsValue> {
        let class = if active { "chat-item active" } else { "chat-item" };
        let item = dom::create_element_with_class(&self.document, "div", class)?;
        item.set_attribute("data-chat-id", &chat.id)?;

        let html = format!(
            r#"<span class="chat-title">{}</span><button class="delete-chat" data-action="delete" title="Delete chat">&times;</button>"#,
            escape_html(chat.display_title())
        );
        item.set_inner_html(&html);
        Ok(item)
    }

    fn message_element(&self, message: &RenderedMessage) -> Result<Element, JsValue> {
        let element = dom::create_element_with_class(
            &self.document,
            "div",
            &format!("message {}", message.role.as_str()),
        )?;

        let badge = if message.has_attachment {
            r#"<span class="attachment-badge" title="Sent with a file">📎</span>"#
        } else {
            ""
        };

        // `html` is already sanitized by the renderer
        let html = format!(
            r#"<div class="message-header"><span class="message-role">{}</span>{}<span class="message-time">{}</span></div><div class="message-content">{}</div>"#,
            message.role_label,
            badge,
            escape_html(&message.timestamp),
            message.html
        );
        element.set_inner_html(&html);
        Ok(element)
    }

    fn remove_empty_state(&self) {
        if let Ok(Some(empty)) = self.refs.messages.query_selector(".empty-state") {
            empty.remove();
        }
    }

    fn append(&self, element: &Element) {
        if let Err(e) = self.refs.messages.append_child(element) {
            log::warn!("Failed to append to messages: {:?}", e);
        }
    }
}

impl ChatView for DomChatView {
    fn render_chat_list(&self, chats: &[Chat], active_id: Option<&str>) {
        dom::clear_element(&self.refs.chat_list);

        if chats.is_empty() {
            if let Ok(empty) = dom::create_element_with_class(&self.document, "div", "empty-list") {
                empty.set_text_content(Some("No chats yet"));
                let _ = self.refs.chat_list.append_child(&empty);
            }
            return;
        }

        for chat in chats {
            let active = active_id == Some(chat.id.as_str());
            match self.chat_item(chat, active) {
                Ok(item) => {
                    let _ = self.refs.chat_list.append_child(&item);
                }
                Err(e) => log::warn!("Failed to render chat {}: {:?}", chat.id, e),
            }
        }
    }

    fn set_title(&self, title: &str) {
        self.refs.title.set_text_content(Some(title));
    }

    fn clear_messages(&self) {
        dom::clear_element(&self.refs.messages);
        self.typing.borrow_mut().take();
    }

    fn show_empty_state(&self) {
        if let Ok(empty) = dom::create_element_with_class(&self.document, "div", "empty-state") {
            empty.set_text_content(Some(EMPTY_STATE_TEXT));
            self.append(&empty);
        }
    }

    fn append_message(&self, message: &RenderedMessage) {
        self.remove_empty_state();
        match self.message_element(message) {
            Ok(element) => self.append(&element),
            Err(e) => log::warn!("Failed to render message: {:?}", e),
        }
    }

    fn scroll_to_latest(&self) {
        dom::scroll_to_bottom(&self.refs.messages);
    }

    fn show_typing_indicator(&self) {
        let indicator = match dom::create_element_with_class(
            &self.document,
            "div",
            "message assistant typing-indicator",
        ) {
            Ok(el) => el,
            Err(e) => {
                log::warn!("Failed to create typing indicator: {:?}", e);
                return;
            }
        };
        indicator.set_inner_html(r#"<div class="typing-dots"><span></span><span></span><span></span></div>"#);
        self.append(&indicator);
        dom::scroll_to_bottom(&self.refs.messages);

        if let Some(previous) = self.typing.borrow_mut().replace(indicator) {
            previous.remove();
        }
    }

    fn hide_typing_indicator(&self) {
        if let Some(indicator) = self.typing.borrow_mut().take() {
            indicator.remove();
        }
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.refs.input.set_disabled(!enabled);
        self.refs.send_button.set_disabled(!enabled);
        if enabled {
            let _ = self.refs.input.focus();
        }
    }

    fn clear_input(&self) {
        self.refs.input.set_value("");
        let _ = self.refs.input.style().set_property("height", "auto");
    }

    fn set_send_enabled(&self, enabled: bool) {
        self.refs.send_button.set_disabled(!enabled);
    }

    fn show_attachment_processing(&self, name: &str) {
        self.refs.attachment_preview.set_inner_html(&format!(
            r#"<span class="attachment-processing">Processing {}...</span>"#,
            escape_html(name)
        ));
        dom::show_element(&self.refs.attachment_preview);
    }

    fn show_attachment(&self, file: &AttachedFile) {
        self.refs.attachment_preview.set_inner_html(&format!(
            r#"<span class="attachment-name">📎 {}</span><button class="remove-attachment" data-action="remove-attachment" title="Remove attachment">&times;</button>"#,
            escape_html(&describe_attachment(file))
        ));
        dom::show_element(&self.refs.attachment_preview);
    }

    fn clear_attachment(&self) {
        dom::clear_element(&self.refs.attachment_preview);
        dom::hide_element(&self.refs.attachment_preview);
        // Lets the same file be picked again
        self.refs.file_input.set_value("");
    }

    fn alert(&self, message: &str) {
        dom::alert(message);
    }
}
