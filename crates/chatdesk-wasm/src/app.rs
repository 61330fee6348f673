use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, File};

use chatdesk_client::{ChatController, ChatView, SendOutcome};
use chatdesk_types::FileUpload;

use crate::api::GlooChatApi;
use crate::dom;
use crate::view::{DomChatView, ViewRefs};

type Controller = ChatController<GlooChatApi, DomChatView>;

pub struct ChatApp {
    refs: ViewRefs,
    controller: Rc<Controller>,
}

impl ChatApp {
    pub fn new() -> Result<Self, JsValue> {
        let document = crate::document()?;
        let refs = ViewRefs::from_document(&document)?;
        let view = DomChatView::new(document, refs.clone());
        let controller = Rc::new(ChatController::new(GlooChatApi::new(), view));

        Ok(Self { refs, controller })
    }

    pub async fn start(self) -> Result<(), JsValue> {
        self.setup_send()?;
        self.setup_new_chat_button()?;
        self.setup_chat_list()?;
        self.setup_file_input()?;
        self.setup_attachment_preview()?;
        self.setup_markdown_toggle()?;
        self.setup_input_autosize()?;

        self.refs
            .markdown_toggle
            .set_checked(self.controller.markdown_enabled());

        // Failures are logged by the controller; the page stays usable
        let _ = self.controller.load_chats().await;
        Ok(())
    }

    fn setup_send(&self) -> Result<(), JsValue> {
        let controller = self.controller.clone();
        let input = self.refs.input.clone();
        let closure = Closure::wrap(Box::new(move || {
            send_from_input(controller.clone(), input.value());
        }) as Box<dyn FnMut()>);
        self.refs
            .send_button
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();

        // Enter sends, Shift+Enter inserts a newline
        let controller = self.controller.clone();
        let input = self.refs.input.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
            if event.key() == "Enter" && !event.shift_key() {
                event.prevent_default();
                send_from_input(controller.clone(), input.value());
            }
        }) as Box<dyn FnMut(_)>);
        self.refs
            .input
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(())
    }

    fn setup_new_chat_button(&self) -> Result<(), JsValue> {
        let controller = self.controller.clone();
        let closure = Closure::wrap(Box::new(move || {
            let controller = controller.clone();
            spawn_local(async move {
                if let Err(e) = controller.create_chat().await {
                    controller.view().alert(&format!("Could not create a chat: {}", e));
                }
            });
        }) as Box<dyn FnMut()>);
        self.refs
            .new_chat_button
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// One delegated listener for every chat item and its delete button
    fn setup_chat_list(&self) -> Result<(), JsValue> {
        let controller = self.controller.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Some(chat_id) = dom::closest_attribute(&target, ".chat-item", "data-chat-id") else {
                return;
            };
            let is_delete = dom::closest_attribute(&target, "[data-action]", "data-action")
                .map_or(false, |action| action == "delete");

            let controller = controller.clone();
            if is_delete {
                event.stop_propagation();
                if !dom::confirm("Delete this chat?") {
                    return;
                }
                spawn_local(async move {
                    if let Err(e) = controller.delete_chat(&chat_id).await {
                        controller.view().alert(&format!("Could not delete chat: {}", e));
                    }
                });
            } else if controller.active_chat_id().as_deref() != Some(chat_id.as_str()) {
                spawn_local(async move {
                    let _ = controller.load_chat(&chat_id).await;
                });
            }
        }) as Box<dyn FnMut(_)>);
        self.refs
            .chat_list
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_file_input(&self) -> Result<(), JsValue> {
        let controller = self.controller.clone();
        let file_input = self.refs.file_input.clone();
        let closure = Closure::wrap(Box::new(move || {
            let Some(file) = file_input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let controller = controller.clone();
            spawn_local(async move {
                match read_file(&file).await {
                    // The controller alerts on processing failures
                    Ok(upload) => {
                        let _ = controller.attach_file(upload).await;
                    }
                    Err(e) => {
                        log::error!("Failed to read {}: {:?}", file.name(), e);
                        controller.view().alert(&format!("Could not read {}", file.name()));
                    }
                }
            });
        }) as Box<dyn FnMut()>);
        self.refs
            .file_input
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_attachment_preview(&self) -> Result<(), JsValue> {
        let controller = self.controller.clone();
        let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
            let action = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| dom::closest_attribute(&el, "[data-action]", "data-action"));
            if action.as_deref() == Some("remove-attachment") {
                controller.remove_attachment();
            }
        }) as Box<dyn FnMut(_)>);
        self.refs
            .attachment_preview
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_markdown_toggle(&self) -> Result<(), JsValue> {
        let controller = self.controller.clone();
        let toggle = self.refs.markdown_toggle.clone();
        let closure = Closure::wrap(Box::new(move || {
            controller.set_markdown_enabled(toggle.checked());
            log::info!("Markdown enabled: {}", toggle.checked());
        }) as Box<dyn FnMut()>);
        self.refs
            .markdown_toggle
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_input_autosize(&self) -> Result<(), JsValue> {
        let input = self.refs.input.clone();
        let closure = Closure::wrap(Box::new(move || {
            let style = input.style();
            let _ = style.set_property("height", "auto");
            let _ = style.set_property("height", &format!("{}px", input.scroll_height()));
        }) as Box<dyn FnMut()>);
        self.refs
            .input
            .add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }
}

fn send_from_input(controller: Rc<Controller>, text: String) {
    spawn_local(async move {
        match controller.send_message(&text).await {
            SendOutcome::Failed(e) => log::debug!("Send failed: {}", e),
            SendOutcome::Blocked => log::debug!("Send ignored while busy"),
            SendOutcome::Skipped | SendOutcome::Delivered(_) => {}
        }
    });
}

async fn read_file(file: &File) -> Result<FileUpload, JsValue> {
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let upload = FileUpload::new(file.name(), bytes);
    let mime = file.type_();
    Ok(if mime.is_empty() {
        upload
    } else {
        upload.with_mime_type(mime)
    })
}
