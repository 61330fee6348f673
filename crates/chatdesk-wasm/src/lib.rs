use wasm_bindgen::prelude::*;
use web_sys::{Document, Window};

mod api;
mod app;
mod dom;
mod view;

pub use api::GlooChatApi;
pub use view::{DomChatView, ViewRefs};

/// Initialize the WASM application
/// This sets up panic hooks and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    log::info!("chatdesk WASM initialized");
}

/// Wire up the chat page and load the chat list
#[wasm_bindgen]
pub async fn init_chat_app() -> Result<(), JsValue> {
    log::info!("Initializing chat page");
    app::ChatApp::new()?.start().await
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object"))
}
