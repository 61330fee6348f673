use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

pub fn get_element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Element not found: {}", id)))
}

/// Look up an element and cast it to the expected widget type
pub fn get_typed_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    get_element_by_id(document, id)?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element has unexpected type: {}", id)))
}

pub fn create_element_with_class(
    document: &Document,
    tag: &str,
    class: &str,
) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    element.set_class_name(class);
    Ok(element)
}

pub fn show_element(element: &HtmlElement) {
    let _ = element.style().set_property("display", "block");
}

pub fn hide_element(element: &HtmlElement) {
    let _ = element.style().set_property("display", "none");
}

pub fn clear_element(element: &Element) {
    element.set_inner_html("");
}

pub fn scroll_to_bottom(element: &Element) {
    element.set_scroll_top(element.scroll_height());
}

/// Walk up from an event target to the nearest element matching `selector`
/// and read one of its attributes
pub fn closest_attribute(target: &Element, selector: &str, attribute: &str) -> Option<String> {
    target
        .closest(selector)
        .ok()
        .flatten()
        .and_then(|el| el.get_attribute(attribute))
}

/// Blocking `window.alert`
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Blocking `window.confirm`; `false` when no window is available
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
