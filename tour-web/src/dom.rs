use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Storage, Window};

/// Retrieve the global `window` object, if running in a browser.
#[must_use]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Retrieve the document object for DOM interactions.
#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|win| win.document())
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Log an error message to the browser console.
pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from(message));
}

/// Access the browser `localStorage` handle.
///
/// # Errors
/// Returns an error if the browser window cannot be accessed or `localStorage` is unavailable.
pub fn local_storage() -> Result<Storage, JsValue> {
    window()
        .ok_or_else(|| JsValue::from_str("window unavailable"))?
        .local_storage()?
        .ok_or_else(|| JsValue::from_str("localStorage unavailable"))
}

/// Quote `value` for use inside a CSS attribute selector.
#[must_use]
pub fn css_attr_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Find a tour target: an element with that `id`, else one carrying `attribute="<target_id>"`.
#[must_use]
pub fn find_target(document: &Document, attribute: &str, target_id: &str) -> Option<Element> {
    document.get_element_by_id(target_id).or_else(|| {
        let selector = format!("[{attribute}={}]", css_attr_value(target_id));
        document.query_selector(&selector).ok().flatten()
    })
}

#[cfg(test)]
mod tests {
    use super::css_attr_value;

    #[test]
    fn attribute_values_are_quoted_and_escaped() {
        assert_eq!(css_attr_value("job-feed"), "\"job-feed\"");
        assert_eq!(css_attr_value(r#"a"b\c"#), r#""a\"b\\c""#);
    }
}
