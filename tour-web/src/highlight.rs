use tour_engine::HighlightSurface;

use crate::dom;
use crate::locator::TARGET_ATTRIBUTE;

/// Class toggled on the highlighted target.
pub const HIGHLIGHT_CLASS: &str = "tour-highlight";
/// Attribute set while an element is the active tour target.
pub const ACTIVE_ATTRIBUTE: &str = "data-tour-active";

/// Marks targets by toggling [`HIGHLIGHT_CLASS`] on the live element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassHighlightSurface;

impl ClassHighlightSurface {
    fn element(target_id: &str) -> Option<web_sys::Element> {
        let document = dom::document()?;
        dom::find_target(&document, TARGET_ATTRIBUTE, target_id)
    }
}

fn failure_message(action: &str, target_id: &str, detail: &str) -> String {
    format!("failed to {action} `{target_id}`: {detail}")
}

fn check(result: Result<(), wasm_bindgen::JsValue>, action: &str, target_id: &str) {
    if let Err(err) = result {
        dom::console_error(&failure_message(
            action,
            target_id,
            &dom::js_error_message(&err),
        ));
    }
}

impl HighlightSurface for ClassHighlightSurface {
    fn mark(&self, target_id: &str) {
        let Some(el) = Self::element(target_id) else {
            log::debug!("highlight target `{target_id}` is not in the document");
            return;
        };
        check(el.class_list().add_1(HIGHLIGHT_CLASS), "highlight", target_id);
        check(
            el.set_attribute(ACTIVE_ATTRIBUTE, "true"),
            "flag active",
            target_id,
        );
    }

    fn unmark(&self, target_id: &str) {
        // The element may have been replaced since it was marked.
        let Some(el) = Self::element(target_id) else {
            return;
        };
        check(
            el.class_list().remove_1(HIGHLIGHT_CLASS),
            "unhighlight",
            target_id,
        );
        check(
            el.remove_attribute(ACTIVE_ATTRIBUTE),
            "clear active flag on",
            target_id,
        );
    }
}
