use tour_engine::{Rect, Size, TargetLocator};
use web_sys::{ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::dom;

/// Attribute consulted when no element carries the target id.
pub const TARGET_ATTRIBUTE: &str = "data-tour-id";

/// Resolves tour targets against the live document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomLocator;

impl DomLocator {
    fn element(target_id: &str) -> Option<web_sys::Element> {
        let document = dom::document()?;
        dom::find_target(&document, TARGET_ATTRIBUTE, target_id)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_px(value: f64) -> i32 {
    if value.is_finite() {
        value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    } else {
        0
    }
}

fn window_extent(value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>) -> i32 {
    value.ok().and_then(|v| v.as_f64()).map_or(0, to_px)
}

impl TargetLocator for DomLocator {
    fn locate(&self, target_id: &str) -> Option<Rect> {
        let rect = Self::element(target_id)?.get_bounding_client_rect();
        Some(Rect::new(
            to_px(rect.left()),
            to_px(rect.top()),
            to_px(rect.width()),
            to_px(rect.height()),
        ))
    }

    fn viewport(&self) -> Size {
        dom::window().map_or_else(Size::default, |win| {
            Size::new(
                window_extent(win.inner_width()),
                window_extent(win.inner_height()),
            )
        })
    }

    fn reveal(&self, target_id: &str) {
        let Some(element) = Self::element(target_id) else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_block(ScrollLogicalPosition::Center);
        options.set_inline(ScrollLogicalPosition::Nearest);
        options.set_behavior(ScrollBehavior::Auto);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }
}

#[cfg(test)]
mod tests {
    use super::to_px;

    #[test]
    fn fractional_pixels_round() {
        assert_eq!(to_px(10.4), 10);
        assert_eq!(to_px(10.5), 11);
        assert_eq!(to_px(-3.6), -4);
        assert_eq!(to_px(f64::NAN), 0);
        assert_eq!(to_px(1e12), i32::MAX);
    }
}
