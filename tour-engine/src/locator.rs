//! Resolving step targets to on-screen rectangles.
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};

/// Host lookup of step targets.
///
/// `locate` returning `None` is an expected outcome (element not rendered yet,
/// or a page without that widget); implementations must not panic on it.
pub trait TargetLocator {
    /// Current bounding rectangle of `target_id` in viewport coordinates.
    fn locate(&self, target_id: &str) -> Option<Rect>;

    /// Current viewport size.
    fn viewport(&self) -> Size;

    /// Bring `target_id` into view before it is measured.
    fn reveal(&self, _target_id: &str) {}
}

impl<T: TargetLocator + ?Sized> TargetLocator for Rc<T> {
    fn locate(&self, target_id: &str) -> Option<Rect> {
        (**self).locate(target_id)
    }

    fn viewport(&self) -> Size {
        (**self).viewport()
    }

    fn reveal(&self, target_id: &str) {
        (**self).reveal(target_id);
    }
}

/// Serializable snapshot of a page layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub viewport: Size,
    #[serde(default)]
    pub targets: BTreeMap<String, Rect>,
}

/// Fixed layout for headless hosts and tests.
#[derive(Debug, Default)]
pub struct StaticLayout {
    viewport: Cell<Size>,
    targets: RefCell<BTreeMap<String, Rect>>,
    revealed: RefCell<Vec<String>>,
}

impl StaticLayout {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport: Cell::new(viewport),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_snapshot(snapshot: LayoutSnapshot) -> Self {
        Self {
            viewport: Cell::new(snapshot.viewport),
            targets: RefCell::new(snapshot.targets),
            revealed: RefCell::new(Vec::new()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a [`LayoutSnapshot`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<LayoutSnapshot>(json).map(Self::from_snapshot)
    }

    #[must_use]
    pub fn with_target(self, target_id: impl Into<String>, rect: Rect) -> Self {
        self.targets.borrow_mut().insert(target_id.into(), rect);
        self
    }

    pub fn set_target(&self, target_id: impl Into<String>, rect: Rect) {
        self.targets.borrow_mut().insert(target_id.into(), rect);
    }

    pub fn remove_target(&self, target_id: &str) {
        self.targets.borrow_mut().remove(target_id);
    }

    pub fn set_viewport(&self, viewport: Size) {
        self.viewport.set(viewport);
    }

    /// Shift every target as if the page scrolled down by `dy` pixels.
    pub fn scroll_by(&self, dy: i32) {
        for rect in self.targets.borrow_mut().values_mut() {
            rect.y = rect.y.saturating_sub(dy);
        }
    }

    /// Targets passed to [`TargetLocator::reveal`], in call order.
    #[must_use]
    pub fn revealed(&self) -> Vec<String> {
        self.revealed.borrow().clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            viewport: self.viewport.get(),
            targets: self.targets.borrow().clone(),
        }
    }
}

impl TargetLocator for StaticLayout {
    fn locate(&self, target_id: &str) -> Option<Rect> {
        self.targets.borrow().get(target_id).copied()
    }

    fn viewport(&self) -> Size {
        self.viewport.get()
    }

    fn reveal(&self, target_id: &str) {
        self.revealed.borrow_mut().push(target_id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_targets_are_not_found() {
        let layout = StaticLayout::new(Size::new(800, 600)).with_target("a", Rect::new(1, 2, 3, 4));
        assert_eq!(layout.locate("a"), Some(Rect::new(1, 2, 3, 4)));
        assert_eq!(layout.locate("b"), None);
    }

    #[test]
    fn scrolling_moves_targets_in_viewport_space() {
        let layout =
            StaticLayout::new(Size::new(800, 600)).with_target("card", Rect::new(0, 500, 100, 50));
        layout.scroll_by(200);
        assert_eq!(layout.locate("card"), Some(Rect::new(0, 300, 100, 50)));
    }

    #[test]
    fn layout_loads_from_json() {
        let layout = StaticLayout::from_json(
            r#"{ "viewport": { "width": 1024, "height": 768 },
                 "targets": { "nav": { "x": 0, "y": 0, "width": 1024, "height": 64 } } }"#,
        )
        .unwrap();
        assert_eq!(layout.viewport(), Size::new(1024, 768));
        assert_eq!(layout.locate("nav"), Some(Rect::new(0, 0, 1024, 64)));
    }

    #[test]
    fn reveal_calls_are_recorded() {
        let layout = StaticLayout::new(Size::new(10, 10));
        layout.reveal("x");
        layout.reveal("y");
        assert_eq!(layout.revealed(), vec!["x".to_string(), "y".to_string()]);
    }
}
