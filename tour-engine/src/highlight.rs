//! Visual emphasis of the current step's target.
use std::cell::RefCell;
use std::rc::Rc;

/// Host drawing primitive behind the [`Highlighter`].
pub trait HighlightSurface {
    fn mark(&self, target_id: &str);
    fn unmark(&self, target_id: &str);
}

impl<T: HighlightSurface + ?Sized> HighlightSurface for Rc<T> {
    fn mark(&self, target_id: &str) {
        (**self).mark(target_id);
    }

    fn unmark(&self, target_id: &str) {
        (**self).unmark(target_id);
    }
}

/// Keeps at most one target marked on its surface.
#[derive(Debug)]
pub struct Highlighter<S> {
    surface: S,
    current: Option<String>,
}

impl<S: HighlightSurface> Highlighter<S> {
    pub const fn new(surface: S) -> Self {
        Self {
            surface,
            current: None,
        }
    }

    /// Move the highlight to `target_id`, or clear it with `None`.
    ///
    /// The previous target is always unmarked before the new one is marked;
    /// re-selecting the current target touches nothing.
    pub fn set_target(&mut self, target_id: Option<&str>) {
        if self.current.as_deref() == target_id {
            return;
        }
        if let Some(previous) = self.current.take() {
            self.surface.unmark(&previous);
        }
        if let Some(next) = target_id {
            self.surface.mark(next);
            self.current = Some(next.to_string());
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }
}

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Mark(String),
    Unmark(String),
}

/// Surface that records calls and tracks what is currently marked.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: RefCell<Vec<SurfaceCall>>,
    marked: RefCell<Vec<String>>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.borrow().clone()
    }

    /// Targets marked and not yet unmarked.
    #[must_use]
    pub fn marked(&self) -> Vec<String> {
        self.marked.borrow().clone()
    }
}

impl HighlightSurface for RecordingSurface {
    fn mark(&self, target_id: &str) {
        self.calls
            .borrow_mut()
            .push(SurfaceCall::Mark(target_id.to_string()));
        self.marked.borrow_mut().push(target_id.to_string());
    }

    fn unmark(&self, target_id: &str) {
        self.calls
            .borrow_mut()
            .push(SurfaceCall::Unmark(target_id.to_string()));
        self.marked.borrow_mut().retain(|id| id != target_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_target_clears_previous_first() {
        let mut hl = Highlighter::new(RecordingSurface::new());
        hl.set_target(Some("a"));
        hl.set_target(Some("b"));
        assert_eq!(
            hl.surface().calls(),
            vec![
                SurfaceCall::Mark("a".into()),
                SurfaceCall::Unmark("a".into()),
                SurfaceCall::Mark("b".into()),
            ]
        );
        assert_eq!(hl.surface().marked(), vec!["b".to_string()]);
        assert_eq!(hl.current(), Some("b"));
    }

    #[test]
    fn same_target_twice_is_a_no_op() {
        let mut hl = Highlighter::new(RecordingSurface::new());
        hl.set_target(Some("a"));
        hl.set_target(Some("a"));
        assert_eq!(hl.surface().calls().len(), 1);
    }

    #[test]
    fn none_clears_without_marking() {
        let mut hl = Highlighter::new(RecordingSurface::new());
        hl.set_target(None);
        assert!(hl.surface().calls().is_empty());
        hl.set_target(Some("a"));
        hl.set_target(None);
        assert!(hl.surface().marked().is_empty());
        assert_eq!(hl.current(), None);
    }
}
