//! Window listeners that detach themselves when dropped.
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

use crate::dom;

/// A registered DOM listener; removed from its target on drop.
pub struct EventListenerGuard {
    target: EventTarget,
    event: &'static str,
    capture: bool,
    closure: Closure<dyn FnMut(Event)>,
}

impl EventListenerGuard {
    /// Register `handler` for `event` on `target`.
    ///
    /// # Errors
    /// Returns the JavaScript exception if the browser refuses the listener.
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        capture: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_capture(capture);
        options.set_passive(true);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            target: target.clone(),
            event,
            capture,
            closure,
        })
    }
}

impl Drop for EventListenerGuard {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback_and_bool(
                self.event,
                self.closure.as_ref().unchecked_ref(),
                self.capture,
            );
    }
}

/// Resize and scroll listeners that trigger tooltip re-placement.
pub struct ViewportListeners {
    _resize: EventListenerGuard,
    _scroll: EventListenerGuard,
}

impl ViewportListeners {
    /// Call `on_change` whenever the window resizes or anything scrolls.
    ///
    /// Scroll is registered in the capture phase so nested scroll containers count.
    ///
    /// # Errors
    /// Returns an error when there is no window or a listener cannot be added.
    pub fn attach(on_change: impl Fn() + Clone + 'static) -> Result<Self, JsValue> {
        let window = dom::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
        let target: &EventTarget = window.as_ref();
        let on_resize = on_change.clone();
        let resize = EventListenerGuard::new(target, "resize", false, move |_| on_resize())?;
        let scroll = EventListenerGuard::new(target, "scroll", true, move |_| on_change())?;
        Ok(Self {
            _resize: resize,
            _scroll: scroll,
        })
    }
}
