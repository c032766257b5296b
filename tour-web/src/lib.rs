//! Browser bindings for `tour-engine`.
//!
//! Completion flags live in `localStorage`, targets are found by element id or
//! `data-tour-id`, and the overlay is a yew component driven by [`hooks::use_tour`].
#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod components;
pub mod dom;
pub mod highlight;
pub mod hooks;
pub mod listeners;
pub mod locator;
pub mod storage;

pub use highlight::ClassHighlightSurface;
pub use hooks::{TourHandle, WebController, describe_error, use_tour};
pub use locator::DomLocator;
pub use storage::LocalStorageFlagStore;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
