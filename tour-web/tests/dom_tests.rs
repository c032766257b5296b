#![cfg(target_arch = "wasm32")]

use tour_engine::{FlagStore, HighlightSurface, TargetLocator, completion_key};
use tour_web::dom;
use tour_web::highlight::{ACTIVE_ATTRIBUTE, HIGHLIGHT_CLASS};
use tour_web::{ClassHighlightSurface, DomLocator, LocalStorageFlagStore};
use wasm_bindgen_test::*;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn fixture(id: Option<&str>, data_tour_id: Option<&str>) -> web_sys::Element {
    let doc = dom::document().expect("document");
    let el = doc.create_element("div").expect("create target");
    if let Some(id) = id {
        el.set_id(id);
    }
    if let Some(value) = data_tour_id {
        el.set_attribute("data-tour-id", value)
            .expect("set data-tour-id");
    }
    el.set_attribute("style", "position:absolute;top:40px;left:30px;width:120px;height:20px")
        .expect("style");
    doc.body()
        .expect("document body")
        .append_child(&el)
        .expect("append target");
    el
}

#[wasm_bindgen_test]
fn locator_finds_by_id_and_data_attribute() {
    let by_id = fixture(Some("tour-profile-card"), None);
    let by_attr = fixture(None, Some("tour-inbox"));

    let locator = DomLocator;
    let rect = locator.locate("tour-profile-card").expect("found by id");
    assert_eq!((rect.width, rect.height), (120, 20));
    assert!(locator.locate("tour-inbox").is_some());
    assert!(locator.locate("tour-nowhere").is_none());
    let viewport = locator.viewport();
    assert!(viewport.width > 0 && viewport.height > 0);

    by_id.remove();
    by_attr.remove();
}

#[wasm_bindgen_test]
fn highlight_toggles_class_and_attribute() {
    let el = fixture(Some("tour-job-feed"), None);
    let surface = ClassHighlightSurface;
    surface.mark("tour-job-feed");
    assert!(el.class_list().contains(HIGHLIGHT_CLASS));
    assert_eq!(el.get_attribute(ACTIVE_ATTRIBUTE).as_deref(), Some("true"));
    surface.unmark("tour-job-feed");
    assert!(!el.class_list().contains(HIGHLIGHT_CLASS));
    assert!(el.get_attribute(ACTIVE_ATTRIBUTE).is_none());
    surface.unmark("tour-gone");
    el.remove();
}

#[wasm_bindgen_test]
fn completion_flags_round_trip_through_local_storage() {
    let store = LocalStorageFlagStore;
    let id = "wasm-dom-test";
    store.reset(id).expect("reset");
    assert_eq!(store.is_completed(id), Ok(false));
    store.mark_completed(id).expect("mark");
    assert_eq!(store.is_completed(id), Ok(true));
    let raw = dom::local_storage()
        .expect("storage")
        .get_item(&completion_key(id))
        .expect("read");
    assert_eq!(raw.as_deref(), Some("completed"));
    store.reset(id).expect("reset");
    assert_eq!(store.is_completed(id), Ok(false));
}
