use std::rc::Rc;

use serde_json::{Value, json};
use tour_engine::{
    MemoryFlagStore, RecordingSurface, Side, StaticLayout, TourConfig, TourController,
    TourDefinition, TourState, completion_key,
};

const DEFINITION: &str = include_str!("../../tour-tester/fixtures/candidate_dashboard.json");
const LAYOUT: &str = include_str!("../../tour-tester/fixtures/candidate_layout.json");
const CONFIG: &str = include_str!("../../tour-tester/fixtures/tour_config.json");

#[test]
fn bundled_fixtures_parse() {
    let definition = TourDefinition::from_json(DEFINITION).expect("definition fixture");
    assert_eq!(definition.id, "candidate-dashboard");
    assert!(definition.auto_start);
    assert_eq!(definition.step_count(), 4);
    assert_eq!(definition.steps[2].preferred_side, Side::Left);

    let config = TourConfig::from_json(CONFIG).expect("config fixture");
    assert_eq!(config, TourConfig::default());

    let layout = StaticLayout::from_json(LAYOUT).expect("layout fixture");
    assert_eq!(layout.snapshot().targets.len(), 4);
}

#[test]
fn render_state_serializes_with_stable_field_names() {
    let definition = TourDefinition::from_json(DEFINITION).unwrap();
    let layout = StaticLayout::from_json(LAYOUT).unwrap();
    let mut ctl = TourController::new(
        definition,
        TourConfig::default(),
        Rc::new(MemoryFlagStore::new()),
        layout,
        RecordingSurface::new(),
    )
    .unwrap();
    ctl.start();

    let value = serde_json::to_value(ctl.render_state()).unwrap();
    assert_eq!(value["is_active"], json!(true));
    assert_eq!(value["current_step_index"], json!(0));
    assert_eq!(value["total_steps"], json!(4));
    assert_eq!(value["highlighted_target"], json!("profile-card"));
    assert_eq!(value["step_content"]["title"], json!("Your profile"));
    assert_eq!(value["tooltip"]["arrow_side"], json!("left"));
    assert_eq!(value["tooltip"]["left"], json!(24 + 280 + 12));
    assert_eq!(value["anchored"], json!(true));
    assert_eq!(value["busy"], json!(false));
}

#[test]
fn tour_state_is_tagged() {
    let active = serde_json::to_value(TourState::Active { index: 2 }).unwrap();
    assert_eq!(active, json!({ "state": "active", "index": 2 }));
    let idle: Value = serde_json::to_value(TourState::Idle).unwrap();
    assert_eq!(idle, json!({ "state": "idle" }));
}

#[test]
fn completion_keys_match_the_persisted_scheme() {
    assert_eq!(
        completion_key("candidate-dashboard"),
        "onboarding-candidate-dashboard"
    );
}
