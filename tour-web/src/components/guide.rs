use std::rc::Rc;

use tour_engine::{TourConfig, TourDefinition};
use yew::prelude::*;

use super::labels::OverlayLabels;
use super::overlay::TourOverlay;
use super::replay::ReplayButton;
use crate::hooks::use_tour;

#[derive(Properties, PartialEq, Clone)]
pub struct TourGuideProps {
    pub definition: Rc<TourDefinition>,
    #[prop_or_default]
    pub config: TourConfig,
    #[prop_or_default]
    pub labels: OverlayLabels,
    /// Render a "Replay guide" button while the tour is inactive.
    #[prop_or(true)]
    pub show_replay: bool,
    #[prop_or(AttrValue::Static("Replay guide"))]
    pub replay_label: AttrValue,
}

/// Mounts a tour and renders its overlay; drop it into any page.
#[function_component(TourGuide)]
pub fn tour_guide(props: &TourGuideProps) -> Html {
    let tour = use_tour(Rc::clone(&props.definition), props.config.clone());
    let replay = (props.show_replay && !tour.state.is_active).then(|| {
        html! { <ReplayButton on_replay={tour.restart.clone()} label={props.replay_label.clone()} /> }
    });
    html! {
        <>
            <TourOverlay
                state={tour.state.clone()}
                on_next={tour.next.clone()}
                on_previous={tour.previous.clone()}
                on_skip={tour.skip.clone()}
                on_jump={tour.jump.clone()}
                on_measure={tour.tooltip_measured.clone()}
                labels={props.labels.clone()}
                error={tour.error.clone()}
            />
            { replay.unwrap_or_default() }
        </>
    }
}
