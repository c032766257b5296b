use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ReplayButtonProps {
    pub on_replay: Callback<()>,
    #[prop_or(AttrValue::Static("Replay guide"))]
    pub label: AttrValue,
    #[prop_or_default]
    pub class: Classes,
}

/// "Replay guide" control: clears the completion flag and restarts the tour.
#[function_component(ReplayButton)]
pub fn replay_button(props: &ReplayButtonProps) -> Html {
    let onclick = {
        let cb = props.on_replay.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <button
            type="button"
            class={classes!("tour-replay", props.class.clone())}
            onclick={onclick}
        >
            { props.label.clone() }
        </button>
    }
}
