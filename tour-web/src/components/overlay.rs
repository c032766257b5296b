use std::sync::atomic::{AtomicUsize, Ordering};

use tour_engine::{RenderState, Size, TooltipPlacement};
use yew::prelude::*;

use super::labels::OverlayLabels;

static OVERLAY_IDS: AtomicUsize = AtomicUsize::new(0);

/// Padding between the target and the spotlight cut-out.
pub const SPOTLIGHT_PADDING: i32 = 4;

#[derive(Properties, PartialEq, Clone)]
pub struct TourOverlayProps {
    pub state: RenderState,
    pub on_next: Callback<()>,
    pub on_previous: Callback<()>,
    pub on_skip: Callback<()>,
    #[prop_or_default]
    pub on_jump: Callback<usize>,
    /// Receives the rendered tooltip size so placement can use real dimensions.
    #[prop_or_default]
    pub on_measure: Callback<Size>,
    #[prop_or_default]
    pub labels: OverlayLabels,
    #[prop_or_default]
    pub error: Option<AttrValue>,
}

/// Keyboard shortcuts understood by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Next,
    Previous,
    Skip,
}

/// Map a `KeyboardEvent.key` to an overlay action.
#[must_use]
pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "ArrowRight" | "Enter" => Some(KeyAction::Next),
        "ArrowLeft" => Some(KeyAction::Previous),
        "Escape" => Some(KeyAction::Skip),
        _ => None,
    }
}

fn tooltip_style(placement: &TooltipPlacement) -> String {
    format!(
        "top:{}px;left:{}px;width:{}px;max-height:{}px;",
        placement.top, placement.left, placement.width, placement.height
    )
}

fn spotlight_style(state: &RenderState) -> Option<String> {
    let rect = state.target_rect?;
    Some(format!(
        "top:{}px;left:{}px;width:{}px;height:{}px;",
        rect.y - SPOTLIGHT_PADDING,
        rect.x - SPOTLIGHT_PADDING,
        rect.width + 2 * SPOTLIGHT_PADDING,
        rect.height + 2 * SPOTLIGHT_PADDING
    ))
}

fn measure(node: &NodeRef) -> Option<Size> {
    let el = node.cast::<web_sys::HtmlElement>()?;
    // scrollHeight ignores max-height, so oversize content still reports its full height.
    // The width is the placed one; the controller keeps its natural width when shrunk.
    let size = Size::new(el.offset_width(), el.scroll_height());
    (size.width > 0 && size.height > 0).then_some(size)
}

/// Backdrop, spotlight and tooltip for the active step.
#[function_component(TourOverlay)]
pub fn tour_overlay(props: &TourOverlayProps) -> Html {
    let overlay_id = use_state(|| OVERLAY_IDS.fetch_add(1, Ordering::Relaxed));
    let tooltip_ref = use_node_ref();

    {
        let tooltip_ref = tooltip_ref.clone();
        let on_measure = props.on_measure.clone();
        let step = props.state.is_active.then_some(props.state.current_step_index);
        use_effect_with(step, move |step| {
            if step.is_some() {
                if let Some(size) = measure(&tooltip_ref) {
                    on_measure.emit(size);
                }
                if let Some(el) = tooltip_ref.cast::<web_sys::HtmlElement>() {
                    let _ = el.focus();
                }
            }
            || {}
        });
    }

    let state = &props.state;
    if !state.is_active {
        return Html::default();
    }
    let Some(content) = state.step_content.as_ref() else {
        return Html::default();
    };
    let placement = state.tooltip.unwrap_or_default();
    let labels = &props.labels;

    let title_id = format!("tour-title-{}", *overlay_id);
    let body_id = format!("tour-body-{}", *overlay_id);
    let busy = state.busy;

    let on_keydown = {
        let next = props.on_next.clone();
        let previous = props.on_previous.clone();
        let skip = props.on_skip.clone();
        Callback::from(move |e: KeyboardEvent| {
            let Some(action) = key_action(&e.key()) else {
                return;
            };
            // Enter on a focused button already fires its click.
            if e.key() == "Enter" && e.target_dyn_into::<web_sys::HtmlButtonElement>().is_some() {
                return;
            }
            e.prevent_default();
            match action {
                KeyAction::Next => next.emit(()),
                KeyAction::Previous => previous.emit(()),
                KeyAction::Skip => skip.emit(()),
            }
        })
    };
    let on_next = {
        let cb = props.on_next.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let on_previous = {
        let cb = props.on_previous.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let on_skip = {
        let cb = props.on_skip.clone();
        Callback::from(move |_| cb.emit(()))
    };

    let spotlight = spotlight_style(state);
    let backdrop_class = classes!(
        "tour-backdrop",
        spotlight.is_some().then_some("tour-backdrop--spotlit")
    );
    let arrow = placement.arrow_side.map(|side| {
        html! { <span class={classes!("tour-arrow", format!("tour-arrow--{side}"))} aria-hidden="true"></span> }
    });
    let dots = (0..state.total_steps).map(|index| {
        let current = index == state.current_step_index;
        let onclick = {
            let cb = props.on_jump.clone();
            Callback::from(move |_| cb.emit(index))
        };
        html! {
            <li key={index}>
                <button
                    type="button"
                    class={classes!("tour-dot", current.then_some("tour-dot--current"))}
                    aria-label={labels.step_dot_text(index)}
                    aria-current={current.then_some("step")}
                    disabled={busy}
                    onclick={onclick}
                ></button>
            </li>
        }
    });
    let next_label = if state.is_last {
        labels.finish.clone()
    } else {
        labels.next.clone()
    };

    html! {
        <div class="tour-overlay" data-step={state.current_step_index.to_string()}>
            <div class={backdrop_class} role="presentation"></div>
            { spotlight.map(|style| html! {
                <div class="tour-spotlight" style={style} aria-hidden="true"></div>
            }).unwrap_or_default() }
            <div
                class={classes!("tour-tooltip", (!state.anchored).then_some("tour-tooltip--centered"))}
                style={tooltip_style(&placement)}
                role="dialog"
                aria-modal="true"
                aria-labelledby={title_id.clone()}
                aria-describedby={body_id.clone()}
                aria-busy={busy.to_string()}
                aria-label={labels.dialog.clone()}
                tabindex="-1"
                onkeydown={on_keydown}
                ref={tooltip_ref}
            >
                { arrow.unwrap_or_default() }
                <p class="tour-progress" aria-live="polite">
                    { labels.progress_text(state.current_step_index, state.total_steps) }
                </p>
                <h2 id={title_id} class="tour-title">{ content.title.clone() }</h2>
                <p id={body_id} class="tour-body">{ content.body.clone() }</p>
                { props.error.as_ref().map(|msg| html! {
                    <p class="tour-error" role="alert">{ msg.clone() }</p>
                }).unwrap_or_default() }
                <ol class="tour-dots">{ for dots }</ol>
                <div class="tour-actions">
                    <button type="button" class="tour-skip" onclick={on_skip}>
                        { labels.skip.clone() }
                    </button>
                    <button
                        type="button"
                        class="tour-back"
                        disabled={state.is_first || busy}
                        onclick={on_previous}
                    >
                        { labels.back.clone() }
                    </button>
                    <button
                        type="button"
                        class="tour-next"
                        disabled={busy}
                        onclick={on_next}
                    >
                        { next_label }
                    </button>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tour_engine::Rect;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(key_action("ArrowRight"), Some(KeyAction::Next));
        assert_eq!(key_action("Enter"), Some(KeyAction::Next));
        assert_eq!(key_action("ArrowLeft"), Some(KeyAction::Previous));
        assert_eq!(key_action("Escape"), Some(KeyAction::Skip));
        assert_eq!(key_action("Tab"), None);
    }

    #[test]
    fn spotlight_pads_the_target() {
        let state = RenderState {
            target_rect: Some(Rect::new(100, 50, 20, 10)),
            ..RenderState::default()
        };
        assert_eq!(
            spotlight_style(&state).as_deref(),
            Some("top:46px;left:96px;width:28px;height:18px;")
        );
        assert_eq!(spotlight_style(&RenderState::default()), None);
    }
}
