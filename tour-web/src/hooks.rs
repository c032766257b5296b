//! `use_tour`: mounts a tour against the live document for a yew component.
use std::cell::RefCell;
use std::error::Error as StdError;
use std::rc::{Rc, Weak};

use tour_engine::{
    Mounted, PendingAdvance, RenderState, Size, TourConfig, TourController, TourDefinition,
    TourError, Transition, mount,
};
use yew::prelude::*;

use crate::dom;
use crate::highlight::ClassHighlightSurface;
use crate::listeners::ViewportListeners;
use crate::locator::DomLocator;
use crate::storage::LocalStorageFlagStore;

/// The controller type driven by the browser bindings.
pub type WebController = TourController<LocalStorageFlagStore, DomLocator, ClassHighlightSurface>;
type WebMounted = Mounted<LocalStorageFlagStore, DomLocator, ClassHighlightSurface>;
type Shared = Rc<RefCell<WebController>>;

/// What a component needs to draw and drive a tour.
#[derive(Clone, PartialEq)]
pub struct TourHandle {
    pub state: RenderState,
    /// Message of the last failed hook, cleared by the next successful move.
    pub error: Option<AttrValue>,
    pub next: Callback<()>,
    pub previous: Callback<()>,
    pub skip: Callback<()>,
    pub jump: Callback<usize>,
    /// Clears the completion flag and replays from the first step.
    pub restart: Callback<()>,
    pub tooltip_measured: Callback<Size>,
}

/// Render an error with its whole source chain.
#[must_use]
pub fn describe_error(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn report(outcome: Result<Transition, TourError>, error: &UseStateSetter<Option<AttrValue>>) {
    match outcome {
        Ok(transition) if transition.changed_state() => error.set(None),
        Ok(_) => {}
        Err(err) => {
            let message = describe_error(&err);
            log::error!("{message}");
            dom::console_error(&message);
            error.set(Some(AttrValue::from(message)));
        }
    }
}

fn drive_next(shared: &Shared, error: UseStateSetter<Option<AttrValue>>) {
    let Ok(mut controller) = shared.try_borrow_mut() else {
        return;
    };
    let outcome = controller.next();
    drop(controller);
    match outcome {
        Ok(Transition::Deferred(PendingAdvance { ticket, future })) => {
            let weak: Weak<RefCell<WebController>> = Rc::downgrade(shared);
            wasm_bindgen_futures::spawn_local(async move {
                let result = future.await;
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                let Ok(mut controller) = shared.try_borrow_mut() else {
                    log::warn!("advance for step {} resolved during another command", ticket.step());
                    return;
                };
                let resolved = controller.resolve_advance(ticket, result);
                drop(controller);
                report(resolved, &error);
            });
        }
        other => report(other, &error),
    }
}

fn with_controller(slot: &Rc<RefCell<Option<WebMounted>>>) -> Option<Shared> {
    slot.borrow()
        .as_ref()
        .map(|mounted| Rc::clone(&mounted.controller))
}

fn command(
    slot: &Rc<RefCell<Option<WebMounted>>>,
    run: impl Fn(&mut WebController) + 'static,
) -> Callback<()> {
    let slot = Rc::clone(slot);
    Callback::from(move |()| {
        if let Some(shared) = with_controller(&slot)
            && let Ok(mut controller) = shared.try_borrow_mut()
        {
            run(&mut controller);
        }
    })
}

/// Run `teardown` on the controller, or warn when it is still borrowed.
fn release<T>(controller: &RefCell<T>, teardown: impl FnOnce(&mut T)) -> bool {
    match controller.try_borrow_mut() {
        Ok(mut controller) => {
            teardown(&mut controller);
            true
        }
        Err(err) => {
            log::warn!("tour controller busy at unmount ({err}); highlight left in place");
            false
        }
    }
}

fn attach(
    definition: &TourDefinition,
    config: &TourConfig,
    render: UseStateSetter<RenderState>,
) -> Result<(WebMounted, Option<ViewportListeners>), TourError> {
    let mounted = mount(
        definition.clone(),
        config.clone(),
        LocalStorageFlagStore,
        DomLocator,
        ClassHighlightSurface,
    )?;
    {
        let mut controller = mounted.controller.borrow_mut();
        render.set(controller.render_state());
        controller.subscribe(move |state| render.set(state.clone()));
    }
    let weak = Rc::downgrade(&mounted.controller);
    let listeners = ViewportListeners::attach(move || {
        if let Some(shared) = weak.upgrade()
            && let Ok(mut controller) = shared.try_borrow_mut()
        {
            controller.refresh();
        }
    })
    .map_err(|err| {
        log::warn!(
            "tour `{}`: viewport listeners unavailable: {}",
            definition.id,
            dom::js_error_message(&err)
        );
    })
    .ok();
    Ok((mounted, listeners))
}

/// Mount `definition` for the lifetime of the calling component.
///
/// Remounts when the definition or configuration changes; unmounting tears the
/// tour down and removes every listener it registered.
#[hook]
pub fn use_tour(definition: Rc<TourDefinition>, config: TourConfig) -> TourHandle {
    let render = use_state(RenderState::default);
    let error = use_state(|| None::<AttrValue>);
    let slot = use_mut_ref(|| None::<WebMounted>);

    {
        let slot = slot.clone();
        let render = render.setter();
        let error = error.setter();
        use_effect_with((definition, config), move |(definition, config)| {
            let mut listeners = None;
            if cfg!(target_arch = "wasm32") {
                match attach(definition, config, render) {
                    Ok((mounted, attached)) => {
                        *slot.borrow_mut() = Some(mounted);
                        listeners = attached;
                    }
                    Err(err) => {
                        let message = describe_error(&err);
                        dom::console_error(&message);
                        error.set(Some(AttrValue::from(message)));
                    }
                }
            }
            move || {
                drop(listeners);
                if let Some(mounted) = slot.borrow_mut().take() {
                    release(&*mounted.controller, WebController::teardown);
                }
            }
        });
    }

    let next = {
        let slot = slot.clone();
        let error = error.setter();
        Callback::from(move |()| {
            if let Some(shared) = with_controller(&slot) {
                drive_next(&shared, error.clone());
            }
        })
    };
    let previous = command(&slot, |controller| {
        controller.previous();
    });
    let skip = command(&slot, |controller| {
        controller.skip();
    });
    let jump = {
        let slot = slot.clone();
        Callback::from(move |index: usize| {
            if let Some(shared) = with_controller(&slot)
                && let Ok(mut controller) = shared.try_borrow_mut()
            {
                controller.jump_to(index);
            }
        })
    };
    let restart = {
        let slot = slot.clone();
        let error = error.setter();
        Callback::from(move |()| {
            let handle = slot.borrow().as_ref().map(|mounted| mounted.restart.clone());
            if handle.is_some_and(|handle| handle.restart()) {
                error.set(None);
            }
        })
    };
    let tooltip_measured = {
        let slot = slot.clone();
        Callback::from(move |size: Size| {
            if let Some(shared) = with_controller(&slot)
                && let Ok(mut controller) = shared.try_borrow_mut()
            {
                controller.set_tooltip_size(size);
            }
        })
    };

    TourHandle {
        state: (*render).clone(),
        error: (*error).clone(),
        next,
        previous,
        skip,
        jump,
        restart,
        tooltip_measured,
    }
}
