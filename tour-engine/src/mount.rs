//! Mounting a tour for a host page.
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::TourConfig;
use crate::controller::{TourController, Transition};
use crate::definition::TourDefinition;
use crate::error::TourError;
use crate::highlight::HighlightSurface;
use crate::locator::TargetLocator;
use crate::store::FlagStore;

/// Controller shared between the host's event handlers.
pub type SharedController<S, L, H> = Rc<RefCell<TourController<S, L, H>>>;

/// Replays a mounted tour from any "replay guide" control.
///
/// Holds only a weak reference: once the host drops the controller, `restart`
/// does nothing.
#[derive(Clone)]
pub struct RestartHandle {
    replay: Rc<dyn Fn() -> bool>,
}

impl RestartHandle {
    fn new<S, L, H>(controller: Weak<RefCell<TourController<S, L, H>>>) -> Self
    where
        S: FlagStore + 'static,
        L: TargetLocator + 'static,
        H: HighlightSurface + 'static,
    {
        Self {
            replay: Rc::new(move || {
                let Some(controller) = controller.upgrade() else {
                    return false;
                };
                let Ok(mut controller) = controller.try_borrow_mut() else {
                    log::warn!("tour replay requested while the controller is busy");
                    return false;
                };
                matches!(controller.force_start(), Transition::Started { .. })
            }),
        }
    }

    /// Clear the completion flag and restart at the first step.
    ///
    /// Returns `true` if the tour restarted.
    pub fn restart(&self) -> bool {
        (self.replay)()
    }
}

impl fmt::Debug for RestartHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RestartHandle")
    }
}

impl PartialEq for RestartHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.replay, &other.replay)
    }
}

/// A mounted tour: the controller plus its replay affordance.
pub struct Mounted<S, L, H> {
    pub controller: SharedController<S, L, H>,
    pub restart: RestartHandle,
}

/// Build a controller for `definition` and auto-start it when requested.
///
/// # Errors
///
/// Returns an error if the definition or configuration is invalid.
pub fn mount<S, L, H>(
    definition: TourDefinition,
    config: TourConfig,
    store: S,
    locator: L,
    surface: H,
) -> Result<Mounted<S, L, H>, TourError>
where
    S: FlagStore + 'static,
    L: TargetLocator + 'static,
    H: HighlightSurface + 'static,
{
    let auto_start = definition.auto_start;
    let mut controller = TourController::new(definition, config, store, locator, surface)?;
    if auto_start {
        controller.start();
    }
    let controller = Rc::new(RefCell::new(controller));
    let restart = RestartHandle::new(Rc::downgrade(&controller));
    Ok(Mounted {
        controller,
        restart,
    })
}
