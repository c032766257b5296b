//! The tour step state machine.
//!
//! # Invariants
//!
//! 1. `0 <= index < steps.len()` whenever the state is `Active`.
//! 2. At most one target is highlighted, and none outside `Active`.
//! 3. Completing or skipping writes the completion flag exactly once per run.
//! 4. While a deferred advance hook is pending, `next`, `previous`, `jump_to`
//!    and `force_start` are rejected; `skip` and `teardown` cancel it.
use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::config::TourConfig;
use crate::definition::{AdvanceHook, HookError, HookFuture, TourDefinition};
use crate::error::TourError;
use crate::geometry::{Rect, Size};
use crate::highlight::{HighlightSurface, Highlighter};
use crate::locator::TargetLocator;
use crate::position::{PositionEngine, TooltipPlacement};
use crate::store::FlagStore;

/// Coarse machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TourState {
    Idle,
    Active { index: usize },
    Completed,
}

/// The live walkthrough owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TourSession {
    pub definition_id: String,
    pub current_index: usize,
    pub is_active: bool,
}

/// Why a tour reached `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    Finished,
    Skipped,
}

/// Identifies one pending deferred advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceTicket {
    generation: u64,
    step: usize,
}

impl AdvanceTicket {
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }
}

/// A deferred hook the host must drive, then hand back through
/// [`TourController::resolve_advance`].
pub struct PendingAdvance {
    pub ticket: AdvanceTicket,
    pub future: HookFuture,
}

impl fmt::Debug for PendingAdvance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingAdvance")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// Observable outcome of a command.
#[derive(Debug)]
pub enum Transition {
    /// Not applicable in the current state.
    Ignored,
    /// Refused because a deferred advance is still pending.
    Rejected,
    Started { index: usize },
    Moved { from: usize, to: usize },
    Completed { reason: CompletionReason },
    Deferred(PendingAdvance),
}

impl Transition {
    #[must_use]
    pub const fn changed_state(&self) -> bool {
        matches!(
            self,
            Self::Started { .. } | Self::Moved { .. } | Self::Completed { .. }
        )
    }
}

/// Title and body of the current step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepContent {
    pub title: String,
    pub body: String,
}

/// Everything the host needs to paint the overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderState {
    pub is_active: bool,
    pub current_step_index: usize,
    pub total_steps: usize,
    pub tooltip: Option<TooltipPlacement>,
    pub step_content: Option<StepContent>,
    pub highlighted_target: Option<String>,
    pub target_rect: Option<Rect>,
    pub anchored: bool,
    pub is_first: bool,
    pub is_last: bool,
    pub busy: bool,
}

type Observer = Rc<dyn Fn(&RenderState)>;

/// Orchestrates the flag store, locator, placement and highlight for one tour.
pub struct TourController<S, L, H> {
    definition: TourDefinition,
    config: TourConfig,
    engine: PositionEngine,
    store: S,
    locator: L,
    highlighter: Highlighter<H>,
    state: TourState,
    tooltip_size: Size,
    placement: Option<TooltipPlacement>,
    target_rect: Option<Rect>,
    pending: Option<AdvanceTicket>,
    generation: u64,
    detached: bool,
    observers: Vec<Observer>,
}

impl<S, L, H> fmt::Debug for TourController<S, L, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourController")
            .field("tour", &self.definition.id)
            .field("state", &self.state)
            .field("placement", &self.placement)
            .field("pending", &self.pending)
            .field("detached", &self.detached)
            .finish_non_exhaustive()
    }
}

impl<S, L, H> TourController<S, L, H>
where
    S: FlagStore,
    L: TargetLocator,
    H: HighlightSurface,
{
    /// Build an idle controller.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition or configuration is invalid.
    pub fn new(
        definition: TourDefinition,
        config: TourConfig,
        store: S,
        locator: L,
        surface: H,
    ) -> Result<Self, TourError> {
        definition.validate()?;
        config.validate()?;
        Ok(Self {
            engine: PositionEngine::new(config.gap),
            tooltip_size: config.tooltip_size,
            definition,
            config,
            store,
            locator,
            highlighter: Highlighter::new(surface),
            state: TourState::Idle,
            placement: None,
            target_rect: None,
            pending: None,
            generation: 0,
            detached: false,
            observers: Vec::new(),
        })
    }

    #[must_use]
    pub const fn state(&self) -> TourState {
        self.state
    }

    #[must_use]
    pub const fn definition(&self) -> &TourDefinition {
        &self.definition
    }

    #[must_use]
    pub const fn config(&self) -> &TourConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn locator(&self) -> &L {
        &self.locator
    }

    #[must_use]
    pub const fn surface(&self) -> &H {
        self.highlighter.surface()
    }

    #[must_use]
    pub const fn placement(&self) -> Option<TooltipPlacement> {
        self.placement
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.detached
    }

    /// The active session, if a walkthrough is running.
    #[must_use]
    pub fn session(&self) -> Option<TourSession> {
        match self.state {
            TourState::Active { index } => Some(TourSession {
                definition_id: self.definition.id.clone(),
                current_index: index,
                is_active: true,
            }),
            TourState::Idle | TourState::Completed => None,
        }
    }

    /// Register an observer notified after every published change.
    ///
    /// Observers run while the controller is borrowed and must not call back into it.
    pub fn subscribe(&mut self, observer: impl Fn(&RenderState) + 'static) {
        self.observers.push(Rc::new(observer));
    }

    /// Snapshot of what the host should render.
    #[must_use]
    pub fn render_state(&self) -> RenderState {
        let total_steps = self.definition.step_count();
        let TourState::Active { index } = self.state else {
            return RenderState {
                total_steps,
                ..RenderState::default()
            };
        };
        let step = self.definition.step(index);
        RenderState {
            is_active: true,
            current_step_index: index,
            total_steps,
            tooltip: self.placement,
            step_content: step.map(|step| StepContent {
                title: step.title.clone(),
                body: step.body.clone(),
            }),
            highlighted_target: self.highlighter.current().map(str::to_string),
            target_rect: self.target_rect,
            anchored: self.target_rect.is_some(),
            is_first: index == 0,
            is_last: index + 1 == total_steps,
            busy: self.pending.is_some(),
        }
    }

    /// Activate the tour unless it was already completed.
    pub fn start(&mut self) -> Transition {
        if self.detached || self.state != TourState::Idle {
            return Transition::Ignored;
        }
        let completed = self
            .store
            .is_completed(&self.definition.id)
            .unwrap_or_else(|err| {
                log::warn!(
                    "tour `{}`: completion flag unreadable, treating as unseen: {err}",
                    self.definition.id
                );
                false
            });
        if completed {
            log::debug!("tour `{}` already completed; not starting", self.definition.id);
            return Transition::Ignored;
        }
        log::info!("tour `{}` started", self.definition.id);
        self.enter(0);
        Transition::Started { index: 0 }
    }

    /// Clear the completion flag and restart from the first step.
    pub fn force_start(&mut self) -> Transition {
        if self.detached {
            return Transition::Ignored;
        }
        if self.pending.is_some() {
            log::warn!(
                "tour `{}`: replay rejected while an advance is pending",
                self.definition.id
            );
            return Transition::Rejected;
        }
        if let Err(err) = self.store.reset(&self.definition.id) {
            log::warn!(
                "tour `{}`: failed to clear completion flag: {err}",
                self.definition.id
            );
        }
        log::info!("tour `{}` replayed", self.definition.id);
        self.enter(0);
        Transition::Started { index: 0 }
    }

    /// Run the current step's hook, then move forward or complete.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::StepCallback`] when an immediate hook fails; the
    /// state is left unchanged.
    pub fn next(&mut self) -> Result<Transition, TourError> {
        let Some(index) = self.active_index() else {
            return Ok(Transition::Ignored);
        };
        if self.pending.is_some() {
            log::warn!(
                "tour `{}`: next rejected while an advance is pending",
                self.definition.id
            );
            return Ok(Transition::Rejected);
        }
        let hook = self
            .definition
            .step(index)
            .and_then(|step| step.on_advance.clone());
        match hook {
            None => Ok(self.advance_from(index)),
            Some(AdvanceHook::Immediate(hook)) => {
                hook().map_err(|source| self.hook_failure(index, source))?;
                Ok(self.advance_from(index))
            }
            Some(AdvanceHook::Deferred(hook)) => {
                self.generation = self.generation.wrapping_add(1);
                let ticket = AdvanceTicket {
                    generation: self.generation,
                    step: index,
                };
                self.pending = Some(ticket);
                self.publish();
                Ok(Transition::Deferred(PendingAdvance {
                    ticket,
                    future: hook(),
                }))
            }
        }
    }

    /// Finish a deferred advance started by [`Self::next`].
    ///
    /// Stale tickets (after `skip`, `teardown`, or a newer advance) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TourError::StepCallback`] when the hook failed; the step does not change.
    pub fn resolve_advance(
        &mut self,
        ticket: AdvanceTicket,
        outcome: Result<(), HookError>,
    ) -> Result<Transition, TourError> {
        if self.detached || self.pending != Some(ticket) {
            log::debug!(
                "tour `{}`: ignoring stale advance for step {}",
                self.definition.id,
                ticket.step
            );
            return Ok(Transition::Ignored);
        }
        self.pending = None;
        match outcome {
            Ok(()) => Ok(self.advance_from(ticket.step)),
            Err(source) => {
                self.publish();
                Err(self.hook_failure(ticket.step, source))
            }
        }
    }

    /// Step back; ignored on the first step.
    pub fn previous(&mut self) -> Transition {
        let Some(index) = self.active_index() else {
            return Transition::Ignored;
        };
        if self.pending.is_some() {
            return Transition::Rejected;
        }
        if index == 0 {
            return Transition::Ignored;
        }
        self.enter(index - 1);
        Transition::Moved {
            from: index,
            to: index - 1,
        }
    }

    /// Jump straight to `target`, skipping hooks of the steps in between.
    pub fn jump_to(&mut self, target: usize) -> Transition {
        let Some(index) = self.active_index() else {
            return Transition::Ignored;
        };
        if self.pending.is_some() {
            return Transition::Rejected;
        }
        if target == index || target >= self.definition.step_count() {
            return Transition::Ignored;
        }
        self.enter(target);
        Transition::Moved {
            from: index,
            to: target,
        }
    }

    /// Opt out of the tour; persisted exactly like finishing it.
    pub fn skip(&mut self) -> Transition {
        if self.active_index().is_none() {
            return Transition::Ignored;
        }
        self.pending = None;
        self.finish(CompletionReason::Skipped)
    }

    /// Recompute the placement of the current step after a resize or scroll.
    ///
    /// Returns `true` when the published render state changed.
    pub fn refresh(&mut self) -> bool {
        let Some(index) = self.active_index() else {
            return false;
        };
        let before = (self.placement, self.target_rect);
        self.layout(index);
        if before == (self.placement, self.target_rect) {
            return false;
        }
        self.publish();
        true
    }

    /// Record the measured tooltip size and re-place the current step.
    ///
    /// A width at or below the one placement already shrank the box to is the
    /// rendered width, not the natural one, so the natural width is kept and
    /// the tooltip grows back once the viewport allows it.
    pub fn set_tooltip_size(&mut self, size: Size) -> bool {
        if size.width <= 0 || size.height <= 0 {
            return false;
        }
        let width = match self.placement {
            Some(placed)
                if placed.width < self.tooltip_size.width && size.width <= placed.width =>
            {
                self.tooltip_size.width
            }
            _ => size.width,
        };
        let size = Size::new(width, size.height);
        if size == self.tooltip_size {
            return false;
        }
        self.tooltip_size = size;
        self.refresh()
    }

    /// Detach from the host: clear the highlight and stop reacting to anything.
    pub fn teardown(&mut self) {
        if self.detached {
            return;
        }
        self.highlighter.set_target(None);
        self.pending = None;
        self.placement = None;
        self.target_rect = None;
        if matches!(self.state, TourState::Active { .. }) {
            self.state = TourState::Idle;
        }
        self.detached = true;
        self.observers.clear();
        log::debug!("tour `{}` torn down", self.definition.id);
    }

    fn active_index(&self) -> Option<usize> {
        if self.detached {
            return None;
        }
        match self.state {
            TourState::Active { index } => Some(index),
            TourState::Idle | TourState::Completed => None,
        }
    }

    fn advance_from(&mut self, index: usize) -> Transition {
        let to = index + 1;
        if to < self.definition.step_count() {
            self.enter(to);
            Transition::Moved { from: index, to }
        } else {
            self.finish(CompletionReason::Finished)
        }
    }

    fn enter(&mut self, index: usize) {
        self.state = TourState::Active { index };
        if self.config.scroll_into_view
            && let Some(step) = self.definition.step(index)
        {
            self.locator.reveal(&step.target_id);
        }
        self.layout(index);
        self.publish();
    }

    fn layout(&mut self, index: usize) {
        let Some(step) = self.definition.step(index) else {
            return;
        };
        let viewport = self.locator.viewport();
        let margin = self.config.margin;
        match self.locator.locate(&step.target_id) {
            Some(rect) => {
                self.placement = Some(self.engine.compute(
                    rect,
                    self.tooltip_size,
                    step.preferred_side,
                    viewport,
                    margin,
                ));
                self.target_rect = Some(rect);
                self.highlighter.set_target(Some(&step.target_id));
            }
            None => {
                log::debug!(
                    "tour `{}`: target `{}` not found; step {index} shown unanchored",
                    self.definition.id,
                    step.target_id
                );
                self.placement = Some(self.engine.centered(self.tooltip_size, viewport, margin));
                self.target_rect = None;
                self.highlighter.set_target(None);
            }
        }
    }

    fn finish(&mut self, reason: CompletionReason) -> Transition {
        self.state = TourState::Completed;
        self.placement = None;
        self.target_rect = None;
        self.highlighter.set_target(None);
        if let Err(err) = self.store.mark_completed(&self.definition.id) {
            log::warn!(
                "tour `{}`: completion flag not saved, tour may reappear: {err}",
                self.definition.id
            );
        }
        log::info!("tour `{}` {reason:?}", self.definition.id);
        self.publish();
        Transition::Completed { reason }
    }

    fn hook_failure(&self, step: usize, source: HookError) -> TourError {
        TourError::StepCallback {
            step,
            target_id: self
                .definition
                .step(step)
                .map(|s| s.target_id.clone())
                .unwrap_or_default(),
            source,
        }
    }

    fn publish(&self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.render_state();
        for observer in &self.observers {
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Step;
    use crate::geometry::Side;
    use crate::highlight::RecordingSurface;
    use crate::locator::StaticLayout;
    use crate::store::MemoryFlagStore;
    use std::cell::{Cell, RefCell};

    type TestController = TourController<Rc<MemoryFlagStore>, Rc<StaticLayout>, Rc<RecordingSurface>>;

    struct Fixture {
        store: Rc<MemoryFlagStore>,
        layout: Rc<StaticLayout>,
        surface: Rc<RecordingSurface>,
    }

    fn fixture() -> Fixture {
        let layout = StaticLayout::new(Size::new(1280, 720))
            .with_target("a", Rect::new(40, 40, 120, 40))
            .with_target("b", Rect::new(400, 200, 200, 80))
            .with_target("c", Rect::new(900, 500, 160, 60));
        Fixture {
            store: Rc::new(MemoryFlagStore::new()),
            layout: Rc::new(layout),
            surface: Rc::new(RecordingSurface::new()),
        }
    }

    fn three_steps() -> TourDefinition {
        TourDefinition::new(
            "candidate",
            vec![
                Step::new("a", "Profile", "Your profile"),
                Step::new("b", "Jobs", "Matches").side(Side::Right),
                Step::new("c", "Inbox", "Messages").side(Side::Top),
            ],
        )
    }

    fn controller(fx: &Fixture, definition: TourDefinition) -> TestController {
        TourController::new(
            definition,
            TourConfig::default(),
            Rc::clone(&fx.store),
            Rc::clone(&fx.layout),
            Rc::clone(&fx.surface),
        )
        .unwrap()
    }

    #[test]
    fn start_enters_first_step_and_highlights_it() {
        let fx = fixture();
        let mut ctl = controller(&fx, three_steps());
        assert!(matches!(ctl.start(), Transition::Started { index: 0 }));
        let render = ctl.render_state();
        assert!(render.is_active);
        assert!(render.is_first);
        assert_eq!(render.highlighted_target.as_deref(), Some("a"));
        assert!(render.anchored);
        assert_eq!(fx.layout.revealed(), vec!["a".to_string()]);
        assert_eq!(
            ctl.session(),
            Some(TourSession {
                definition_id: "candidate".into(),
                current_index: 0,
                is_active: true,
            })
        );
    }

    #[test]
    fn start_is_ignored_when_already_active() {
        let fx = fixture();
        let mut ctl = controller(&fx, three_steps());
        ctl.start();
        ctl.next().unwrap();
        assert!(matches!(ctl.start(), Transition::Ignored));
        assert_eq!(ctl.state(), TourState::Active { index: 1 });
    }

    #[test]
    fn immediate_hook_runs_before_transition() {
        let fx = fixture();
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        let mut def = three_steps();
        def.steps[0].on_advance = Some(AdvanceHook::immediate(move || {
            seen.set(seen.get() + 1);
            Ok(())
        }));
        let mut ctl = controller(&fx, def);
        ctl.start();
        assert!(matches!(ctl.next().unwrap(), Transition::Moved { from: 0, to: 1 }));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn failing_hook_aborts_and_surfaces_error() {
        let fx = fixture();
        let mut def = three_steps();
        def.steps[1].on_advance = Some(AdvanceHook::immediate(|| {
            Err(HookError::msg("resume upload failed"))
        }));
        let mut ctl = controller(&fx, def);
        ctl.start();
        ctl.next().unwrap();
        let err = ctl.next().unwrap_err();
        match err {
            TourError::StepCallback {
                step,
                ref target_id,
                ref source,
            } => {
                assert_eq!(step, 1);
                assert_eq!(target_id, "b");
                assert_eq!(source.to_string(), "resume upload failed");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(ctl.state(), TourState::Active { index: 1 });
        assert_eq!(fx.store.is_completed("candidate"), Ok(false));
    }

    #[test]
    fn deferred_hook_rejects_concurrent_commands() {
        let fx = fixture();
        let mut def = three_steps();
        def.steps[0].on_advance = Some(AdvanceHook::deferred(|| async { Ok(()) }));
        let mut ctl = controller(&fx, def);
        ctl.start();
        let Transition::Deferred(pending) = ctl.next().unwrap() else {
            panic!("expected deferred advance");
        };
        assert!(ctl.is_busy());
        assert!(ctl.render_state().busy);
        assert!(matches!(ctl.next().unwrap(), Transition::Rejected));
        assert!(matches!(ctl.previous(), Transition::Rejected));
        assert!(matches!(ctl.force_start(), Transition::Rejected));
        assert_eq!(ctl.state(), TourState::Active { index: 0 });

        let outcome = futures::executor::block_on(pending.future);
        let moved = ctl.resolve_advance(pending.ticket, outcome).unwrap();
        assert!(matches!(moved, Transition::Moved { from: 0, to: 1 }));
        assert!(!ctl.is_busy());
    }

    #[test]
    fn deferred_failure_keeps_step_and_clears_busy() {
        let fx = fixture();
        let mut def = three_steps();
        def.steps[0].on_advance = Some(AdvanceHook::deferred(|| async {
            Err(HookError::msg("network down"))
        }));
        let mut ctl = controller(&fx, def);
        ctl.start();
        let Transition::Deferred(pending) = ctl.next().unwrap() else {
            panic!("expected deferred advance");
        };
        let outcome = futures::executor::block_on(pending.future);
        assert!(ctl.resolve_advance(pending.ticket, outcome).is_err());
        assert_eq!(ctl.state(), TourState::Active { index: 0 });
        assert!(!ctl.is_busy());
    }

    #[test]
    fn skip_cancels_pending_advance() {
        let fx = fixture();
        let mut def = three_steps();
        def.steps[0].on_advance = Some(AdvanceHook::deferred(|| async { Ok(()) }));
        let mut ctl = controller(&fx, def);
        ctl.start();
        let Transition::Deferred(pending) = ctl.next().unwrap() else {
            panic!("expected deferred advance");
        };
        assert!(matches!(
            ctl.skip(),
            Transition::Completed {
                reason: CompletionReason::Skipped
            }
        ));
        let late = ctl.resolve_advance(pending.ticket, Ok(())).unwrap();
        assert!(matches!(late, Transition::Ignored));
        assert_eq!(ctl.state(), TourState::Completed);
        assert_eq!(fx.store.completion_writes(), 1);
    }

    #[test]
    fn jump_to_moves_within_bounds_only() {
        let fx = fixture();
        let mut ctl = controller(&fx, three_steps());
        ctl.start();
        assert!(matches!(ctl.jump_to(2), Transition::Moved { from: 0, to: 2 }));
        assert!(matches!(ctl.jump_to(2), Transition::Ignored));
        assert!(matches!(ctl.jump_to(9), Transition::Ignored));
        assert!(ctl.render_state().is_last);
    }

    #[test]
    fn observers_see_every_published_state() {
        let fx = fixture();
        let seen: Rc<RefCell<Vec<(bool, usize)>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut ctl = controller(&fx, three_steps());
        ctl.subscribe(move |state| {
            sink.borrow_mut()
                .push((state.is_active, state.current_step_index));
        });
        ctl.start();
        ctl.next().unwrap();
        ctl.skip();
        assert_eq!(*seen.borrow(), vec![(true, 0), (true, 1), (false, 0)]);
    }

    #[test]
    fn refresh_tracks_scrolling_without_transitions() {
        let fx = fixture();
        let mut ctl = controller(&fx, three_steps());
        ctl.start();
        ctl.next().unwrap();
        let before = ctl.placement().unwrap();
        fx.layout.scroll_by(100);
        assert!(ctl.refresh());
        let after = ctl.placement().unwrap();
        assert_eq!(after.top, before.top - 100);
        assert_eq!(ctl.state(), TourState::Active { index: 1 });
        assert!(!ctl.refresh());
    }

    #[test]
    fn refresh_picks_up_a_target_that_appeared() {
        let fx = fixture();
        fx.layout.remove_target("a");
        let mut ctl = controller(&fx, three_steps());
        ctl.start();
        assert!(!ctl.render_state().anchored);
        fx.layout.set_target("a", Rect::new(10, 10, 50, 20));
        assert!(ctl.refresh());
        let render = ctl.render_state();
        assert!(render.anchored);
        assert_eq!(render.highlighted_target.as_deref(), Some("a"));
    }

    #[test]
    fn measured_tooltip_size_reflows_placement() {
        let fx = fixture();
        let mut ctl = controller(&fx, three_steps());
        ctl.start();
        assert!(ctl.set_tooltip_size(Size::new(200, 90)));
        let placement = ctl.placement().unwrap();
        assert_eq!((placement.width, placement.height), (200, 90));
        assert!(!ctl.set_tooltip_size(Size::new(200, 90)));
        assert!(!ctl.set_tooltip_size(Size::new(0, 90)));
    }

    #[test]
    fn shrunk_width_report_does_not_stick_after_viewport_grows() {
        let fx = fixture();
        let mut ctl = controller(&fx, three_steps());
        ctl.start();
        fx.layout.set_viewport(Size::new(300, 600));
        assert!(ctl.refresh());
        let narrow = ctl.placement().unwrap();
        assert_eq!(narrow.width, 268);

        // The overlay renders at the shrunk width and reports it back.
        ctl.set_tooltip_size(Size::new(narrow.width, 180));
        assert_eq!(ctl.placement().unwrap().height, 180);

        fx.layout.set_viewport(Size::new(1280, 800));
        assert!(ctl.refresh());
        let wide = ctl.placement().unwrap();
        assert_eq!(wide.width, TourConfig::default().tooltip_size.width);
        assert_eq!(wide.height, 180);
    }

    #[test]
    fn teardown_clears_highlight_and_ignores_later_commands() {
        let fx = fixture();
        let mut ctl = controller(&fx, three_steps());
        ctl.start();
        ctl.teardown();
        assert!(fx.surface.marked().is_empty());
        assert!(matches!(ctl.next().unwrap(), Transition::Ignored));
        assert!(matches!(ctl.skip(), Transition::Ignored));
        assert!(matches!(ctl.force_start(), Transition::Ignored));
        assert!(!ctl.refresh());
        assert!(!ctl.render_state().is_active);
        assert_eq!(fx.store.is_completed("candidate"), Ok(false));
    }

    #[test]
    fn store_failures_do_not_block_completion() {
        let layout = Rc::new(StaticLayout::new(Size::new(800, 600)));
        let mut ctl = TourController::new(
            TourDefinition::new("t", vec![Step::new("x", "X", "x")]),
            TourConfig::default().with_scroll_into_view(false),
            MemoryFlagStore::failing(),
            Rc::clone(&layout),
            RecordingSurface::new(),
        )
        .unwrap();
        ctl.start();
        assert!(matches!(
            ctl.next().unwrap(),
            Transition::Completed {
                reason: CompletionReason::Finished
            }
        ));
        assert!(layout.revealed().is_empty());
    }

    #[test]
    fn invalid_definition_is_rejected_at_construction() {
        let fx = fixture();
        let err = TourController::new(
            TourDefinition::new("empty", Vec::new()),
            TourConfig::default(),
            Rc::clone(&fx.store),
            Rc::clone(&fx.layout),
            Rc::clone(&fx.surface),
        )
        .unwrap_err();
        assert!(matches!(err, TourError::InvalidDefinition(_)));
    }
}
