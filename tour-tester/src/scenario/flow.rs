use anyhow::{Context, Result, ensure};
use std::rc::Rc;

use tour_engine::{
    CompletionReason, FlagStore, MemoryFlagStore, PositionEngine, RecordingSurface, StaticLayout,
    TargetLocator, TourState, Transition, mount,
};

use super::{Harness, ScenarioCtx};

fn advance_to(harness: &mut Harness, index: usize) -> Result<()> {
    for _ in 0..index {
        let moved = harness.controller.next()?;
        ensure!(moved.changed_state(), "next did not move: {moved:?}");
    }
    Ok(())
}

pub fn smoke(ctx: &ScenarioCtx) -> Result<()> {
    let mut h = ctx.harness()?;
    let started = h.controller.start();
    ensure!(
        matches!(started, Transition::Started { index: 0 }),
        "start did not activate the tour: {started:?}"
    );

    for (index, step) in ctx.definition.steps.iter().enumerate() {
        let render = h.controller.render_state();
        ensure!(
            render.is_active && render.current_step_index == index,
            "expected step {index}, render state was {render:?}"
        );
        ensure!(render.tooltip.is_some(), "step {index} has no tooltip");
        if h.layout.locate(&step.target_id).is_some() {
            ensure!(
                render.highlighted_target.as_deref() == Some(step.target_id.as_str()),
                "step {index} highlights {:?} instead of `{}`",
                render.highlighted_target,
                step.target_id
            );
            ensure!(
                h.surface.marked() == vec![step.target_id.clone()],
                "more than one element marked: {:?}",
                h.surface.marked()
            );
        }
        ctx.trace(format!(
            "step {index} `{}` placed at {:?}",
            step.target_id, render.tooltip
        ));
        h.controller.next()?;
    }

    ensure!(
        h.controller.state() == TourState::Completed,
        "tour ended in {:?}",
        h.controller.state()
    );
    ensure!(
        h.store.is_completed(&ctx.definition.id)?,
        "completion flag missing"
    );
    ensure!(
        h.store.completion_writes() == 1,
        "completion flag written {} times",
        h.store.completion_writes()
    );
    ensure!(h.surface.marked().is_empty(), "highlight left behind");
    Ok(())
}

pub fn missing_target(ctx: &ScenarioCtx) -> Result<()> {
    let engine = PositionEngine::new(ctx.config.gap);
    for (index, step) in ctx.definition.steps.iter().enumerate() {
        let mut h = ctx.harness()?;
        h.layout.remove_target(&step.target_id);
        h.controller.start();
        advance_to(&mut h, index)?;

        let render = h.controller.render_state();
        ensure!(render.is_active, "step {index}: tour stopped at a missing target");
        ensure!(!render.anchored, "step {index}: still anchored");
        ensure!(
            render.highlighted_target.is_none() && h.surface.marked().is_empty(),
            "step {index}: missing target still highlighted"
        );
        let expected = engine.centered(
            ctx.config.tooltip_size,
            h.layout.viewport(),
            ctx.config.margin,
        );
        ensure!(
            render.tooltip == Some(expected),
            "step {index}: expected centered {expected:?}, got {:?}",
            render.tooltip
        );

        let after = h.controller.next()?;
        ensure!(
            after.changed_state(),
            "step {index}: next after a missing target did nothing"
        );
        ctx.trace(format!("`{}` missing -> {after:?}", step.target_id));
    }
    Ok(())
}

pub fn skip_anywhere(ctx: &ScenarioCtx) -> Result<()> {
    for index in 0..ctx.step_count() {
        let mut h = ctx.harness()?;
        h.controller.start();
        advance_to(&mut h, index)?;
        let skipped = h.controller.skip();
        ensure!(
            matches!(
                skipped,
                Transition::Completed {
                    reason: CompletionReason::Skipped
                }
            ),
            "skip at step {index} returned {skipped:?}"
        );
        ensure!(
            h.store.is_completed(&ctx.definition.id)?,
            "skip at step {index} did not persist"
        );
        ensure!(
            !h.controller.render_state().is_active && h.surface.marked().is_empty(),
            "skip at step {index} left the overlay up"
        );
    }
    Ok(())
}

pub fn previous_boundary(ctx: &ScenarioCtx) -> Result<()> {
    let mut h = ctx.harness()?;
    h.controller.start();
    let before = h.controller.render_state();
    let first = h.controller.previous();
    ensure!(
        matches!(first, Transition::Ignored),
        "previous on the first step returned {first:?}"
    );
    ensure!(
        h.controller.render_state() == before,
        "previous on the first step changed the render state"
    );

    let last = ctx.step_count().saturating_sub(1);
    advance_to(&mut h, last)?;
    for index in (1..=last).rev() {
        let moved = h.controller.previous();
        ensure!(
            matches!(moved, Transition::Moved { from, to } if from == index && to == index - 1),
            "previous from {index} returned {moved:?}"
        );
    }
    Ok(())
}

pub fn completed_flag(ctx: &ScenarioCtx) -> Result<()> {
    let mut h = ctx.harness()?;
    h.store.mark_completed(&ctx.definition.id)?;

    let started = h.controller.start();
    ensure!(
        matches!(started, Transition::Ignored) && h.controller.state() == TourState::Idle,
        "completed tour started anyway: {started:?}"
    );
    ensure!(h.surface.calls().is_empty(), "completed tour touched the page");

    let forced = h.controller.force_start();
    ensure!(
        matches!(forced, Transition::Started { index: 0 }),
        "force start returned {forced:?}"
    );
    ensure!(
        !h.store.is_completed(&ctx.definition.id)?,
        "force start kept the completion flag"
    );
    Ok(())
}

pub fn replay(ctx: &ScenarioCtx) -> Result<()> {
    let store = Rc::new(MemoryFlagStore::new());
    let mounted = mount(
        ctx.definition.clone(),
        ctx.config.clone(),
        Rc::clone(&store),
        StaticLayout::from_snapshot(ctx.layout.clone()),
        RecordingSurface::new(),
    )
    .context("mounting tour")?;

    {
        let mut controller = mounted.controller.borrow_mut();
        if !ctx.definition.auto_start {
            controller.start();
        }
        ensure!(
            controller.state() == TourState::Active { index: 0 },
            "mounted tour is {:?}",
            controller.state()
        );
        controller.skip();
    }
    ensure!(store.is_completed(&ctx.definition.id)?, "skip not persisted");

    ensure!(mounted.restart.restart(), "replay did not restart the tour");
    ensure!(
        mounted.controller.borrow().state() == TourState::Active { index: 0 },
        "replay did not return to the first step"
    );
    ensure!(
        !store.is_completed(&ctx.definition.id)?,
        "replay kept the completion flag"
    );
    Ok(())
}
