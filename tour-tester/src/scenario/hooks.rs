use anyhow::{Context, Result, bail, ensure};
use std::cell::Cell;
use std::rc::Rc;

use tour_engine::{AdvanceHook, HookError, TourDefinition, TourError, TourState, Transition};

use super::ScenarioCtx;

fn hooked(definition: &TourDefinition, hook: AdvanceHook) -> TourDefinition {
    let mut definition = definition.clone();
    if let Some(first) = definition.steps.first_mut() {
        first.on_advance = Some(hook);
    }
    definition
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building hook runtime")
}

pub fn hook_failure(ctx: &ScenarioCtx) -> Result<()> {
    let hook = AdvanceHook::immediate(|| Err(HookError::msg("profile service unavailable")));
    let mut h = ctx.harness_for(hooked(&ctx.definition, hook))?;
    h.controller.start();

    match h.controller.next() {
        Err(TourError::StepCallback { step, source, .. }) => {
            ensure!(step == 0, "failure attributed to step {step}");
            ctx.trace(format!("hook failed as expected: {source}"));
        }
        other => bail!("failing hook returned {other:?}"),
    }
    ensure!(
        h.controller.state() == TourState::Active { index: 0 },
        "failing hook moved the tour to {:?}",
        h.controller.state()
    );
    ensure!(
        h.store.completion_writes() == 0,
        "failing hook persisted completion"
    );
    Ok(())
}

pub fn deferred_advance(ctx: &ScenarioCtx) -> Result<()> {
    let calls = Rc::new(Cell::new(0usize));
    let hook = {
        let calls = Rc::clone(&calls);
        AdvanceHook::deferred(move || {
            calls.set(calls.get() + 1);
            async {
                tokio::task::yield_now().await;
                Ok::<(), HookError>(())
            }
        })
    };
    let definition = hooked(&ctx.definition, hook);
    let mut h = ctx.harness_for(definition.clone())?;
    h.controller.start();

    let Transition::Deferred(pending) = h.controller.next()? else {
        bail!("deferred hook did not defer the advance");
    };
    ensure!(calls.get() == 1, "hook ran {} times", calls.get());
    ensure!(h.controller.render_state().busy, "pending advance not reported as busy");
    ensure!(
        matches!(h.controller.next()?, Transition::Rejected),
        "next accepted while pending"
    );
    ensure!(
        matches!(h.controller.previous(), Transition::Rejected),
        "previous accepted while pending"
    );
    ensure!(
        matches!(h.controller.force_start(), Transition::Rejected),
        "force start accepted while pending"
    );

    let outcome = runtime()?.block_on(pending.future);
    let resolved = h.controller.resolve_advance(pending.ticket, outcome)?;
    ensure!(resolved.changed_state(), "resolved advance returned {resolved:?}");
    ensure!(!h.controller.is_busy(), "still busy after resolving");
    let stale = h.controller.resolve_advance(pending.ticket, Ok(()))?;
    ensure!(
        matches!(stale, Transition::Ignored),
        "stale ticket returned {stale:?}"
    );

    // skip cancels a pending advance
    let mut h = ctx.harness_for(definition)?;
    h.controller.start();
    let Transition::Deferred(pending) = h.controller.next()? else {
        bail!("deferred hook did not defer the advance");
    };
    h.controller.skip();
    let late = h.controller.resolve_advance(pending.ticket, Ok(()))?;
    ensure!(
        matches!(late, Transition::Ignored) && h.controller.state() == TourState::Completed,
        "advance resolved after skip returned {late:?}"
    );
    Ok(())
}
