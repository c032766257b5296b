use anyhow::{Result, ensure};

use tour_engine::{Side, Size, TargetLocator, TooltipPlacement, TourDefinition};

use super::ScenarioCtx;

const SCROLL_OFFSETS: [i32; 3] = [0, 240, -240];

fn viewports(base: Size) -> [Size; 4] {
    [base, Size::new(1024, 768), Size::new(375, 667), Size::new(200, 120)]
}

fn with_side(definition: &TourDefinition, side: Side) -> TourDefinition {
    let mut definition = definition.clone();
    for step in &mut definition.steps {
        step.preferred_side = side;
    }
    definition
}

fn check_inside(
    placement: &TooltipPlacement,
    viewport: Size,
    tooltip: Size,
    margin: i32,
) -> Result<()> {
    ensure!(
        placement.left >= 0
            && placement.top >= 0
            && placement.left + placement.width <= viewport.width
            && placement.top + placement.height <= viewport.height,
        "{placement:?} leaves viewport {viewport:?}"
    );
    if viewport.width >= tooltip.width + 2 * margin {
        ensure!(
            placement.left >= margin && placement.left + placement.width <= viewport.width - margin,
            "{placement:?} ignores the horizontal margin in {viewport:?}"
        );
    }
    if viewport.height >= tooltip.height + 2 * margin {
        ensure!(
            placement.top >= margin
                && placement.top + placement.height <= viewport.height - margin,
            "{placement:?} ignores the vertical margin in {viewport:?}"
        );
    }
    Ok(())
}

pub fn clamp_sweep(ctx: &ScenarioCtx) -> Result<()> {
    let tooltip = ctx.config.tooltip_size;
    let margin = ctx.config.margin;
    let mut checked = 0usize;

    for side in Side::ALL {
        let mut h = ctx.harness_for(with_side(&ctx.definition, side))?;
        h.controller.start();
        for viewport in viewports(ctx.layout.viewport) {
            h.layout.set_viewport(viewport);
            for dy in SCROLL_OFFSETS {
                h.layout.scroll_by(dy);
                for index in 0..ctx.step_count() {
                    h.controller.jump_to(index);
                    h.controller.refresh();
                    let render = h.controller.render_state();
                    let Some(placement) = render.tooltip else {
                        anyhow::bail!("step {index} lost its tooltip");
                    };
                    check_inside(&placement, h.layout.viewport(), tooltip, margin).map_err(
                        |err| err.context(format!("side {side}, scroll {dy}, step {index}")),
                    )?;
                    if render.anchored {
                        ensure!(
                            placement.arrow_side == Some(side.opposite()),
                            "step {index}: arrow {:?} for preferred side {side}",
                            placement.arrow_side
                        );
                    }
                    checked += 1;
                }
                h.layout.scroll_by(-dy);
            }
        }
    }
    ctx.trace(format!("{checked} placements inside their viewport"));
    Ok(())
}
