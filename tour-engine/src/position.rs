//! Tooltip placement against a target rectangle.
//!
//! # Invariants
//!
//! 1. The returned box never leaves the viewport: `left >= 0`, `top >= 0`,
//!    `left + width <= viewport.width`, `top + height <= viewport.height`.
//! 2. The box keeps `margin` pixels from every viewport edge whenever the
//!    viewport is large enough to allow it; oversize tooltips shrink to fit.
//! 3. `arrow_side` is the opposite of the preferred side even when clamping
//!    moved the box. This is a known approximation: the arrow reflects the
//!    intended placement, not the clamped geometry.
use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size, Side};

/// Where the host should draw the tooltip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TooltipPlacement {
    pub top: i32,
    pub left: i32,
    pub width: i32,
    pub height: i32,
    /// Edge of the tooltip the arrow sits on; `None` for unanchored steps.
    pub arrow_side: Option<Side>,
}

impl TooltipPlacement {
    #[must_use]
    pub const fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height)
    }

    #[must_use]
    pub const fn is_anchored(&self) -> bool {
        self.arrow_side.is_some()
    }
}

/// Stateless placement calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionEngine {
    gap: i32,
}

impl Default for PositionEngine {
    fn default() -> Self {
        Self::new(12)
    }
}

impl PositionEngine {
    #[must_use]
    pub const fn new(gap: i32) -> Self {
        Self { gap }
    }

    #[must_use]
    pub const fn gap(&self) -> i32 {
        self.gap
    }

    /// Place a tooltip of `tooltip` size beside `target`.
    #[must_use]
    pub fn compute(
        &self,
        target: Rect,
        tooltip: Size,
        preferred: Side,
        viewport: Size,
        margin: i32,
    ) -> TooltipPlacement {
        let viewport = sanitize(viewport);
        let margin = margin.max(0);
        let width = fit_length(tooltip.width, viewport.width, margin);
        let height = fit_length(tooltip.height, viewport.height, margin);

        let (left, top) = match preferred {
            Side::Top => (
                target.center_x().saturating_sub(width / 2),
                target.y.saturating_sub(self.gap).saturating_sub(height),
            ),
            Side::Bottom => (
                target.center_x().saturating_sub(width / 2),
                target.bottom().saturating_add(self.gap),
            ),
            Side::Left => (
                target.x.saturating_sub(self.gap).saturating_sub(width),
                target.center_y().saturating_sub(height / 2),
            ),
            Side::Right => (
                target.right().saturating_add(self.gap),
                target.center_y().saturating_sub(height / 2),
            ),
        };

        TooltipPlacement {
            top: clamp_axis(top, height, viewport.height, margin),
            left: clamp_axis(left, width, viewport.width, margin),
            width,
            height,
            arrow_side: Some(preferred.opposite()),
        }
    }

    /// Fallback placement for a step whose target could not be found.
    #[must_use]
    pub fn centered(&self, tooltip: Size, viewport: Size, margin: i32) -> TooltipPlacement {
        let viewport = sanitize(viewport);
        let margin = margin.max(0);
        let width = fit_length(tooltip.width, viewport.width, margin);
        let height = fit_length(tooltip.height, viewport.height, margin);
        TooltipPlacement {
            top: clamp_axis((viewport.height - height) / 2, height, viewport.height, margin),
            left: clamp_axis((viewport.width - width) / 2, width, viewport.width, margin),
            width,
            height,
            arrow_side: None,
        }
    }
}

const fn sanitize(viewport: Size) -> Size {
    Size::new(
        if viewport.width < 0 { 0 } else { viewport.width },
        if viewport.height < 0 { 0 } else { viewport.height },
    )
}

fn fit_length(length: i32, available: i32, margin: i32) -> i32 {
    let room = available.saturating_sub(margin.saturating_mul(2)).max(0);
    length.clamp(0, room.max(0))
}

fn clamp_axis(candidate: i32, length: i32, available: i32, margin: i32) -> i32 {
    let max = available.saturating_sub(length).saturating_sub(margin).max(0);
    let min = margin.min(max);
    candidate.clamp(min, max)
}
