//! Tour presentation configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Size;

/// Errors raised when tour configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TourConfigError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: i32 },
    #[error("tooltip size must be positive (got {width}x{height})")]
    EmptyTooltip { width: i32, height: i32 },
    #[error("invalid tour config JSON: {0}")]
    Json(String),
}

/// Placement and side-effect knobs shared by every step of a tour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TourConfig {
    /// Distance between the target edge and the tooltip.
    #[serde(default = "TourConfig::default_gap")]
    pub gap: i32,
    /// Minimum distance kept between the tooltip and the viewport edges.
    #[serde(default = "TourConfig::default_margin")]
    pub margin: i32,
    /// Intrinsic tooltip size used until the host reports a measured one.
    #[serde(default = "TourConfig::default_tooltip_size")]
    pub tooltip_size: Size,
    /// Scroll each target into view when its step becomes active.
    #[serde(default = "TourConfig::default_scroll_into_view")]
    pub scroll_into_view: bool,
}

impl TourConfig {
    const fn default_gap() -> i32 {
        12
    }

    const fn default_margin() -> i32 {
        16
    }

    const fn default_tooltip_size() -> Size {
        Size::new(320, 180)
    }

    const fn default_scroll_into_view() -> bool {
        true
    }

    /// Parse a configuration document, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result fails validation.
    pub fn from_json(json: &str) -> Result<Self, TourConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|err| TourConfigError::Json(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), TourConfigError> {
        if self.gap < 0 {
            return Err(TourConfigError::Negative {
                field: "gap",
                value: self.gap,
            });
        }
        if self.margin < 0 {
            return Err(TourConfigError::Negative {
                field: "margin",
                value: self.margin,
            });
        }
        if self.tooltip_size.width <= 0 || self.tooltip_size.height <= 0 {
            return Err(TourConfigError::EmptyTooltip {
                width: self.tooltip_size.width,
                height: self.tooltip_size.height,
            });
        }
        Ok(())
    }

    /// Builder-style override for the tooltip size.
    #[must_use]
    pub const fn with_tooltip_size(mut self, size: Size) -> Self {
        self.tooltip_size = size;
        self
    }

    /// Builder-style override for the viewport margin.
    #[must_use]
    pub const fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    /// Disable or enable the scroll-into-view side effect.
    #[must_use]
    pub const fn with_scroll_into_view(mut self, enabled: bool) -> Self {
        self.scroll_into_view = enabled;
        self
    }
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            gap: Self::default_gap(),
            margin: Self::default_margin(),
            tooltip_size: Self::default_tooltip_size(),
            scroll_into_view: Self::default_scroll_into_view(),
        }
    }
}
