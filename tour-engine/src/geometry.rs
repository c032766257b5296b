//! Viewport geometry primitives.
//!
//! All values are whole pixels in viewport coordinates (not page coordinates),
//! so a rectangle scrolled above the fold has a negative `y`.
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Horizontal centre, floored.
    #[must_use]
    pub const fn center_x(&self) -> i32 {
        self.x.saturating_add(self.width / 2)
    }

    /// Vertical centre, floored.
    #[must_use]
    pub const fn center_y(&self) -> i32 {
        self.y.saturating_add(self.height / 2)
    }

    /// Whether any part of the rectangle overlaps a viewport of the given size.
    #[must_use]
    pub const fn intersects_viewport(&self, viewport: Size) -> bool {
        self.right() > 0 && self.bottom() > 0 && self.x < viewport.width && self.y < viewport.height
    }
}

/// Width and height in viewport pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Side of the target a tooltip prefers to sit on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_sides_pair_up() {
        for side in Side::ALL {
            assert_eq!(side.opposite().opposite(), side);
            assert_ne!(side.opposite(), side);
        }
    }

    #[test]
    fn side_serializes_lowercase() {
        let json = serde_json::to_string(&Side::Right).unwrap();
        assert_eq!(json, "\"right\"");
        let parsed: Side = serde_json::from_str("\"top\"").unwrap();
        assert_eq!(parsed, Side::Top);
    }

    #[test]
    fn rect_edges_and_centres() {
        let rect = Rect::new(750, 10, 40, 20);
        assert_eq!(rect.right(), 790);
        assert_eq!(rect.bottom(), 30);
        assert_eq!(rect.center_x(), 770);
        assert_eq!(rect.center_y(), 20);
    }

    #[test]
    fn viewport_intersection_detects_offscreen_targets() {
        let viewport = Size::new(800, 600);
        assert!(Rect::new(790, 590, 40, 40).intersects_viewport(viewport));
        assert!(!Rect::new(0, -50, 40, 50).intersects_viewport(viewport));
        assert!(!Rect::new(800, 10, 40, 20).intersects_viewport(viewport));
    }
}
