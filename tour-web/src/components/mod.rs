pub mod guide;
pub mod labels;
pub mod overlay;
pub mod replay;
pub mod styles;

pub use guide::{TourGuide, TourGuideProps};
pub use labels::OverlayLabels;
pub use overlay::{KeyAction, TourOverlay, TourOverlayProps, key_action};
pub use replay::{ReplayButton, ReplayButtonProps};
pub use styles::overlay_css;
