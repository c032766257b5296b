//! Guided Tour Engine
//!
//! Platform-agnostic onboarding walkthrough logic: tooltip placement, the step
//! state machine, completion persistence and single-target highlighting.
//! Hosts supply the storage, element lookup and drawing seams.
#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod definition;
pub mod error;
pub mod geometry;
pub mod highlight;
pub mod locator;
pub mod mount;
pub mod position;
pub mod store;

pub use config::{TourConfig, TourConfigError};
pub use controller::{
    AdvanceTicket, CompletionReason, PendingAdvance, RenderState, StepContent, TourController,
    TourSession, TourState, Transition,
};
pub use definition::{AdvanceHook, DefinitionError, HookError, HookFuture, Step, TourDefinition};
pub use error::TourError;
pub use geometry::{Rect, Side, Size};
pub use highlight::{HighlightSurface, Highlighter, RecordingSurface, SurfaceCall};
pub use locator::{LayoutSnapshot, StaticLayout, TargetLocator};
pub use mount::{Mounted, RestartHandle, SharedController, mount};
pub use position::{PositionEngine, TooltipPlacement};
pub use store::{
    COMPLETED_VALUE, COMPLETION_KEY_PREFIX, FlagStore, FlagStoreError, MemoryFlagStore,
    completion_key,
};
