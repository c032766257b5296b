use thiserror::Error;

use crate::config::TourConfigError;
use crate::definition::{DefinitionError, HookError};

/// Errors that cross the engine boundary.
///
/// Target misses, storage failures and invalid commands degrade silently and
/// never show up here.
#[derive(Debug, Error)]
pub enum TourError {
    #[error("advance hook for step {step} (`{target_id}`) failed")]
    StepCallback {
        step: usize,
        target_id: String,
        #[source]
        source: HookError,
    },
    #[error(transparent)]
    InvalidDefinition(#[from] DefinitionError),
    #[error(transparent)]
    InvalidConfig(#[from] TourConfigError),
}
