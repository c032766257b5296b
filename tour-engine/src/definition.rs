//! Tour definitions: the ordered steps a walkthrough visits.
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Side;

/// Failure raised by a step's `on_advance` hook.
///
/// Wraps an [`anyhow::Error`] so hook authors can use `?` and `anyhow::bail!`.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct HookError(#[from] anyhow::Error);

impl HookError {
    pub fn msg<M>(message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self(anyhow::Error::msg(message))
    }

    #[must_use]
    pub const fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

/// Future returned by a deferred hook.
pub type HookFuture = Pin<Box<dyn Future<Output = Result<(), HookError>>>>;

/// Side effect run before leaving a step via `next()`.
#[derive(Clone)]
pub enum AdvanceHook {
    /// Runs inline; an error aborts the transition.
    Immediate(Rc<dyn Fn() -> Result<(), HookError>>),
    /// Produces a future the host drives; the controller stays busy until resolved.
    Deferred(Rc<dyn Fn() -> HookFuture>),
}

impl AdvanceHook {
    pub fn immediate<F>(hook: F) -> Self
    where
        F: Fn() -> Result<(), HookError> + 'static,
    {
        Self::Immediate(Rc::new(hook))
    }

    pub fn deferred<F, Fut>(hook: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<(), HookError>> + 'static,
    {
        Self::Deferred(Rc::new(move || Box::pin(hook())))
    }

    #[must_use]
    pub const fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

impl fmt::Debug for AdvanceHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(_) => f.write_str("AdvanceHook::Immediate"),
            Self::Deferred(_) => f.write_str("AdvanceHook::Deferred"),
        }
    }
}

impl PartialEq for AdvanceHook {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Immediate(a), Self::Immediate(b)) => Rc::ptr_eq(a, b),
            (Self::Deferred(a), Self::Deferred(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// One stop in a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub target_id: String,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub preferred_side: Side,
    #[serde(skip)]
    pub on_advance: Option<AdvanceHook>,
}

impl Step {
    pub fn new(
        target_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            target_id: target_id.into(),
            title: title.into(),
            body: body.into(),
            preferred_side: Side::default(),
            on_advance: None,
        }
    }

    #[must_use]
    pub const fn side(mut self, side: Side) -> Self {
        self.preferred_side = side;
        self
    }

    #[must_use]
    pub fn on_advance(mut self, hook: AdvanceHook) -> Self {
        self.on_advance = Some(hook);
        self
    }
}

/// Errors raised when a tour definition cannot be used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("tour id must not be empty")]
    EmptyId,
    #[error("tour `{tour_id}` has no steps")]
    NoSteps { tour_id: String },
    #[error("step {step} of tour `{tour_id}` has an empty target id")]
    EmptyTarget { tour_id: String, step: usize },
    #[error("invalid tour definition JSON: {0}")]
    Json(String),
}

/// An ordered walkthrough, immutable once a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourDefinition {
    pub id: String,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub auto_start: bool,
}

impl TourDefinition {
    pub fn new(id: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            id: id.into(),
            steps,
            auto_start: false,
        }
    }

    #[must_use]
    pub const fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    /// Parse and validate a definition. Hooks are never part of the document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the definition is invalid.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        let definition: Self =
            serde_json::from_str(json).map_err(|err| DefinitionError::Json(err.to_string()))?;
        definition.validate()?;
        Ok(definition)
    }

    /// # Errors
    ///
    /// Returns the first structural problem found.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.id.trim().is_empty() {
            return Err(DefinitionError::EmptyId);
        }
        if self.steps.is_empty() {
            return Err(DefinitionError::NoSteps {
                tour_id: self.id.clone(),
            });
        }
        if let Some(step) = self
            .steps
            .iter()
            .position(|step| step.target_id.trim().is_empty())
        {
            return Err(DefinitionError::EmptyTarget {
                tour_id: self.id.clone(),
                step,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn step(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_definition_defaults_side_and_auto_start() {
        let json = r#"{
            "id": "candidate-dashboard",
            "steps": [
                { "target_id": "profile-card", "title": "Profile", "body": "Keep it fresh." },
                { "target_id": "job-feed", "title": "Jobs", "body": "New matches.", "preferred_side": "right" }
            ]
        }"#;
        let def = TourDefinition::from_json(json).unwrap();
        assert!(!def.auto_start);
        assert_eq!(def.step_count(), 2);
        assert_eq!(def.steps[0].preferred_side, Side::Bottom);
        assert_eq!(def.steps[1].preferred_side, Side::Right);
        assert!(def.steps[1].on_advance.is_none());
    }

    #[test]
    fn validation_rejects_structural_problems() {
        assert_eq!(
            TourDefinition::new(" ", vec![Step::new("a", "t", "b")]).validate(),
            Err(DefinitionError::EmptyId)
        );
        assert_eq!(
            TourDefinition::new("t", Vec::new()).validate(),
            Err(DefinitionError::NoSteps {
                tour_id: "t".into()
            })
        );
        assert_eq!(
            TourDefinition::new("t", vec![Step::new("a", "", ""), Step::new("", "", "")])
                .validate(),
            Err(DefinitionError::EmptyTarget {
                tour_id: "t".into(),
                step: 1
            })
        );
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let err = TourDefinition::from_json("{ not json").unwrap_err();
        assert!(matches!(err, DefinitionError::Json(_)));
    }

    #[test]
    fn hooks_compare_by_identity() {
        let hook = AdvanceHook::immediate(|| Ok(()));
        let same = hook.clone();
        let other = AdvanceHook::immediate(|| Ok(()));
        assert_eq!(hook, same);
        assert_ne!(hook, other);
        assert!(!hook.is_deferred());
        assert!(AdvanceHook::deferred(|| async { Ok(()) }).is_deferred());
    }

    #[test]
    fn hook_error_wraps_anyhow() {
        let err = HookError::from(anyhow::anyhow!("profile save failed"));
        assert_eq!(err.to_string(), "profile save failed");
        assert_eq!(HookError::msg("nope").inner().to_string(), "nope");
    }
}
