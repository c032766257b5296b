use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// User-facing strings of the overlay.
///
/// `progress` accepts `{current}` and `{total}` (or `{{current}}`) placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayLabels {
    pub next: String,
    pub finish: String,
    pub back: String,
    pub skip: String,
    pub progress: String,
    pub dialog: String,
    pub step_dot: String,
}

impl Default for OverlayLabels {
    fn default() -> Self {
        Self {
            next: "Next".to_string(),
            finish: "Finish".to_string(),
            back: "Back".to_string(),
            skip: "Skip tour".to_string(),
            progress: "Step {current} of {total}".to_string(),
            dialog: "Product tour".to_string(),
            step_dot: "Go to step {current}".to_string(),
        }
    }
}

impl OverlayLabels {
    /// Parse a (possibly partial) label document; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// "Step 2 of 4" for zero-based `index`.
    #[must_use]
    pub fn progress_text(&self, index: usize, total: usize) -> String {
        let current = (index + 1).to_string();
        let total = total.to_string();
        let args = BTreeMap::from([("current", current.as_str()), ("total", total.as_str())]);
        fill(&self.progress, &args)
    }

    #[must_use]
    pub fn step_dot_text(&self, index: usize) -> String {
        let current = (index + 1).to_string();
        fill(&self.step_dot, &BTreeMap::from([("current", current.as_str())]))
    }
}

fn fill(template: &str, args: &BTreeMap<&str, &str>) -> String {
    let mut text = template.to_string();
    for (k, v) in args {
        text = text.replace(&format!("{{{{{k}}}}}"), v);
        text = text.replace(&format!("{{{k}}}"), v);
    }
    text
}
