use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Read `path` when given, otherwise fall back to the bundled document.
pub fn read_or_bundled(path: Option<&Path>, bundled: &'static str) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => Ok(bundled.to_string()),
    }
}
