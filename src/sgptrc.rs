//! The `.sgptrc` reconciler: read, compare, patch in place.
//!
//! Only four keys are managed. Every other line is preserved verbatim and in
//! order, and keys absent from the file are never appended — reconciliation
//! replaces existing lines, it does not grow the file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SetupError};

const DEFAULT_MODEL_KEY: &str = "DEFAULT_MODEL";
const API_BASE_URL_KEY: &str = "API_BASE_URL";
const USE_FUNCTIONS_KEY: &str = "OPENAI_USE_FUNCTIONS";
const USE_LITELLM_KEY: &str = "USE_LITELLM";

/// Desired values for the four managed keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub model: String,
    pub api_base_url: String,
}

impl Settings {
    /// Build from CLI inputs. `model` is the display-qualified name
    /// (`ollama/...`), which is what sgpt's litellm backend expects.
    pub fn new(ip: &str, port: u16, model: &str) -> Self {
        Self {
            model: model.to_string(),
            api_base_url: format!("http://{ip}:{port}"),
        }
    }

    /// The managed key/value pairs. Only these four lines are ever touched.
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            (DEFAULT_MODEL_KEY, self.model.as_str()),
            (API_BASE_URL_KEY, self.api_base_url.as_str()),
            (USE_FUNCTIONS_KEY, "false"),
            (USE_LITELLM_KEY, "true"),
        ]
    }
}

/// Location of the sgpt config under the given home directory.
pub fn sgptrc_path(home: &Path) -> PathBuf {
    home.join(".config").join("shell_gpt").join(".sgptrc")
}

/// Outcome of an [`apply`] run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// At least one managed line was rewritten.
    Updated,
    /// No line carried a managed key; nothing was written.
    NoMatchingKeys,
}

/// Whether all four `KEY=value` strings already appear in the file.
///
/// Deliberately a whole-content substring test rather than a per-line key
/// lookup, kept for compatibility with how existing installs were checked.
/// A missing or unreadable file reads as unsatisfied.
pub fn is_satisfied(path: &Path, settings: &Settings) -> bool {
    let Ok(content) = fs::read_to_string(path) else {
        return false;
    };
    settings
        .pairs()
        .iter()
        .all(|(key, value)| content.contains(&format!("{key}={value}")))
}

/// Rewrite managed lines in place, leaving everything else untouched.
///
/// A line is managed when it starts with `KEY=` for one of the four keys; the
/// whole line is then replaced with the desired `KEY=value`. If no line
/// matches at all, the file is left exactly as it was and the no-op is
/// reported. A missing file is a hard error, distinct from the no-op.
pub fn apply(path: &Path, settings: &Settings) -> Result<ApplyOutcome> {
    if !path.exists() {
        return Err(SetupError::ConfigMissing {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)?;

    let mut modified = false;
    let mut lines: Vec<String> = Vec::with_capacity(content.len() / 16);
    for line in content.split_inclusive('\n') {
        match managed_replacement(line, settings) {
            Some(replacement) => {
                lines.push(replacement);
                modified = true;
            }
            None => lines.push(line.to_string()),
        }
    }

    if !modified {
        debug!(path = %path.display(), "no managed keys present, skipping write");
        return Ok(ApplyOutcome::NoMatchingKeys);
    }

    fs::write(path, lines.concat())?;
    debug!(path = %path.display(), "config rewritten");
    Ok(ApplyOutcome::Updated)
}

/// The replacement line for a managed key, or `None` for an unmanaged line.
fn managed_replacement(line: &str, settings: &Settings) -> Option<String> {
    settings
        .pairs()
        .iter()
        .find(|(key, _)| line.starts_with(&format!("{key}=")))
        .map(|(key, value)| format!("{key}={value}\n"))
}
