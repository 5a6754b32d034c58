//! Model listing against the Ollama HTTP API, plus interactive selection.

use std::io::{BufRead, Write};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SetupError};

/// Prefix routing a model through the litellm ollama backend.
pub const MODEL_PREFIX: &str = "ollama/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Response body of `GET /api/tags`.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// One selectable model: display-qualified name plus the raw server name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChoice {
    pub display: String,
    pub raw: String,
}

/// Qualify a raw model name for routing through the ollama backend.
pub fn qualify(name: &str) -> String {
    format!("{MODEL_PREFIX}{name}")
}

/// Validate a user-supplied `--model` value and split off the raw name.
pub fn parse_model_flag(display: &str) -> Result<ModelChoice> {
    match display.strip_prefix(MODEL_PREFIX) {
        Some(raw) => Ok(ModelChoice {
            display: display.to_string(),
            raw: raw.to_string(),
        }),
        None => Err(SetupError::BadModelPrefix(display.to_string())),
    }
}

/// Client for the Ollama HTTP API.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(ip: &str, port: u16) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{ip}:{port}"),
        }
    }

    /// Fetch available models, preserving server-returned order.
    ///
    /// An unreachable server, a malformed body, and an empty list are all
    /// fatal.
    pub async fn list_models(&self) -> Result<Vec<ModelChoice>> {
        let url = format!("{}/api/tags", self.base_url);
        debug!(%url, "fetching model list");

        let tags: TagsResponse = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| SetupError::ModelFetch {
                url: url.clone(),
                source,
            })?
            .json()
            .await
            .map_err(|source| SetupError::ModelFetch { url, source })?;

        let choices: Vec<ModelChoice> = tags
            .models
            .into_iter()
            .map(|m| ModelChoice {
                display: qualify(&m.name),
                raw: m.name,
            })
            .collect();

        if choices.is_empty() {
            return Err(SetupError::NoModels);
        }
        Ok(choices)
    }
}

/// Interactive numeric selection over an explicit input/output pair.
///
/// Enumerates the choices 1-based, then loops until the input yields a number
/// in range; out-of-range and non-numeric entries re-prompt. Returns `None`
/// only when the input stream ends.
pub fn select_model<R: BufRead, W: Write>(
    choices: &[ModelChoice],
    mut input: R,
    mut out: W,
) -> std::io::Result<Option<ModelChoice>> {
    writeln!(out, "\nAvailable models:")?;
    for (i, choice) in choices.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, choice.display)?;
    }

    loop {
        write!(out, "\nSelect a model (enter number): ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=choices.len()).contains(&n) => {
                return Ok(Some(choices[n - 1].clone()));
            }
            Ok(_) => writeln!(out, "Invalid selection. Please try again.")?,
            Err(_) => writeln!(out, "Please enter a valid number.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_choices() -> Vec<ModelChoice> {
        ["llama3.2:latest", "deepseek-coder-v2:latest", "qwen2.5:7b"]
            .iter()
            .map(|name| ModelChoice {
                display: qualify(name),
                raw: (*name).to_string(),
            })
            .collect()
    }

    #[test]
    fn test_qualify_adds_prefix() {
        assert_eq!(qualify("llama3.2:latest"), "ollama/llama3.2:latest");
    }

    #[test]
    fn test_parse_model_flag_splits_raw_name() {
        let choice = parse_model_flag("ollama/llama3.2:latest").unwrap();
        assert_eq!(choice.display, "ollama/llama3.2:latest");
        assert_eq!(choice.raw, "llama3.2:latest");
    }

    #[test]
    fn test_parse_model_flag_rejects_missing_prefix() {
        let result = parse_model_flag("llama3.2:latest");
        assert!(matches!(result, Err(SetupError::BadModelPrefix(_))));
    }

    #[test]
    fn test_tags_response_deserializes() {
        let body = r#"{"models":[{"name":"llama3.2:latest","size":2019393189},{"name":"qwen2.5:7b"}]}"#;
        let tags: TagsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(tags.models.len(), 2);
        assert_eq!(tags.models[0].name, "llama3.2:latest");
    }

    #[test]
    fn test_tags_response_order_preserved() {
        let body = r#"{"models":[{"name":"b"},{"name":"a"},{"name":"c"}]}"#;
        let tags: TagsResponse = serde_json::from_str(body).unwrap();
        let names: Vec<&str> = tags.models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_select_second_of_three() {
        let choices = sample_choices();
        let mut out = Vec::new();
        let selected = select_model(&choices, Cursor::new("2\n"), &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(selected.raw, "deepseek-coder-v2:latest");

        let listing = String::from_utf8(out).unwrap();
        assert!(listing.contains("1. ollama/llama3.2:latest"));
        assert!(listing.contains("3. ollama/qwen2.5:7b"));
    }

    #[test]
    fn test_select_out_of_range_reprompts() {
        let choices = sample_choices();
        let mut out = Vec::new();
        let selected = select_model(&choices, Cursor::new("5\n2\n"), &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(selected.raw, "deepseek-coder-v2:latest");
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Invalid selection. Please try again."));
    }

    #[test]
    fn test_select_non_numeric_reprompts() {
        let choices = sample_choices();
        let mut out = Vec::new();
        let selected = select_model(&choices, Cursor::new("abc\n1\n"), &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(selected.raw, "llama3.2:latest");
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Please enter a valid number."));
    }

    #[test]
    fn test_select_zero_reprompts() {
        let choices = sample_choices();
        let mut out = Vec::new();
        let selected = select_model(&choices, Cursor::new("0\n3\n"), &mut out)
            .unwrap()
            .unwrap();
        assert_eq!(selected.raw, "qwen2.5:7b");
    }

    #[test]
    fn test_select_eof_returns_none() {
        let choices = sample_choices();
        let mut out = Vec::new();
        let selected = select_model(&choices, Cursor::new(""), &mut out).unwrap();
        assert!(selected.is_none());
    }
}
