use crate::errors::{ExtractionError, Result};
use jsonschema::Validator;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// First ```json fenced block, body captured without the fence lines
static JSON_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"```json[ \t]*\r?\n([\s\S]*?)\r?\n[ \t]*```").expect("valid JSON block pattern")
});

/// Structured result extracted from the terminal task's output
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Artifact(Value);

impl Artifact {
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

/// Parses free-form agent output into an [`Artifact`].
///
/// The input is generated text and is treated as untrusted.
#[derive(Default)]
pub struct OutputExtractor {
    schema: Option<Validator>,
}

impl std::fmt::Debug for OutputExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputExtractor")
            .field("schema", &self.schema.is_some())
            .finish()
    }
}

impl OutputExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every extracted artifact against a JSON schema
    pub fn with_schema(mut self, schema: &Value) -> Result<Self> {
        let validator = jsonschema::validator_for(schema)
            .map_err(|e| crate::errors::Error::Config(format!("invalid artifact schema: {}", e)))?;
        self.schema = Some(validator);
        Ok(self)
    }

    /// Loads the artifact schema from a JSON file
    pub fn with_schema_file(self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let schema: Value = serde_json::from_str(&content)?;
        self.with_schema(&schema)
    }

    /// Locates the first fenced JSON block in `raw` and parses it
    pub fn extract(&self, raw: &str) -> std::result::Result<Artifact, ExtractionError> {
        let body = JSON_BLOCK
            .captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or(ExtractionError::NoBlockFound)?;

        debug!("Extracted JSON block of {} bytes", body.len());
        let value: Value = serde_json::from_str(body)?;

        if let Some(validator) = &self.schema {
            let violations: Vec<String> = validator
                .iter_errors(&value)
                .map(|e| format!("{} at '{}'", e, e.instance_path))
                .collect();
            if !violations.is_empty() {
                return Err(ExtractionError::SchemaViolation(violations.join("; ")));
            }
        }

        Ok(Artifact(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_fenced_json() {
        let raw = "Here is the bid request:\n```json\n{\"a\": 1}\n```\nDone.";
        let artifact = OutputExtractor::new().extract(raw).unwrap();
        assert_eq!(artifact.value(), &json!({"a": 1}));
    }

    #[test]
    fn missing_block_is_reported() {
        let err = OutputExtractor::new()
            .extract("{\"a\": 1} but not fenced")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::NoBlockFound));
    }

    #[test]
    fn malformed_block_is_reported() {
        let err = OutputExtractor::new()
            .extract("```json\n{a: }\n```")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::MalformedJson(_)));
    }

    #[test]
    fn only_the_first_block_is_used() {
        let raw = "```json\n{\"first\": true}\n```\n```json\n{\"second\": true}\n```";
        let artifact = OutputExtractor::new().extract(raw).unwrap();
        assert_eq!(artifact.into_value(), json!({"first": true}));
    }

    #[test]
    fn multiline_blocks_with_crlf_are_accepted() {
        let raw = "```json\r\n{\r\n  \"id\": \"req-1\",\r\n  \"imp\": []\r\n}\r\n```";
        let artifact = OutputExtractor::new().extract(raw).unwrap();
        assert_eq!(artifact.value()["id"], "req-1");
    }

    #[test]
    fn schema_violations_are_reported() {
        let schema = json!({
            "type": "object",
            "required": ["id", "imp"],
        });
        let extractor = OutputExtractor::new().with_schema(&schema).unwrap();

        let err = extractor.extract("```json\n{\"id\": \"x\"}\n```").unwrap_err();
        assert!(matches!(err, ExtractionError::SchemaViolation(_)));

        assert!(extractor
            .extract("```json\n{\"id\": \"x\", \"imp\": []}\n```")
            .is_ok());
    }
}
