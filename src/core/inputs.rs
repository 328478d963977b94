//! Invocation configuration resolution.
//!
//! The core never reads the process environment itself: the CLI layer hands
//! in a plain key/value snapshot, keyed by the logical input names below.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Logical input names, matching the upstream automation step's convention.
pub const CONCOURSE_URL: &str = "concourse-url";
pub const CONCOURSE_TEAM: &str = "concourse-team";
pub const CONCOURSE_PIPELINE: &str = "concourse-pipeline";
pub const PIPELINE_RESOURCE: &str = "pipeline-resource";
pub const RESOURCE_WEBHOOK_TOKEN: &str = "resource-webhook-token";
pub const PIPELINE_VARIABLES: &str = "pipeline-variables";

/// Required inputs in the order they are validated.
pub const REQUIRED_INPUTS: [&str; 5] = [
    CONCOURSE_URL,
    CONCOURSE_TEAM,
    CONCOURSE_PIPELINE,
    PIPELINE_RESOURCE,
    RESOURCE_WEBHOOK_TOKEN,
];

/// Resolved configuration for a single webhook invocation.
///
/// Constructed once per run and never mutated. The token is a secret: it must
/// not appear in any URL surfaced for display (see [`crate::webhook`]).
#[derive(Debug, Clone)]
pub struct TriggerInputs {
    pub concourse_url: String,
    pub team: String,
    pub pipeline: String,
    pub resource: String,
    pub webhook_token: String,
    pub pipeline_variables: Map<String, Value>,
}

/// Resolves the invocation configuration from an injected key/value snapshot.
///
/// Required inputs are checked in declaration order and the first absent or
/// blank one fails the whole resolution. `pipeline-variables` is only parsed
/// once every required input is present.
pub fn resolve(values: &HashMap<String, String>) -> Result<TriggerInputs> {
    let concourse_url = require(values, CONCOURSE_URL)?;
    let team = require(values, CONCOURSE_TEAM)?;
    let pipeline = require(values, CONCOURSE_PIPELINE)?;
    let resource = require(values, PIPELINE_RESOURCE)?;
    let webhook_token = require(values, RESOURCE_WEBHOOK_TOKEN)?;
    let pipeline_variables =
        parse_pipeline_variables(values.get(PIPELINE_VARIABLES).map(String::as_str))?;

    Ok(TriggerInputs {
        concourse_url,
        team,
        pipeline,
        resource,
        webhook_token,
        pipeline_variables,
    })
}

fn require(values: &HashMap<String, String>, name: &str) -> Result<String> {
    match values.get(name) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(Error::input_missing_required(name)),
    }
}

/// Parses the optional pipeline variables input. Absent or blank text is
/// treated as `{}`; anything else must be a JSON object.
fn parse_pipeline_variables(raw: Option<&str>) -> Result<Map<String, Value>> {
    let raw = match raw {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Ok(Map::new()),
    };

    let parsed: Value = serde_json::from_str(raw)
        .map_err(|e| Error::input_invalid_pipeline_variables(e.to_string()))?;

    match parsed {
        Value::Object(map) => Ok(map),
        other => Err(Error::input_invalid_pipeline_variables(format!(
            "expected a JSON object, got {}",
            json_type_name(&other)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn full_values() -> HashMap<String, String> {
        [
            (CONCOURSE_URL, "https://ci.example.com"),
            (CONCOURSE_TEAM, "main"),
            (CONCOURSE_PIPELINE, "deploy"),
            (PIPELINE_RESOURCE, "repo"),
            (RESOURCE_WEBHOOK_TOKEN, "secret123"),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
    }

    #[test]
    fn resolve_succeeds_with_required_inputs_only() {
        let inputs = resolve(&full_values()).unwrap();
        assert_eq!(inputs.concourse_url, "https://ci.example.com");
        assert_eq!(inputs.team, "main");
        assert_eq!(inputs.pipeline, "deploy");
        assert_eq!(inputs.resource, "repo");
        assert_eq!(inputs.webhook_token, "secret123");
        assert!(inputs.pipeline_variables.is_empty());
    }

    #[test]
    fn resolve_reports_each_missing_input_by_name() {
        for name in REQUIRED_INPUTS {
            let mut values = full_values();
            values.remove(name);
            let err = resolve(&values).unwrap_err();
            assert_eq!(err.code, ErrorCode::InputMissingRequired);
            assert_eq!(err.details["name"], name);
        }
    }

    #[test]
    fn resolve_treats_blank_input_as_missing() {
        let mut values = full_values();
        values.insert(CONCOURSE_TEAM.to_string(), "   ".to_string());
        let err = resolve(&values).unwrap_err();
        assert_eq!(err.code, ErrorCode::InputMissingRequired);
        assert_eq!(err.details["name"], CONCOURSE_TEAM);
    }

    #[test]
    fn resolve_checks_missing_inputs_in_declaration_order() {
        let err = resolve(&HashMap::new()).unwrap_err();
        assert_eq!(err.details["name"], CONCOURSE_URL);
    }

    #[test]
    fn resolve_trims_surrounding_whitespace() {
        let mut values = full_values();
        values.insert(CONCOURSE_TEAM.to_string(), "  main  ".to_string());
        let inputs = resolve(&values).unwrap();
        assert_eq!(inputs.team, "main");
    }

    #[test]
    fn pipeline_variables_default_to_empty() {
        let inputs = resolve(&full_values()).unwrap();
        assert!(inputs.pipeline_variables.is_empty());

        let mut values = full_values();
        values.insert(PIPELINE_VARIABLES.to_string(), "".to_string());
        let inputs = resolve(&values).unwrap();
        assert!(inputs.pipeline_variables.is_empty());
    }

    #[test]
    fn pipeline_variables_parse_as_object() {
        let mut values = full_values();
        values.insert(
            PIPELINE_VARIABLES.to_string(),
            r#"{"branch":"main","build":7}"#.to_string(),
        );
        let inputs = resolve(&values).unwrap();
        assert_eq!(inputs.pipeline_variables["branch"], "main");
        assert_eq!(inputs.pipeline_variables["build"], 7);
    }

    #[test]
    fn pipeline_variables_reject_malformed_json() {
        let mut values = full_values();
        values.insert(PIPELINE_VARIABLES.to_string(), "{not json".to_string());
        let err = resolve(&values).unwrap_err();
        assert_eq!(err.code, ErrorCode::InputInvalidPipelineVariables);
    }

    #[test]
    fn pipeline_variables_reject_non_object_json() {
        for raw in [r#""branch""#, "3", "true", "null", r#"["a","b"]"#] {
            let mut values = full_values();
            values.insert(PIPELINE_VARIABLES.to_string(), raw.to_string());
            let err = resolve(&values).unwrap_err();
            assert_eq!(err.code, ErrorCode::InputInvalidPipelineVariables, "{}", raw);
        }
    }
}
