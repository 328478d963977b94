use std::collections::HashMap;

use clap::Args;

use checkhook::inputs::{self, TriggerInputs};
use checkhook::{Error, ErrorCode};

pub mod trigger;
pub mod url;

pub type CmdResult<T> = checkhook::Result<(T, i32)>;

/// Environment variable backing each logical input.
const ENV_BINDINGS: [(&str, &str); 6] = [
    (inputs::CONCOURSE_URL, "CONCOURSE_URL"),
    (inputs::CONCOURSE_TEAM, "CONCOURSE_TEAM"),
    (inputs::CONCOURSE_PIPELINE, "CONCOURSE_PIPELINE"),
    (inputs::PIPELINE_RESOURCE, "PIPELINE_RESOURCE"),
    (inputs::RESOURCE_WEBHOOK_TOKEN, "RESOURCE_WEBHOOK_TOKEN"),
    (inputs::PIPELINE_VARIABLES, "PIPELINE_VARIABLES"),
];

/// Pipeline coordinates shared by every subcommand.
///
/// Each flag falls back to its environment variable when omitted.
#[derive(Args, Debug, Default)]
pub struct InputOverrides {
    /// Concourse server base URL (env: CONCOURSE_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Concourse team name (env: CONCOURSE_TEAM)
    #[arg(long)]
    pub team: Option<String>,

    /// Pipeline name (env: CONCOURSE_PIPELINE)
    #[arg(long)]
    pub pipeline: Option<String>,

    /// Resource name within the pipeline (env: PIPELINE_RESOURCE)
    #[arg(long)]
    pub resource: Option<String>,

    /// Webhook token configured on the resource (env: RESOURCE_WEBHOOK_TOKEN)
    #[arg(long)]
    pub webhook_token: Option<String>,

    /// Pipeline variables as a JSON object, forwarded as query parameters
    /// (env: PIPELINE_VARIABLES)
    #[arg(long)]
    pub vars: Option<String>,
}

impl InputOverrides {
    fn apply(&self, values: &mut HashMap<String, String>) {
        let overrides = [
            (inputs::CONCOURSE_URL, &self.url),
            (inputs::CONCOURSE_TEAM, &self.team),
            (inputs::CONCOURSE_PIPELINE, &self.pipeline),
            (inputs::PIPELINE_RESOURCE, &self.resource),
            (inputs::RESOURCE_WEBHOOK_TOKEN, &self.webhook_token),
            (inputs::PIPELINE_VARIABLES, &self.vars),
        ];

        for (name, value) in overrides {
            if let Some(value) = value {
                values.insert(name.to_string(), value.clone());
            }
        }
    }
}

/// Snapshot of the input environment variables, taken once per invocation.
fn env_input_values() -> HashMap<String, String> {
    let mut values = HashMap::new();
    for (name, env_var) in ENV_BINDINGS {
        if let Ok(value) = std::env::var(env_var) {
            values.insert(name.to_string(), value);
        }
    }
    values
}

/// Resolves the trigger configuration from the environment snapshot plus CLI
/// flag overrides.
pub(crate) fn resolve_inputs(overrides: &InputOverrides) -> checkhook::Result<TriggerInputs> {
    let mut values = env_input_values();
    overrides.apply(&mut values);
    inputs::resolve(&values).map_err(hint_missing_input)
}

/// Points a missing-input failure at the flag and environment variable that
/// can supply it.
fn hint_missing_input(err: Error) -> Error {
    if err.code != ErrorCode::InputMissingRequired {
        return err;
    }

    let name = match err.details.get("name").and_then(serde_json::Value::as_str) {
        Some(name) => name.to_string(),
        None => return err,
    };

    match (flag_for_input(&name), env_var_for_input(&name)) {
        (Some(flag), Some(env_var)) => err.with_hint(format!(
            "Pass {} or set the {} environment variable",
            flag, env_var
        )),
        _ => err,
    }
}

fn flag_for_input(name: &str) -> Option<&'static str> {
    match name {
        inputs::CONCOURSE_URL => Some("--url"),
        inputs::CONCOURSE_TEAM => Some("--team"),
        inputs::CONCOURSE_PIPELINE => Some("--pipeline"),
        inputs::PIPELINE_RESOURCE => Some("--resource"),
        inputs::RESOURCE_WEBHOOK_TOKEN => Some("--webhook-token"),
        inputs::PIPELINE_VARIABLES => Some("--vars"),
        _ => None,
    }
}

fn env_var_for_input(name: &str) -> Option<&'static str> {
    ENV_BINDINGS
        .iter()
        .find(|(input, _)| *input == name)
        .map(|(_, env_var)| *env_var)
}

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args))
    };
}

pub(crate) fn run_json(command: crate::Commands) -> (checkhook::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Trigger(args) => dispatch!(args, trigger),
        crate::Commands::Url(args) => dispatch!(args, url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_snapshot_values() {
        let mut values = HashMap::new();
        values.insert(inputs::CONCOURSE_TEAM.to_string(), "from-env".to_string());

        let overrides = InputOverrides {
            team: Some("from-flag".to_string()),
            ..Default::default()
        };
        overrides.apply(&mut values);

        assert_eq!(values[inputs::CONCOURSE_TEAM], "from-flag");
    }

    #[test]
    fn unset_overrides_leave_snapshot_untouched() {
        let mut values = HashMap::new();
        values.insert(inputs::CONCOURSE_TEAM.to_string(), "from-env".to_string());

        InputOverrides::default().apply(&mut values);

        assert_eq!(values[inputs::CONCOURSE_TEAM], "from-env");
    }

    #[test]
    fn missing_input_hint_names_flag_and_env_var() {
        let err = hint_missing_input(Error::input_missing_required(inputs::CONCOURSE_URL));
        assert_eq!(err.hints.len(), 1);
        assert!(err.hints[0].message.contains("--url"));
        assert!(err.hints[0].message.contains("CONCOURSE_URL"));
    }

    #[test]
    fn other_errors_pass_through_without_hints() {
        let err = hint_missing_input(Error::input_invalid_pipeline_variables("bad"));
        assert!(err.hints.is_empty());
    }
}
