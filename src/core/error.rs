use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InputMissingRequired,
    InputInvalidUrl,
    InputInvalidPipelineVariables,

    WebhookDeliveryFailed,
    WebhookRejected,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InputMissingRequired => "input.missing_required",
            ErrorCode::InputInvalidUrl => "input.invalid_url",
            ErrorCode::InputInvalidPipelineVariables => "input.invalid_pipeline_variables",

            ErrorCode::WebhookDeliveryFailed => "webhook.delivery_failed",
            ErrorCode::WebhookRejected => "webhook.rejected",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingInputDetails {
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidUrlDetails {
    pub value: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidVariablesDetails {
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }

    pub fn input_missing_required(name: impl Into<String>) -> Self {
        let name = name.into();
        let details = serde_json::to_value(MissingInputDetails { name: name.clone() })
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(
            ErrorCode::InputMissingRequired,
            format!("Input required and not supplied: {}", name),
            details,
        )
    }

    pub fn input_invalid_url(value: impl Into<String>, problem: impl Into<String>) -> Self {
        let details = serde_json::to_value(InvalidUrlDetails {
            value: value.into(),
            problem: problem.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(
            ErrorCode::InputInvalidUrl,
            "Input concourse-url must be an absolute URL",
            details,
        )
    }

    pub fn input_invalid_pipeline_variables(problem: impl Into<String>) -> Self {
        let details = serde_json::to_value(InvalidVariablesDetails {
            problem: problem.into(),
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(
            ErrorCode::InputInvalidPipelineVariables,
            "Input pipeline-variables must be a JSON object",
            details,
        )
    }

    pub fn internal_io(error: String, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalIoErrorDetails {
            error: error.clone(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(ErrorCode::InternalIoError, error, details)
    }

    pub fn internal_json(error: String, context: Option<String>) -> Self {
        let details = serde_json::to_value(InternalJsonErrorDetails {
            error: error.clone(),
            context,
        })
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        Self::new(ErrorCode::InternalJsonError, error, details)
    }
}
