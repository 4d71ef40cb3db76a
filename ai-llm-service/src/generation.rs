//! Generation request/response model and payload normalization.
//!
//! The hosted API answers either with a sequence of objects carrying
//! `generated_text` or with a single such object. Both shapes normalize to
//! [`GenerationResponse::Success`]; everything else is a
//! [`GenerationResponse::Degraded`] value with a [`DegradedReason`].

use std::{fmt, future::Future, pin::Pin};

use serde::Serialize;
use serde_json::Value;

/// Parameters of a single generation call. Built fresh per call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub do_sample: bool,
}

impl GenerationRequest {
    /// Wire body: `{inputs, parameters: {max_new_tokens, temperature, do_sample, top_p?, return_full_text}}`.
    pub(crate) fn body(&self) -> InferenceBody<'_> {
        InferenceBody {
            inputs: &self.prompt,
            parameters: InferenceParameters {
                max_new_tokens: self.max_tokens,
                temperature: self.temperature,
                do_sample: self.do_sample,
                top_p: self.top_p,
                return_full_text: false,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InferenceBody<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
    do_sample: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    return_full_text: bool,
}

/// Outcome of a generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResponse {
    /// Non-empty, trimmed generated text.
    Success(String),
    /// Any non-success outcome; always convertible to fallback text.
    Degraded(DegradedReason),
}

impl GenerationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Why a generation call did not produce text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedReason {
    /// Upstream answered 503: the model is warming up.
    ModelLoading,
    /// Upstream answered 404.
    NotFound,
    /// Upstream answered 401.
    Unauthorized,
    /// Upstream answered 429.
    RateLimited,
    /// The per-call timeout elapsed.
    Timeout,
    /// The endpoint could not be reached.
    ConnectionFailure,
    /// 200 with a payload lacking non-blank `generated_text`.
    UnexpectedShape,
    /// Any other non-200 status.
    OtherHttpError(u16),
    /// Anything else that went wrong around the call.
    Unexpected(String),
}

impl DegradedReason {
    /// Stable machine-readable code for logs and telemetry.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ModelLoading => "model_loading",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::RateLimited => "rate_limited",
            Self::Timeout => "timeout",
            Self::ConnectionFailure => "connection_failure",
            Self::UnexpectedShape => "unexpected_shape",
            Self::OtherHttpError(_) => "http_error",
            Self::Unexpected(_) => "unexpected_error",
        }
    }

    /// Human-readable degraded message for this reason.
    pub fn user_message(&self) -> String {
        match self {
            Self::ModelLoading => {
                "The AI model is currently loading. Please try again in a moment.".into()
            }
            Self::NotFound => "The AI model is not available. Please try again later.".into(),
            Self::Unauthorized => {
                "Authentication failed. Please check the API configuration.".into()
            }
            Self::RateLimited => "Too many requests. Please wait a moment and try again.".into(),
            Self::Timeout => "The request timed out. Please try again.".into(),
            Self::ConnectionFailure => {
                "Unable to connect to the AI service. Please check your internet connection."
                    .into()
            }
            Self::UnexpectedShape => {
                "I received an unexpected response format. Please try again.".into()
            }
            Self::OtherHttpError(code) => {
                format!("Service temporarily unavailable (Error {code}). Please try again.")
            }
            Self::Unexpected(_) => "An unexpected error occurred. Please try again.".into(),
        }
    }
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OtherHttpError(code) => write!(f, "{} ({code})", self.code()),
            Self::Unexpected(detail) => write!(f, "{}: {detail}", self.code()),
            _ => f.write_str(self.code()),
        }
    }
}

/// Extracts generated text from a decoded payload.
///
/// Order: sequence first (text of its first element), then an object with a
/// `generated_text` field, else [`DegradedReason::UnexpectedShape`]. Blank text
/// is also `UnexpectedShape`.
pub fn normalize_payload(payload: &Value) -> GenerationResponse {
    let text = match payload {
        Value::Array(items) => match items.first() {
            Some(first) => first
                .get("generated_text")
                .and_then(Value::as_str)
                .unwrap_or_default(),
            None => return GenerationResponse::Degraded(DegradedReason::UnexpectedShape),
        },
        Value::Object(map) => match map.get("generated_text").and_then(Value::as_str) {
            Some(t) => t,
            None => return GenerationResponse::Degraded(DegradedReason::UnexpectedShape),
        },
        _ => return GenerationResponse::Degraded(DegradedReason::UnexpectedShape),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        GenerationResponse::Degraded(DegradedReason::UnexpectedShape)
    } else {
        GenerationResponse::Success(trimmed.to_string())
    }
}

/// Maps an upstream status and raw body to a [`GenerationResponse`].
///
/// 200 → [`normalize_payload`]; 503/404/401/429 → their dedicated reasons;
/// any other status → [`DegradedReason::OtherHttpError`].
pub fn classify_response(status: u16, body: &str) -> GenerationResponse {
    let reason = match status {
        200 => {
            return match serde_json::from_str::<Value>(body) {
                Ok(v) => normalize_payload(&v),
                Err(_) => GenerationResponse::Degraded(DegradedReason::UnexpectedShape),
            };
        }
        503 => DegradedReason::ModelLoading,
        404 => DegradedReason::NotFound,
        401 => DegradedReason::Unauthorized,
        429 => DegradedReason::RateLimited,
        other => DegradedReason::OtherHttpError(other),
    };
    GenerationResponse::Degraded(reason)
}

/// Anything that turns a prompt into a [`GenerationResponse`].
///
/// Implemented by [`crate::services::inference_service::InferenceGateway`];
/// pipelines depend on this trait so they can run against scripted generators.
pub trait TextGenerator: Send + Sync {
    /// One generation attempt with the given token budget and timeout.
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        max_tokens: u32,
        timeout_secs: u64,
    ) -> Pin<Box<dyn Future<Output = GenerationResponse> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sequence_payload_takes_first_element() {
        let v = json!([{ "generated_text": "  X  " }, { "generated_text": "Y" }]);
        assert_eq!(normalize_payload(&v), GenerationResponse::Success("X".into()));
    }

    #[test]
    fn object_payload_is_supported() {
        let v = json!({ "generated_text": "hello", "details": {} });
        assert_eq!(
            normalize_payload(&v),
            GenerationResponse::Success("hello".into())
        );
    }

    #[test]
    fn blank_text_is_unexpected_shape() {
        for v in [
            json!({ "generated_text": "  " }),
            json!([{ "generated_text": "\n\t" }]),
            json!([{ "other": "x" }]),
            json!([]),
            json!({ "error": "oops" }),
            json!("plain string"),
            json!({ "generated_text": 42 }),
        ] {
            assert_eq!(
                normalize_payload(&v),
                GenerationResponse::Degraded(DegradedReason::UnexpectedShape),
                "payload {v}"
            );
        }
    }

    #[test]
    fn status_codes_map_exactly() {
        let ok = r#"[{"generated_text":"fine"}]"#;
        assert_eq!(
            classify_response(200, ok),
            GenerationResponse::Success("fine".into())
        );
        let cases = [
            (503, DegradedReason::ModelLoading),
            (404, DegradedReason::NotFound),
            (401, DegradedReason::Unauthorized),
            (429, DegradedReason::RateLimited),
            (500, DegradedReason::OtherHttpError(500)),
            (201, DegradedReason::OtherHttpError(201)),
        ];
        for (status, reason) in cases {
            assert_eq!(
                classify_response(status, ok),
                GenerationResponse::Degraded(reason)
            );
        }
    }

    #[test]
    fn non_json_success_body_is_unexpected_shape() {
        assert_eq!(
            classify_response(200, "<html>"),
            GenerationResponse::Degraded(DegradedReason::UnexpectedShape)
        );
    }

    #[test]
    fn request_body_omits_missing_top_p() {
        let req = GenerationRequest {
            prompt: "Hello".into(),
            max_tokens: 20,
            temperature: 0.7,
            top_p: None,
            do_sample: true,
        };
        let v = serde_json::to_value(req.body()).unwrap();
        assert_eq!(v["inputs"], "Hello");
        assert_eq!(v["parameters"]["max_new_tokens"], 20);
        assert_eq!(v["parameters"]["return_full_text"], false);
        assert!(v["parameters"].get("top_p").is_none());
    }

    #[test]
    fn degraded_messages_are_non_empty() {
        let all = [
            DegradedReason::ModelLoading,
            DegradedReason::NotFound,
            DegradedReason::Unauthorized,
            DegradedReason::RateLimited,
            DegradedReason::Timeout,
            DegradedReason::ConnectionFailure,
            DegradedReason::UnexpectedShape,
            DegradedReason::OtherHttpError(502),
            DegradedReason::Unexpected("boom".into()),
        ];
        for r in all {
            assert!(!r.user_message().is_empty());
        }
        assert!(
            DegradedReason::OtherHttpError(502)
                .user_message()
                .contains("Error 502")
        );
    }
}
