//! Escalation to the external reasoning service.
//!
//! The client is stateless: it turns a serialized history and the triggering
//! reasons into one request, makes exactly one attempt, and validates the
//! reply against [`DiagnosisResult`] without any best-effort extraction.

pub mod http;

pub use http::HttpReasoningService;

use crate::config::ReasoningConfig;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

pub const SYSTEM_INSTRUCTION: &str = "You are an expert System Administrator. \
Analyze the tabular metrics history and respond only with JSON matching the declared schema.";

/// Decoding is pinned to be deterministic.
pub const TEMPERATURE: f32 = 0.0;

/// Verdict of the reasoning service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Stable,
    Critical,
}

/// A remedial step suggested by the reasoning service; advisory only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixAction {
    #[serde(alias = "action")]
    pub command: String,
    #[serde(default, alias = "target_pid")]
    pub pid: Option<u32>,
}

impl FixAction {
    /// Human-readable form, e.g. `kill pid 4821`
    pub fn description(&self) -> String {
        match self.pid {
            Some(pid) => format!("{} pid {}", self.command, pid),
            None => self.command.clone(),
        }
    }

    pub fn is_kill(&self) -> bool {
        self.command.trim().eq_ignore_ascii_case("kill")
    }
}

/// Structured verdict returned by [`DiagnosisClient::diagnose`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagnosisResult {
    pub status: Status,
    pub root_cause: String,
    #[serde(default)]
    pub fix_script: Option<FixAction>,
}

/// Everything the reasoning service needs for one escalation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosisRequest {
    pub system_instruction: String,
    pub user_content: String,
    pub response_schema: Value,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("unexpected response envelope: {0}")]
    Envelope(String),
}

/// Opaque request/response capability of the reasoning service
pub trait ReasoningService {
    /// Send one request and return the raw text of the reply.
    ///
    /// Implementations must bound the call with their own timeout.
    fn request(&self, request: &DiagnosisRequest) -> Result<String, ServiceError>;
}

impl<S: ReasoningService + ?Sized> ReasoningService for Box<S> {
    fn request(&self, request: &DiagnosisRequest) -> Result<String, ServiceError> {
        (**self).request(request)
    }
}

#[derive(Error, Debug)]
pub enum UnavailableCause {
    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("empty response from reasoning service")]
    EmptyResponse,
}

#[derive(Error, Debug)]
pub enum DiagnosisError {
    #[error("diagnosis unavailable: {0}")]
    Unavailable(UnavailableCause),

    #[error("malformed diagnosis: {0}")]
    Malformed(String),
}

impl From<ServiceError> for DiagnosisError {
    fn from(e: ServiceError) -> Self {
        Self::Unavailable(UnavailableCause::Service(e))
    }
}

/// JSON schema the reply must satisfy, in the strict form chat-completions
/// endpoints accept (every property required, optional ones nullable).
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "status": {
                "type": "string",
                "enum": ["Stable", "Critical"],
                "description": "System status: 'Critical' or 'Stable'"
            },
            "root_cause": {
                "type": "string",
                "description": "Brief analysis of the issue based on the metrics history"
            },
            "fix_script": {
                "type": ["object", "null"],
                "description": "Fix to apply, e.g. {\"command\": \"kill\", \"pid\": 1234}. Only when Critical.",
                "properties": {
                    "command": { "type": "string" },
                    "pid": { "type": ["integer", "null"] }
                },
                "required": ["command", "pid"],
                "additionalProperties": false
            }
        },
        "required": ["status", "root_cause", "fix_script"],
        "additionalProperties": false
    })
}

/// Strictly decode a reply. Whitespace-only input is "empty", anything else
/// that does not match the schema exactly is malformed.
pub fn parse_response(body: &str) -> Result<DiagnosisResult, DiagnosisError> {
    if body.trim().is_empty() {
        return Err(DiagnosisError::Unavailable(UnavailableCause::EmptyResponse));
    }

    serde_json::from_str(body.trim()).map_err(|e| DiagnosisError::Malformed(e.to_string()))
}

/// Stateless gateway to the reasoning service
pub struct DiagnosisClient<S> {
    service: S,
    max_output_tokens: u32,
}

impl<S: ReasoningService> DiagnosisClient<S> {
    pub fn new(service: S, config: &ReasoningConfig) -> Self {
        Self {
            service,
            max_output_tokens: config.max_output_tokens,
        }
    }

    pub fn build_request(&self, history_text: &str, reasons: &[String]) -> DiagnosisRequest {
        let user_content = format!(
            "Here is the recent system history in tabular form:\n\n{}\n\
             ALERT: {}.\n\
             Identify the process causing the issue in the history and provide a JSON fix to kill it.",
            history_text,
            reasons.join(", ")
        );

        DiagnosisRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            user_content,
            response_schema: response_schema(),
            temperature: TEMPERATURE,
            max_output_tokens: self.max_output_tokens,
        }
    }

    /// Ask for a verdict on the given history. One attempt, no retries.
    pub fn diagnose(
        &self,
        history_text: &str,
        reasons: &[String],
    ) -> Result<DiagnosisResult, DiagnosisError> {
        let request = self.build_request(history_text, reasons);
        log::debug!(
            "Sending {} chars of history to the reasoning service",
            history_text.len()
        );

        let body = self.service.request(&request)?;
        let result = parse_response(&body)?;

        if result.status == Status::Stable && result.fix_script.is_some() {
            log::debug!("Ignoring fix proposed alongside a Stable verdict");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Replays canned replies and records what it was asked.
    struct ScriptedService {
        reply: RefCell<Option<Result<String, ServiceError>>>,
        seen: RefCell<Vec<DiagnosisRequest>>,
    }

    impl ScriptedService {
        fn replying(reply: Result<String, ServiceError>) -> Self {
            Self {
                reply: RefCell::new(Some(reply)),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl ReasoningService for ScriptedService {
        fn request(&self, request: &DiagnosisRequest) -> Result<String, ServiceError> {
            self.seen.borrow_mut().push(request.clone());
            self.reply
                .borrow_mut()
                .take()
                .unwrap_or_else(|| Err(ServiceError::Request("no more replies".to_string())))
        }
    }

    fn client(reply: Result<String, ServiceError>) -> DiagnosisClient<ScriptedService> {
        DiagnosisClient::new(ScriptedService::replying(reply), &ReasoningConfig::default())
    }

    fn reasons() -> Vec<String> {
        vec!["CPU is over 5%".to_string(), "Memory is over 80%".to_string()]
    }

    #[test]
    fn request_carries_history_reasons_and_constraints() {
        let client = client(Ok(String::new()));
        let request = client.build_request("system_history[0]{}:", &reasons());

        assert_eq!(request.system_instruction, SYSTEM_INSTRUCTION);
        assert!(request.user_content.contains("system_history[0]{}:"));
        assert!(request
            .user_content
            .contains("ALERT: CPU is over 5%, Memory is over 80%."));
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_output_tokens, 500);
        assert_eq!(request.response_schema["required"][0], "status");
    }

    #[test]
    fn parses_critical_with_fix() {
        let client = client(Ok(
            r#"{"status":"Critical","root_cause":"runaway process","fix_script":{"command":"kill","pid":4821}}"#
                .to_string(),
        ));
        let result = client.diagnose("history", &reasons()).unwrap();
        assert_eq!(result.status, Status::Critical);
        assert_eq!(result.root_cause, "runaway process");
        assert_eq!(
            result.fix_script,
            Some(FixAction {
                command: "kill".to_string(),
                pid: Some(4821)
            })
        );
        assert_eq!(client.service.seen.borrow().len(), 1);
    }

    #[test]
    fn accepts_alternate_fix_field_names() {
        let result = parse_response(
            r#"{"status":"Critical","root_cause":"leak","fix_script":{"action":"kill","target_pid":12}}"#,
        )
        .unwrap();
        assert_eq!(result.fix_script.map(|f| f.description()), Some("kill pid 12".to_string()));
    }

    #[test]
    fn null_fix_is_absent() {
        let result =
            parse_response(r#"{"status":"Stable","root_cause":"idle","fix_script":null}"#).unwrap();
        assert_eq!(result.status, Status::Stable);
        assert!(result.fix_script.is_none());
    }

    #[test]
    fn empty_body_is_unavailable() {
        let client = client(Ok("   \n".to_string()));
        let err = client.diagnose("history", &reasons()).unwrap_err();
        assert!(matches!(
            err,
            DiagnosisError::Unavailable(UnavailableCause::EmptyResponse)
        ));
    }

    #[test]
    fn transport_failure_is_unavailable() {
        let client = client(Err(ServiceError::Timeout(Duration::from_secs(30))));
        let err = client.diagnose("history", &reasons()).unwrap_err();
        assert!(matches!(
            err,
            DiagnosisError::Unavailable(UnavailableCause::Service(ServiceError::Timeout(_)))
        ));
    }

    #[test]
    fn shape_mismatches_are_malformed() {
        let cases = [
            r#"{"status":"Warning","root_cause":"x"}"#,
            r#"{"status":"Critical"}"#,
            r#"{"status":"Critical","root_cause":42}"#,
            r#"{"status":"Critical","root_cause":"x","confidence":0.9}"#,
            r#"{"status":"Critical","root_cause":"x","fix_script":{"command":"kill","pid":-1}}"#,
            r#"Sure! {"status":"Critical","root_cause":"x"}"#,
            r#"{"status":"Critical","root_cause":"x"} hope this helps"#,
            "```json\n{\"status\":\"Stable\",\"root_cause\":\"x\"}\n```",
        ];
        for body in cases {
            assert!(
                matches!(parse_response(body), Err(DiagnosisError::Malformed(_))),
                "accepted {}",
                body
            );
        }
    }

    #[test]
    fn description_without_pid() {
        let fix = FixAction {
            command: "restart nginx".to_string(),
            pid: None,
        };
        assert_eq!(fix.description(), "restart nginx");
        assert!(!fix.is_kill());
    }
}
