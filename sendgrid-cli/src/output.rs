// sendgrid-cli/src/output.rs
use sendgrid_client::{HttpError, SendGridError};
use serde::Serialize;
use std::fmt;

/// Standard JSON response envelope
#[derive(Debug, Serialize)]
pub struct Response<T> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<Meta>,
}

impl<T> Response<T> {
    pub fn ok(result: T) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
            meta: None,
        }
    }

    pub fn ok_with_meta(result: T, meta: Meta) -> Self {
        Self {
            ok: true,
            result: Some(result),
            error: None,
            meta: Some(meta),
        }
    }

    pub fn error(error: ErrorResponse) -> Response<()> {
        Response::<()> {
            ok: false,
            result: None,
            error: Some(error),
            meta: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    type_: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retryable: Option<bool>,
}

impl ErrorResponse {
    fn new(type_: &'static str, message: String, retryable: bool) -> Self {
        Self {
            type_,
            message,
            status: None,
            retryable: Some(retryable),
        }
    }

    pub fn safety_rejected(message: String) -> Self {
        Self::new("safety_rejected", message, false)
    }

    pub fn not_found(message: String) -> Self {
        Self::new("not_found", message, false)
    }

    pub fn validation_failed(message: String) -> Self {
        Self::new("validation_failed", message, false)
    }

    pub fn rate_limited(message: String) -> Self {
        Self::new("rate_limited", message, true)
    }

    pub fn internal(message: String) -> Self {
        Self::new("internal_error", message, false)
    }

    /// Classify an API failure and pick the matching exit code
    pub fn from_api_error(err: &SendGridError, message: String) -> (Self, ExitCode) {
        let (mut resp, code) = match err {
            SendGridError::Http(HttpError {
                status: Some(404), ..
            }) => (Self::not_found(message), ExitCode::PermanentError),
            SendGridError::Http(HttpError {
                status: Some(429), ..
            }) => (Self::rate_limited(message), ExitCode::TransientError),
            SendGridError::Http(e) if e.is_transient() => (
                Self::new("transient_error", message, true),
                ExitCode::TransientError,
            ),
            SendGridError::Http(_) => (
                Self::new("api_error", message, false),
                ExitCode::PermanentError,
            ),
            SendGridError::Rejected(_) => (
                Self::validation_failed(message),
                ExitCode::PermanentError,
            ),
            SendGridError::Json(_) | SendGridError::UnexpectedResponse(_) => {
                (Self::new("unexpected_response", message, false), ExitCode::PermanentError)
            }
        };
        resp.status = err.status();
        (resp, code)
    }
}

#[derive(Debug, Serialize)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_behalf_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Exit codes for agent decision making
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    TransientError = 1,
    PermanentError = 2,
    SafetyRejected = 3,
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::TransientError => write!(f, "transient_error"),
            Self::PermanentError => write!(f, "permanent_error"),
            Self::SafetyRejected => write!(f, "safety_rejected"),
        }
    }
}

impl ExitCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

// Print response to stdout
pub fn print_response<T: Serialize>(resp: &Response<T>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(resp)?);
    Ok(())
}

/// Print a list result with its count in `meta`
pub fn print_list<T: Serialize>(items: Vec<T>, on_behalf_of: Option<&str>) -> anyhow::Result<()> {
    let meta = Meta {
        on_behalf_of: on_behalf_of.map(String::from),
        count: Some(items.len()),
    };
    print_response(&Response::ok_with_meta(items, meta))
}

/// Print a styled success message
pub fn print_success(message: &str) {
    let term = console::Term::stderr();
    let _ = term.write_str(&format!("{} {}\n", console::style("✓").green(), message));
}

/// Print a styled error message
pub fn print_error(message: &str) {
    let term = console::Term::stderr();
    let _ = term.write_str(&format!("{} {}\n", console::style("Error:").red(), message));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_envelope() {
        let resp = Response::ok(json!({"id": 1}));
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"ok": true, "result": {"id": 1}})
        );
    }

    #[test]
    fn test_error_envelope() {
        let resp = Response::<()>::error(ErrorResponse::safety_rejected("use --force".to_string()));
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({
                "ok": false,
                "error": {"type": "safety_rejected", "message": "use --force", "retryable": false}
            })
        );
    }

    #[test]
    fn test_api_error_classification() {
        let not_found = SendGridError::Http(HttpError::status(404, "missing"));
        let (resp, code) = ErrorResponse::from_api_error(&not_found, "missing".to_string());
        assert_eq!(resp.type_, "not_found");
        assert_eq!(resp.status, Some(404));
        assert_eq!(code, ExitCode::PermanentError);

        let limited = SendGridError::Http(HttpError::status(429, "slow down"));
        let (resp, code) = ErrorResponse::from_api_error(&limited, "slow down".to_string());
        assert_eq!(resp.type_, "rate_limited");
        assert_eq!(code, ExitCode::TransientError);

        let offline = SendGridError::Http(HttpError::transport("dns failure"));
        let (_, code) = ErrorResponse::from_api_error(&offline, "dns failure".to_string());
        assert_eq!(code, ExitCode::TransientError);

        let rejected = SendGridError::Rejected("Invalid email.".to_string());
        let (resp, code) = ErrorResponse::from_api_error(&rejected, "Invalid email.".to_string());
        assert_eq!(resp.type_, "validation_failed");
        assert_eq!(code, ExitCode::PermanentError);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::SafetyRejected.code(), 3);
        assert_eq!(ExitCode::TransientError.to_string(), "transient_error");
    }
}
