use serde::Deserialize;
use thiserror::Error;

use crate::config::ConfigError;

/// PostgREST code for "no row matched a single-row request".
pub const NO_ROWS: &str = "PGRST116";

const FALLBACK_MESSAGE: &str = "Terjadi kesalahan, coba lagi";

/// English fragments from the hosted API and the text shown instead.
const TRANSLATIONS: [(&str, &str); 7] = [
    ("invalid login credentials", "Email atau password salah"),
    ("email not confirmed", "Email belum dikonfirmasi. Silakan cek inbox Anda"),
    ("user already registered", "Email sudah terdaftar"),
    ("password should be at least 6 characters", "Password minimal 6 karakter"),
    ("invalid email", "Format email tidak valid"),
    ("too many requests", "Terlalu banyak percobaan. Coba lagi nanti"),
    ("network", "Koneksi bermasalah. Periksa jaringan Anda"),
];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request failed with status {status}: {message}")]
    Http {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("not signed in")]
    NotAuthenticated,
    #[error("refusing to {0} `{1}` without a filter")]
    UnfilteredMutation(&'static str, String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<gloo_net::Error> for BackendError {
    fn from(err: gloo_net::Error) -> Self {
        match err {
            gloo_net::Error::SerdeError(err) => BackendError::Decode(err.to_string()),
            other => BackendError::Network(other.to_string()),
        }
    }
}

impl BackendError {
    pub fn code(&self) -> Option<&str> {
        match self {
            BackendError::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn is_no_rows(&self) -> bool {
        self.code() == Some(NO_ROWS)
    }

    /// Indonesian text for a toast.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Http { message, .. } => translate_error(message),
            BackendError::Network(_) => translate_error("network"),
            BackendError::NotAuthenticated => "Sesi berakhir, silakan login kembali".to_string(),
            other => translate_error(&other.to_string()),
        }
    }
}

/// Error bodies differ between the auth and table endpoints; read whichever
/// fields are present.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default, alias = "error_code")]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, alias = "error_description")]
    msg: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_error(self, status: u16, fallback: &str) -> BackendError {
        let code = match self.code {
            Some(serde_json::Value::String(code)) => Some(code),
            Some(serde_json::Value::Number(code)) => Some(code.to_string()),
            _ => self.error.clone(),
        };
        let message = self
            .message
            .or(self.msg)
            .or(self.error)
            .unwrap_or_else(|| fallback.to_string());
        BackendError::Http {
            status,
            code,
            message,
        }
    }
}

pub(crate) fn error_from_body(status: u16, status_text: &str, body: &str) -> BackendError {
    serde_json::from_str::<ErrorBody>(body)
        .unwrap_or_default()
        .into_error(status, status_text)
}

/// Case-insensitive dictionary lookup; unknown messages pass through.
pub fn translate_error(message: &str) -> String {
    if message.trim().is_empty() {
        return FALLBACK_MESSAGE.to_string();
    }
    let lowered = message.to_lowercase();
    TRANSLATIONS
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, text)| text.to_string())
        .unwrap_or_else(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Invalid login credentials", "Email atau password salah")]
    #[case("INVALID LOGIN CREDENTIALS", "Email atau password salah")]
    #[case("User already registered", "Email sudah terdaftar")]
    #[case("Failed to fetch: NetworkError when attempting", "Koneksi bermasalah. Periksa jaringan Anda")]
    #[case("duplicate key value violates unique constraint", "duplicate key value violates unique constraint")]
    #[case("", "Terjadi kesalahan, coba lagi")]
    #[case("   ", "Terjadi kesalahan, coba lagi")]
    fn translates_known_messages(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(translate_error(raw), expected);
    }

    #[test]
    fn reads_postgrest_error_body() {
        let err = error_from_body(
            406,
            "Not Acceptable",
            r#"{"code":"PGRST116","details":"The result contains 0 rows","hint":null,"message":"JSON object requested, multiple (or no) rows returned"}"#,
        );
        assert!(err.is_no_rows());
        assert!(matches!(err, BackendError::Http { status: 406, .. }));
    }

    #[test]
    fn reads_auth_error_body() {
        let err = error_from_body(
            400,
            "Bad Request",
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(err.code(), Some("invalid_grant"));
        assert_eq!(err.user_message(), "Email atau password salah");

        let err = error_from_body(400, "Bad Request", r#"{"code":400,"msg":"Email not confirmed"}"#);
        assert_eq!(err.code(), Some("400"));
        assert!(err.user_message().starts_with("Email belum dikonfirmasi"));
    }

    #[test]
    fn unreadable_body_falls_back_to_status_text() {
        let err = error_from_body(502, "Bad Gateway", "<html>");
        assert_eq!(
            err,
            BackendError::Http {
                status: 502,
                code: None,
                message: "Bad Gateway".into()
            }
        );
    }

    #[test]
    fn mutation_guard_message() {
        let err = BackendError::UnfilteredMutation("delete", "clients".into());
        assert_eq!(err.to_string(), "refusing to delete `clients` without a filter");
    }
}
