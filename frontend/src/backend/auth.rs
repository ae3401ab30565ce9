use chrono::Utc;
use gloo_net::http::Request;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{expect_ok, read_json, Backend, BackendError};
use crate::config::BackendConfig;
use crate::storage;

const SESSION_KEY: &str = "finance.auth.session";
/// Tokens expiring within this many seconds are refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl AuthUser {
    /// Name in the header menu: the part of the email before `@`.
    pub fn display_name(&self) -> String {
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|name| !name.is_empty())
            .unwrap_or("User")
            .to_string()
    }

    pub fn initial(&self) -> String {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "U".to_string())
    }

    /// Full name stored on the `users` row, defaulting to the email.
    pub fn full_name(&self) -> String {
        self.user_metadata
            .full_name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

impl Session {
    fn stamped(mut self, now: i64) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(now + self.expires_in);
        }
        self
    }

    /// Sessions without a known expiry are used as-is.
    pub fn expires_soon(&self, now: i64) -> bool {
        self.expires_at
            .map_or(false, |at| at - now <= REFRESH_MARGIN_SECS)
    }
}

pub enum SignUpOutcome {
    SignedIn(Session),
    /// The account exists but the email has to be confirmed first.
    ConfirmationRequired,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignUpData<'a> {
    full_name: &'a str,
}

#[derive(Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpData<'a>,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

#[derive(Serialize)]
struct UserRecord<'a> {
    id: &'a str,
    email: Option<&'a str>,
    full_name: String,
    role: &'a str,
}

fn now_secs() -> i64 {
    Utc::now().timestamp()
}

fn persist(session: &Session) {
    storage::save_json(SESSION_KEY, session);
}

pub fn stored_session() -> Option<Session> {
    storage::load_json(SESSION_KEY)
}

pub fn clear_session() {
    storage::remove(SESSION_KEY);
}

pub async fn sign_in(config: &BackendConfig, email: &str, password: &str) -> Result<Session, BackendError> {
    let resp = Request::post(&config.auth_url("token?grant_type=password"))
        .header("apikey", &config.anon_key)
        .json(&PasswordGrant { email, password })?
        .send()
        .await?;
    let session = read_json::<Session>(resp).await?.stamped(now_secs());
    persist(&session);
    log::info!("signed in as {}", session.user.id);
    Ok(session)
}

pub async fn sign_up(
    config: &BackendConfig,
    email: &str,
    password: &str,
    full_name: &str,
) -> Result<SignUpOutcome, BackendError> {
    let resp = Request::post(&config.auth_url("signup"))
        .header("apikey", &config.anon_key)
        .json(&SignUpBody {
            email,
            password,
            data: SignUpData { full_name },
        })?
        .send()
        .await?;
    let body: Value = read_json(resp).await?;
    session_from_signup(body, now_secs()).map(|outcome| {
        if let SignUpOutcome::SignedIn(session) = &outcome {
            persist(session);
        }
        outcome
    })
}

/// Sign-up answers with a session when auto-confirm is on, otherwise with
/// the bare user.
fn session_from_signup(body: Value, now: i64) -> Result<SignUpOutcome, BackendError> {
    if body.get("access_token").is_none() {
        return Ok(SignUpOutcome::ConfirmationRequired);
    }
    serde_json::from_value::<Session>(body)
        .map(|session| SignUpOutcome::SignedIn(session.stamped(now)))
        .map_err(|err| BackendError::Decode(err.to_string()))
}

/// Always forgets the local session, even when the server call fails.
pub async fn sign_out(backend: &Backend) -> Result<(), BackendError> {
    clear_session();
    let resp = backend
        .authorize(Request::post(&backend.config().auth_url("logout")))
        .send()
        .await?;
    expect_ok(resp).await?;
    log::info!("signed out");
    Ok(())
}

pub async fn refresh(config: &BackendConfig, refresh_token: &str) -> Result<Session, BackendError> {
    let resp = Request::post(&config.auth_url("token?grant_type=refresh_token"))
        .header("apikey", &config.anon_key)
        .json(&RefreshGrant { refresh_token })?
        .send()
        .await?;
    let session = read_json::<Session>(resp).await?.stamped(now_secs());
    persist(&session);
    log::debug!("refreshed session for {}", session.user.id);
    Ok(session)
}

/// Stored session, refreshed first when close to expiry. A refresh that is
/// rejected ends the session.
pub async fn get_session(config: &BackendConfig) -> Result<Option<Session>, BackendError> {
    let Some(session) = stored_session() else {
        return Ok(None);
    };
    if !session.expires_soon(now_secs()) {
        return Ok(Some(session));
    }
    match refresh(config, &session.refresh_token).await {
        Ok(fresh) => Ok(Some(fresh)),
        Err(err @ BackendError::Http { .. }) => {
            log::warn!("session refresh rejected: {}", err);
            clear_session();
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// What changed between two observations of the session.
pub fn session_change(before: Option<&Session>, after: Option<&Session>) -> Option<AuthEvent> {
    match (before, after) {
        (None, Some(_)) => Some(AuthEvent::SignedIn),
        (Some(_), None) => Some(AuthEvent::SignedOut),
        (Some(old), Some(new)) if old.user.id != new.user.id => Some(AuthEvent::SignedIn),
        (Some(old), Some(new)) if old.access_token != new.access_token => Some(AuthEvent::TokenRefreshed),
        _ => None,
    }
}

/// Creates the caller's `users` row when it does not exist yet.
pub async fn ensure_user_record(backend: &Backend) -> Result<(), BackendError> {
    let user = backend.user().ok_or(BackendError::NotAuthenticated)?;
    match backend
        .from("users")
        .select("id")
        .eq("id", &user.id)
        .single::<Value>()
        .await
    {
        Ok(_) => Ok(()),
        Err(err) if err.is_no_rows() => {
            log::info!("creating users row for {}", user.id);
            backend
                .from("users")
                .insert(&UserRecord {
                    id: &user.id,
                    email: user.email.as_deref(),
                    full_name: user.full_name(),
                    role: "user",
                })
                .await
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn session(token: &str, user: &str) -> Session {
        serde_json::from_value(json!({
            "access_token": token,
            "refresh_token": "refresh",
            "expires_in": 3600,
            "user": {
                "id": user,
                "email": "ani.wijaya@example.com",
                "user_metadata": { "full_name": "Ani Wijaya" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn stamps_expiry_from_lifetime() {
        let stamped = session("a", "u").stamped(1_000);
        assert_eq!(stamped.expires_at, Some(4_600));

        let mut given = session("a", "u");
        given.expires_at = Some(10);
        assert_eq!(given.stamped(1_000).expires_at, Some(10));
    }

    #[rstest]
    #[case(4_600, 1_000, false)]
    #[case(4_600, 4_539, false)]
    #[case(4_600, 4_540, true)]
    #[case(4_600, 9_999, true)]
    fn refreshes_within_a_minute_of_expiry(#[case] expires_at: i64, #[case] now: i64, #[case] soon: bool) {
        let mut s = session("a", "u");
        s.expires_at = Some(expires_at);
        assert_eq!(s.expires_soon(now), soon);
    }

    #[test]
    fn unknown_expiry_is_not_refreshed() {
        let mut s = session("a", "u");
        s.expires_in = 0;
        assert!(!s.stamped(50).expires_soon(i64::MAX));
    }

    #[test]
    fn user_labels() {
        let user = session("a", "u").user;
        assert_eq!(user.display_name(), "ani.wijaya");
        assert_eq!(user.initial(), "A");
        assert_eq!(user.full_name(), "Ani Wijaya");

        let bare = AuthUser {
            id: "x".into(),
            email: None,
            user_metadata: UserMetadata::default(),
        };
        assert_eq!(bare.display_name(), "User");
        assert_eq!(bare.full_name(), "");
    }

    #[test]
    fn signup_without_session_needs_confirmation() {
        let outcome = session_from_signup(json!({ "id": "u", "email": "a@b.c" }), 0).unwrap();
        assert!(matches!(outcome, SignUpOutcome::ConfirmationRequired));

        let body = serde_json::to_value(session("tok", "u")).unwrap();
        let outcome = session_from_signup(body, 0).unwrap();
        assert!(matches!(outcome, SignUpOutcome::SignedIn(s) if s.access_token == "tok"));
    }

    #[test]
    fn classifies_session_changes() {
        let a = session("t1", "u1");
        let refreshed = session("t2", "u1");
        let other = session("t3", "u2");
        assert_eq!(session_change(None, Some(&a)), Some(AuthEvent::SignedIn));
        assert_eq!(session_change(Some(&a), None), Some(AuthEvent::SignedOut));
        assert_eq!(session_change(Some(&a), Some(&refreshed)), Some(AuthEvent::TokenRefreshed));
        assert_eq!(session_change(Some(&a), Some(&other)), Some(AuthEvent::SignedIn));
        assert_eq!(session_change(Some(&a), Some(&a.clone())), None);
        assert_eq!(session_change(None, None), None);
    }

    #[test]
    fn user_record_shape() {
        let body = serde_json::to_value(UserRecord {
            id: "u",
            email: Some("a@b.c"),
            full_name: "A".into(),
            role: "user",
        })
        .unwrap();
        assert_eq!(body, json!({ "id": "u", "email": "a@b.c", "full_name": "A", "role": "user" }));
    }
}
