//! Thin client for the hosted backend: password auth, table access over
//! PostgREST and change feeds over the realtime socket.

pub mod auth;
mod error;
pub mod notifications;
pub mod realtime;
mod rest;

use std::rc::Rc;

use gloo_net::http::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

pub use auth::{AuthEvent, AuthUser, Session};
pub use error::BackendError;
pub use rest::{Order, TableQuery};

use crate::config::BackendConfig;
use error::error_from_body;

/// Cheap to clone; shared through the app context.
#[derive(Clone, Debug, PartialEq)]
pub struct Backend {
    config: Rc<BackendConfig>,
    session: Option<Rc<Session>>,
}

impl Backend {
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config: Rc::new(config),
            session: None,
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    pub fn with_session(&self, session: Option<Session>) -> Self {
        Self {
            config: Rc::clone(&self.config),
            session: session.map(Rc::new),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_deref()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session().map(|session| &session.user)
    }

    pub fn user_id(&self) -> Result<String, BackendError> {
        self.user()
            .map(|user| user.id.clone())
            .ok_or(BackendError::NotAuthenticated)
    }

    /// Starts a query against one table.
    pub fn from(&self, table: &str) -> TableQuery {
        TableQuery::new(self.clone(), table)
    }

    fn bearer(&self) -> &str {
        self.session()
            .map(|session| session.access_token.as_str())
            .unwrap_or(self.config.anon_key.as_str())
    }

    pub(crate) fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.anon_key)
            .header("Authorization", &format!("Bearer {}", self.bearer()))
    }
}

/// Turns a non-2xx response into a [`BackendError`] carrying the decoded body.
pub(crate) async fn expect_ok(resp: Response) -> Result<Response, BackendError> {
    if resp.ok() {
        return Ok(resp);
    }
    let status = resp.status();
    let status_text = resp.status_text();
    let body = resp.text().await.unwrap_or_default();
    let err = error_from_body(status, &status_text, &body);
    log::error!("{} {}: {}", status, resp.url(), err);
    Err(err)
}

pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, BackendError> {
    let resp = expect_ok(resp).await?;
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|err| {
        log::error!("could not decode response from {}: {}", resp.url(), err);
        BackendError::Decode(err.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> Backend {
        Backend::new(BackendConfig::new("https://abc.supabase.co", "anon").unwrap())
    }

    fn session(token: &str) -> Session {
        serde_json::from_value(serde_json::json!({
            "access_token": token,
            "refresh_token": "r",
            "expires_in": 3600,
            "user": { "id": "u-1", "email": "ani@example.com" }
        }))
        .unwrap()
    }

    #[test]
    fn anonymous_backend_uses_anon_key() {
        let backend = backend();
        assert_eq!(backend.bearer(), "anon");
        assert_eq!(backend.user_id(), Err(BackendError::NotAuthenticated));
    }

    #[test]
    fn session_token_replaces_anon_key() {
        let signed_in = backend().with_session(Some(session("jwt")));
        assert_eq!(signed_in.bearer(), "jwt");
        assert_eq!(signed_in.user_id().unwrap(), "u-1");
        assert_eq!(signed_in.config(), backend().config());

        let signed_out = signed_in.with_session(None);
        assert!(signed_out.session().is_none());
    }
}
