use thiserror::Error;
use wasm_bindgen::JsValue;

const DEFAULT_URL: &str = "http://localhost:54321";
const DEFAULT_ANON_KEY: &str = "";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("backend URL must start with http:// or https://, got `{0}`")]
    InvalidUrl(String),
    #[error("backend anon key is empty")]
    MissingAnonKey,
}

/// Connection details for the hosted backend.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendConfig {
    pub url: String,
    pub anon_key: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into().trim().trim_end_matches('/').to_string();
        let anon_key = anon_key.into().trim().to_string();

        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::InvalidUrl(url));
        }
        if anon_key.is_empty() {
            return Err(ConfigError::MissingAnonKey);
        }
        Ok(Self { url, anon_key })
    }

    /// Reads `window.ENV_SUPABASE_URL` / `window.ENV_SUPABASE_ANON_KEY`, falling
    /// back to the values baked in at compile time.
    pub fn load() -> Result<Self, ConfigError> {
        let url = window_global("ENV_SUPABASE_URL")
            .or_else(|| option_env!("SUPABASE_URL").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        let anon_key = window_global("ENV_SUPABASE_ANON_KEY")
            .or_else(|| option_env!("SUPABASE_ANON_KEY").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_ANON_KEY.to_string());
        Self::new(url, anon_key)
    }

    pub fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.url, path)
    }

    pub fn realtime_url(&self) -> String {
        let ws_base = if let Some(rest) = self.url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            self.url.clone()
        };
        format!(
            "{}/realtime/v1/websocket?apikey={}&vsn=1.0.0",
            ws_base,
            urlencoding::encode(&self.anon_key)
        )
    }
}

fn window_global(name: &str) -> Option<String> {
    let window = web_sys::window()?;
    js_sys::Reflect::get(&window, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.as_string())
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash() {
        let config = BackendConfig::new("https://abc.supabase.co/", "key").unwrap();
        assert_eq!(config.url, "https://abc.supabase.co");
        assert_eq!(config.rest_url("clients"), "https://abc.supabase.co/rest/v1/clients");
        assert_eq!(
            config.auth_url("token?grant_type=password"),
            "https://abc.supabase.co/auth/v1/token?grant_type=password"
        );
    }

    #[test]
    fn rejects_bad_url_and_empty_key() {
        assert_eq!(
            BackendConfig::new("abc.supabase.co", "key"),
            Err(ConfigError::InvalidUrl("abc.supabase.co".to_string()))
        );
        assert_eq!(
            BackendConfig::new("https://abc.supabase.co", "  "),
            Err(ConfigError::MissingAnonKey)
        );
    }

    #[test]
    fn realtime_url_switches_scheme() {
        let config = BackendConfig::new("https://abc.supabase.co", "k1").unwrap();
        assert_eq!(
            config.realtime_url(),
            "wss://abc.supabase.co/realtime/v1/websocket?apikey=k1&vsn=1.0.0"
        );
        let local = BackendConfig::new("http://localhost:54321", "k2").unwrap();
        assert!(local.realtime_url().starts_with("ws://localhost:54321/realtime/v1/"));
    }
}
