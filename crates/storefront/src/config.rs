//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (one of)
//! - `BAZAAR_COOKIE` - The page's `Cookie` header; forwarded on every request,
//!   and the CSRF token is read from its `csrftoken` entry
//! - `BAZAAR_CSRF_TOKEN` - The CSRF token itself (overrides the cookie entry)
//!
//! ## Optional
//! - `BAZAAR_API_BASE_URL` - Backend origin (default: `http://127.0.0.1:8000`)
//! - `BAZAAR_AUTHENTICATED` - `True`/`False` as rendered by the page (default: `False`)
//! - `BAZAAR_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 10)

use std::time::Duration;

use bazaar_core::AuthMode;
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Name of the cookie holding the anti-forgery token.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: &str = "10";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Page-level configuration.
///
/// Implements `Debug` manually to redact the cookie and token.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Backend origin, always ending in `/`.
    pub api_base_url: Url,
    /// Raw `Cookie` header of the page, if known.
    pub cookie: Option<SecretString>,
    /// Value sent as `X-CSRFToken` on mutating requests.
    pub csrf_token: SecretString,
    /// Which cart line shape the backend will return.
    pub auth: AuthMode,
    /// Timeout applied to every backend request.
    pub request_timeout: Duration,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("cookie", &self.cookie.as_ref().map(|_| "[REDACTED]"))
            .field("csrf_token", &"[REDACTED]")
            .field("auth", &self.auth)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if no CSRF token can be found or a variable is
    /// malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base = lookup("BAZAAR_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let api_base_url = parse_base_url(&base)
            .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_API_BASE_URL".into(), e))?;

        let cookie = lookup("BAZAAR_COOKIE").filter(|c| !c.trim().is_empty());
        let csrf_token = lookup("BAZAAR_CSRF_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                cookie
                    .as_deref()
                    .and_then(|c| cookie_value(c, CSRF_COOKIE_NAME))
            })
            .ok_or_else(|| ConfigError::MissingEnvVar("BAZAAR_CSRF_TOKEN".into()))?;

        let auth = lookup("BAZAAR_AUTHENTICATED")
            .unwrap_or_default()
            .parse::<AuthMode>()
            .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_AUTHENTICATED".into(), e))?;

        let timeout_secs = lookup("BAZAAR_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.into())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BAZAAR_REQUEST_TIMEOUT_SECS".into(), e.to_string())
            })?;

        Ok(Self {
            api_base_url,
            cookie: cookie.map(SecretString::from),
            csrf_token: SecretString::from(csrf_token),
            auth,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Parse the backend origin, forcing a trailing slash so relative API paths
/// join under it instead of replacing its last segment.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err("must be an absolute http(s) URL".into());
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Read one entry from a `Cookie` header, percent-decoding its value.
///
/// Returns `None` when the entry is absent.
#[must_use]
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(|raw| {
            urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), std::borrow::Cow::into_owned)
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_cookie_value() {
        let header = "sessionid=abc; csrftoken=tok%3D1; theme=dark";
        assert_eq!(cookie_value(header, "csrftoken").as_deref(), Some("tok=1"));
        assert_eq!(cookie_value(header, "sessionid").as_deref(), Some("abc"));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn test_cookie_value_requires_exact_name() {
        assert_eq!(cookie_value("csrftokenx=1", "csrftoken"), None);
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::from_lookup(lookup(&[("BAZAAR_CSRF_TOKEN", "t0k")])).unwrap();
        assert_eq!(config.api_base_url.as_str(), "http://127.0.0.1:8000/");
        assert_eq!(config.auth, AuthMode::Anonymous);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.csrf_token.expose_secret(), "t0k");
        assert!(config.cookie.is_none());
    }

    #[test]
    fn test_token_from_cookie() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("BAZAAR_COOKIE", "csrftoken=fromcookie; sessionid=s"),
            ("BAZAAR_AUTHENTICATED", "True"),
            ("BAZAAR_API_BASE_URL", "https://shop.example/market"),
        ]))
        .unwrap();
        assert_eq!(config.csrf_token.expose_secret(), "fromcookie");
        assert_eq!(config.auth, AuthMode::Authenticated);
        assert_eq!(config.api_base_url.as_str(), "https://shop.example/market/");
    }

    #[test]
    fn test_missing_token() {
        let err = StorefrontConfig::from_lookup(lookup(&[("BAZAAR_COOKIE", "sessionid=s")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn test_invalid_values() {
        let err = StorefrontConfig::from_lookup(lookup(&[
            ("BAZAAR_CSRF_TOKEN", "t"),
            ("BAZAAR_REQUEST_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));

        let err = StorefrontConfig::from_lookup(lookup(&[
            ("BAZAAR_CSRF_TOKEN", "t"),
            ("BAZAAR_API_BASE_URL", "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = StorefrontConfig::from_lookup(lookup(&[(
            "BAZAAR_COOKIE",
            "csrftoken=super_secret_token; sessionid=super_secret_session",
        )]))
        .unwrap();
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("127.0.0.1"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret"));
    }
}
