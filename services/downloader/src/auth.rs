//! Earthdata Login session.
//!
//! Data hosts that require login answer an unauthenticated request with a
//! 302 to the login host. Following that redirect with HTTP basic
//! credentials sets session cookies in a jar shared by every later request.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode, Url};
use tb_common::{TbError, TbResult};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::FetcherConfig;

pub const USERNAME_VAR: &str = "EARTHDATA_USERNAME";
pub const PASSWORD_VAR: &str = "EARTHDATA_PASSWORD";

/// Cookie set by the login host once the user is authenticated.
const LOGIN_COOKIE: &str = "urs_user_already_logged";

/// Why a host could not be prepared for downloads.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AuthError {
    /// The host wants a login but no credentials are configured
    #[error("Environment variable {var} must be defined")]
    MissingCredentials { var: &'static str },

    #[error("Earthdata Login failed for {host}: {reason}")]
    LoginFailed { host: String, reason: String },

    #[error("probe of {url} failed: {reason}")]
    Unreachable { url: String, reason: String },
}

impl From<AuthError> for TbError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unreachable { url, reason } => TbError::RemoteFetchError {
                granule: url,
                reason,
            },
            other => TbError::AuthenticationError(other.to_string()),
        }
    }
}

/// Where Earthdata credentials come from.
#[derive(Clone)]
pub enum CredentialSource {
    /// `EARTHDATA_USERNAME` / `EARTHDATA_PASSWORD`, read when first needed
    Environment,
    Explicit { username: String, password: String },
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => f.write_str("Environment"),
            CredentialSource::Explicit { username, .. } => f
                .debug_struct("Explicit")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

impl CredentialSource {
    /// Username and password, or an error naming the missing variable.
    pub fn resolve(&self) -> Result<(String, String), AuthError> {
        match self {
            CredentialSource::Explicit { username, password } => {
                Ok((username.clone(), password.clone()))
            }
            CredentialSource::Environment => {
                Ok((env_credential(USERNAME_VAR)?, env_credential(PASSWORD_VAR)?))
            }
        }
    }
}

fn env_credential(var: &'static str) -> Result<String, AuthError> {
    match std::env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(AuthError::MissingCredentials { var }),
    }
}

/// Value of cookie `name` in a `Cookie` header string.
fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// HTTP clients sharing one cookie jar, plus what is known about each
/// host's login state.
pub struct EarthdataSession {
    /// Never follows redirects
    probe: Client,
    client: Client,
    jar: Arc<Jar>,
    credentials: CredentialSource,
    login_host: String,
    timeout: Duration,
    authenticated: HashSet<String>,
    /// Hosts whose login was rejected, with the reason
    rejected: HashMap<String, String>,
}

impl EarthdataSession {
    pub fn new(config: &FetcherConfig, credentials: CredentialSource) -> TbResult<Self> {
        let jar = Arc::new(Jar::default());
        let build_error =
            |e: reqwest::Error| TbError::InvalidConfig(format!("Failed to create HTTP client: {}", e));

        let probe = Client::builder()
            .redirect(Policy::none())
            .cookie_provider(jar.clone())
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(build_error)?;

        // No total timeout: granules can take longer than that to stream.
        // Downloads bound each read instead.
        let client = Client::builder()
            .cookie_provider(jar.clone())
            .connect_timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(build_error)?;

        Ok(Self {
            probe,
            client,
            jar,
            credentials,
            login_host: config.login_host.clone(),
            timeout: config.timeout(),
            authenticated: HashSet::new(),
            rejected: HashMap::new(),
        })
    }

    /// Client for downloads; carries the session cookies.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Log in to the host serving `url` if it asks for it.
    ///
    /// Each host is logged in at most once per session; a rejected login is
    /// remembered and not retried. Missing credentials are only reported
    /// when a host actually asks for them.
    #[instrument(skip(self))]
    pub async fn ensure_authenticated(&mut self, url: &str) -> Result<(), AuthError> {
        let host = origin(url).ok_or_else(|| AuthError::Unreachable {
            url: url.to_string(),
            reason: "invalid URL".to_string(),
        })?;
        if self.authenticated.contains(&host) {
            return Ok(());
        }
        if let Some(reason) = self.rejected.get(&host) {
            return Err(AuthError::LoginFailed {
                host,
                reason: reason.clone(),
            });
        }

        let probe = self
            .probe
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::Unreachable {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let login_url = match (probe.status(), probe.headers().get(LOCATION)) {
            (StatusCode::FOUND, Some(location)) => location
                .to_str()
                .ok()
                .filter(|l| l.contains(&self.login_host))
                .map(str::to_string),
            _ => None,
        };
        drop(probe);

        let Some(login_url) = login_url else {
            info!(%host, "Host did not redirect to login, continuing without auth");
            self.authenticated.insert(host);
            return Ok(());
        };

        let (username, password) = self.credentials.resolve()?;
        debug!(%host, "Logging in with Earthdata credentials");
        let reason = match self
            .client
            .get(&login_url)
            .basic_auth(username, Some(password))
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() && self.has_login_cookie(&login_url) => {
                None
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                Some(format!("{}: {}", status, body))
            }
            Err(e) => Some(format!("login request failed: {}", e)),
        };

        if let Some(reason) = reason {
            warn!(%host, %reason, "Earthdata Login rejected");
            self.rejected.insert(host.clone(), reason.clone());
            return Err(AuthError::LoginFailed { host, reason });
        }

        info!(%host, "Authenticated with Earthdata Login");
        self.authenticated.insert(host);
        Ok(())
    }

    fn has_login_cookie(&self, login_url: &str) -> bool {
        let Ok(url) = Url::parse(login_url) else {
            return false;
        };
        self.jar
            .cookies(&url)
            .and_then(|header| {
                header
                    .to_str()
                    .ok()
                    .map(|h| cookie_value(h, LOGIN_COOKIE) == Some("yes"))
            })
            .unwrap_or(false)
    }
}

/// `scheme://host[:port]` of a URL.
fn origin(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .map(|u| u.origin().ascii_serialization())
        .filter(|o| o != "null")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        let header = "session=abc; urs_user_already_logged=yes; other=1";
        assert_eq!(cookie_value(header, LOGIN_COOKIE), Some("yes"));
        assert_eq!(cookie_value(header, "missing"), None);
    }

    #[test]
    fn test_origin() {
        assert_eq!(
            origin("https://lance.nsstc.nasa.gov/amsr2-science/data/a.he5").as_deref(),
            Some("https://lance.nsstc.nasa.gov")
        );
        assert_eq!(
            origin("http://127.0.0.1:8080/x").as_deref(),
            Some("http://127.0.0.1:8080")
        );
        assert!(origin("not a url").is_none());
    }

    #[test]
    fn test_env_credentials() {
        temp_env::with_vars(
            [(USERNAME_VAR, Some("alice")), (PASSWORD_VAR, Some("secret"))],
            || {
                let (user, pass) = CredentialSource::Environment.resolve().unwrap();
                assert_eq!(user, "alice");
                assert_eq!(pass, "secret");
            },
        );
    }

    #[test]
    fn test_missing_env_credentials_name_the_variable() {
        temp_env::with_vars(
            [(USERNAME_VAR, Some("alice")), (PASSWORD_VAR, None)],
            || {
                let err = CredentialSource::Environment.resolve().unwrap_err();
                assert_eq!(err, AuthError::MissingCredentials { var: PASSWORD_VAR });
                assert!(err.to_string().contains(PASSWORD_VAR));
            },
        );

        temp_env::with_vars([(USERNAME_VAR, Some("")), (PASSWORD_VAR, Some("x"))], || {
            let err = CredentialSource::Environment.resolve().unwrap_err();
            assert!(err.to_string().contains(USERNAME_VAR));
        });
    }

    #[test]
    fn test_auth_error_conversion() {
        let err: TbError = AuthError::MissingCredentials { var: USERNAME_VAR }.into();
        assert!(matches!(err, TbError::AuthenticationError(ref m) if m.contains(USERNAME_VAR)));

        let err: TbError = AuthError::Unreachable {
            url: "http://127.0.0.1:9/a.he5".to_string(),
            reason: "connection refused".to_string(),
        }
        .into();
        assert!(matches!(err, TbError::RemoteFetchError { .. }));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = CredentialSource::Explicit {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("secret"));
    }
}
