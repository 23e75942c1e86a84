use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Result, ZAuthError};

const ZAUTH_BASE_URL: &str = "https://ziqx.cc/zauth";
const TOKEN_URL: &str = "https://ziqx.cc/zauth/api/token";
const VALIDATION_URL: &str = "https://ziqx.cc/zauth/api/validate";
const VALIDATION_URL_V2: &str = "https://ziqx.cc/zauth/api/v2/validate";

/// Which token introspection endpoint a deployment talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationVersion {
    /// Original introspection endpoint
    V1,
    /// Current introspection endpoint
    #[default]
    V2,
}

/// Gateway endpoints used by the redirector and the token services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZAuthConfig {
    /// Authorization page the user is redirected to (default: "https://ziqx.cc/zauth")
    pub auth_base_url: String,
    /// Code exchange endpoint
    pub token_url: String,
    /// V1 introspection endpoint
    pub validation_v1_url: String,
    /// V2 introspection endpoint
    pub validation_v2_url: String,
    /// Introspection endpoint selected for this deployment (default: V2)
    pub validation_version: ValidationVersion,
}

impl Default for ZAuthConfig {
    fn default() -> Self {
        Self {
            auth_base_url: ZAUTH_BASE_URL.to_string(),
            token_url: TOKEN_URL.to_string(),
            validation_v1_url: VALIDATION_URL.to_string(),
            validation_v2_url: VALIDATION_URL_V2.to_string(),
            validation_version: ValidationVersion::default(),
        }
    }
}

impl ZAuthConfig {
    /// Create a new config builder
    pub fn builder() -> ZAuthConfigBuilder {
        ZAuthConfigBuilder::default()
    }

    /// The introspection endpoint selected by `validation_version`
    pub fn validation_url(&self) -> &str {
        match self.validation_version {
            ValidationVersion::V1 => &self.validation_v1_url,
            ValidationVersion::V2 => &self.validation_v2_url,
        }
    }
}

/// Builder for ZAuthConfig
#[derive(Debug, Clone, Default)]
pub struct ZAuthConfigBuilder {
    auth_base_url: Option<String>,
    token_url: Option<String>,
    validation_v1_url: Option<String>,
    validation_v2_url: Option<String>,
    validation_version: Option<ValidationVersion>,
}

impl ZAuthConfigBuilder {
    /// Set the authorization page URL
    pub fn auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = Some(url.into());
        self
    }

    /// Set the code exchange endpoint
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Set the V1 introspection endpoint
    pub fn validation_v1_url(mut self, url: impl Into<String>) -> Self {
        self.validation_v1_url = Some(url.into());
        self
    }

    /// Set the V2 introspection endpoint
    pub fn validation_v2_url(mut self, url: impl Into<String>) -> Self {
        self.validation_v2_url = Some(url.into());
        self
    }

    /// Select the introspection endpoint version
    pub fn validation_version(mut self, version: ValidationVersion) -> Self {
        self.validation_version = Some(version);
        self
    }

    /// Point every endpoint at a single gateway origin
    ///
    /// Paths are the production ones, so `http://localhost:8080` yields
    /// `http://localhost:8080/zauth/api/token` and so on.
    pub fn gateway_origin(self, origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        self.auth_base_url(format!("{}/zauth", origin))
            .token_url(format!("{}/zauth/api/token", origin))
            .validation_v1_url(format!("{}/zauth/api/validate", origin))
            .validation_v2_url(format!("{}/zauth/api/v2/validate", origin))
    }

    /// Build the ZAuthConfig
    pub fn build(self) -> ZAuthConfig {
        let defaults = ZAuthConfig::default();
        ZAuthConfig {
            auth_base_url: self.auth_base_url.unwrap_or(defaults.auth_base_url),
            token_url: self.token_url.unwrap_or(defaults.token_url),
            validation_v1_url: self.validation_v1_url.unwrap_or(defaults.validation_v1_url),
            validation_v2_url: self.validation_v2_url.unwrap_or(defaults.validation_v2_url),
            validation_version: self
                .validation_version
                .unwrap_or(defaults.validation_version),
        }
    }
}

/// Check that a URL is non-empty, absolute and has a host
///
/// `localhost:3000/cb` parses with `localhost` as the scheme, hence the host check.
pub(crate) fn require_absolute_url(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ZAuthError::InvalidConfiguration(format!("`{}` is empty", name)));
    }
    let url = Url::parse(value).map_err(|e| {
        ZAuthError::InvalidConfiguration(format!("`{}` is not an absolute URL: {}", name, e))
    })?;
    if !url.has_host() {
        return Err(ZAuthError::InvalidConfiguration(format!(
            "`{}` has no host: {}",
            name, value
        )));
    }
    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    Some(value).filter(|v| !v.is_empty())
}

/// Parameters of a full PKCE authorization redirect
///
/// The code challenge is computed by the caller; this crate only carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    auth_key: String,
    redirect_url: String,
    code_challenge: String,
    code_challenge_method: Option<String>,
    state: Option<String>,
}

impl AuthorizationRequest {
    /// Create a request from the three required parameters
    ///
    /// Emptiness is checked when the request is handed to
    /// [`AuthorizationRedirector::new`](crate::AuthorizationRedirector::new).
    pub fn new(
        auth_key: impl Into<String>,
        redirect_url: impl Into<String>,
        code_challenge: impl Into<String>,
    ) -> Self {
        Self {
            auth_key: auth_key.into(),
            redirect_url: redirect_url.into(),
            code_challenge: code_challenge.into(),
            code_challenge_method: None,
            state: None,
        }
    }

    /// Set the challenge method, e.g. "S256". The gateway assumes "plaintext" when omitted.
    pub fn with_code_challenge_method(mut self, method: impl Into<String>) -> Self {
        self.code_challenge_method = non_empty(method.into());
        self
    }

    /// Set the opaque anti-CSRF state echoed back on the callback
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = non_empty(state.into());
        self
    }

    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    pub fn code_challenge(&self) -> &str {
        &self.code_challenge
    }

    pub fn code_challenge_method(&self) -> Option<&str> {
        self.code_challenge_method.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }
}

/// Shape of the authorization redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectProfile {
    /// Full PKCE redirect with an explicit callback URL
    Full(AuthorizationRequest),
    /// App key only; the `dev` query flag selects the development gateway
    Simple {
        /// The application key issued by ZIQX
        auth_key: String,
    },
}

impl RedirectProfile {
    /// Shorthand for `RedirectProfile::Simple`
    pub fn simple(auth_key: impl Into<String>) -> Self {
        RedirectProfile::Simple {
            auth_key: auth_key.into(),
        }
    }
}

impl From<AuthorizationRequest> for RedirectProfile {
    fn from(request: AuthorizationRequest) -> Self {
        RedirectProfile::Full(request)
    }
}

/// Parameters for exchanging an authorization code for a token
///
/// All fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenExchangeRequest {
    /// Application key, sent as the `x-app-key` header
    pub auth_app_key: String,
    /// Application secret, sent as the `x-app-secret` header
    pub auth_secret: String,
    /// Authorization code received on the callback
    pub code: String,
    /// PKCE verifier matching the challenge sent on the redirect
    pub code_verifier: String,
    /// Redirect URI used on the initial request
    pub redirect_uri: String,
}

/// Raw token endpoint response
///
/// The payload is passed through as the gateway sent it, including error bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenExchangeResponse(serde_json::Value);

impl TokenExchangeResponse {
    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// The `access_token` field, if the payload has a string there
    pub fn access_token(&self) -> Option<&str> {
        self.0.get("access_token").and_then(|v| v.as_str())
    }
}

impl From<serde_json::Value> for TokenExchangeResponse {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_falls_back_to_defaults() {
        let config = ZAuthConfig::builder()
            .token_url("http://localhost:9000/token")
            .build();
        let defaults = ZAuthConfig::default();

        assert_eq!(config.token_url, "http://localhost:9000/token");
        assert_eq!(config.auth_base_url, defaults.auth_base_url);
        assert_eq!(config.validation_version, ValidationVersion::V2);
    }

    #[test]
    fn validation_url_follows_version() {
        let v1 = ZAuthConfig::builder()
            .validation_version(ValidationVersion::V1)
            .build();
        assert_eq!(v1.validation_url(), VALIDATION_URL);
        assert_eq!(ZAuthConfig::default().validation_url(), VALIDATION_URL_V2);
    }

    #[test]
    fn gateway_origin_rewrites_every_endpoint() {
        let config = ZAuthConfig::builder()
            .gateway_origin("http://127.0.0.1:4000/")
            .build();

        assert_eq!(config.auth_base_url, "http://127.0.0.1:4000/zauth");
        assert_eq!(config.token_url, "http://127.0.0.1:4000/zauth/api/token");
        assert_eq!(
            config.validation_v2_url,
            "http://127.0.0.1:4000/zauth/api/v2/validate"
        );
    }

    #[test]
    fn empty_optional_fields_are_absent() {
        let request = AuthorizationRequest::new("k", "http://x", "c")
            .with_code_challenge_method("")
            .with_state("");

        assert_eq!(request.code_challenge_method(), None);
        assert_eq!(request.state(), None);
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = require_absolute_url("token_url", "/api/token").unwrap_err();
        assert!(matches!(err, ZAuthError::InvalidConfiguration(_)));
        assert!(require_absolute_url("token_url", "").is_err());
        assert!(require_absolute_url("token_url", "localhost:3000/cb").is_err());
        assert!(require_absolute_url("token_url", "mailto:someone@ziqx.cc").is_err());
        assert!(require_absolute_url("token_url", "https://ziqx.cc").is_ok());
    }

    #[test]
    fn access_token_accessor_does_not_require_shape() {
        let ok = TokenExchangeResponse::from(serde_json::json!({"access_token": "at"}));
        let err = TokenExchangeResponse::from(serde_json::json!({"error": "invalid_grant"}));

        assert_eq!(ok.access_token(), Some("at"));
        assert_eq!(err.access_token(), None);
        assert_eq!(err.as_value()["error"], "invalid_grant");
    }
}
