use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, error};

use super::shared::*;
use crate::{Result, TokenExchangeRequest, TokenExchangeResponse, ZAuthConfig};

/// Synchronous ZIQX Auth token service
///
/// Blocking counterpart of `AsyncTokenService`; no async runtime required.
///
/// # Panics
///
/// `validate` and `get_auth_token` build a `reqwest::blocking::Client`, which
/// panics when called from inside an async runtime. From async code use
/// `AsyncTokenService`, or run the call in `tokio::task::spawn_blocking`.
///
/// # Example
///
/// ```no_run
/// use ziqx_auth::{TokenService, ValidationVersion, ZAuthConfig};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ZAuthConfig::builder()
///         .validation_version(ValidationVersion::V1)
///         .build();
///     let service = TokenService::new(config)?;
///
///     println!("valid: {}", service.validate("your-jwt-token")?);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TokenService {
    config: ZAuthConfig,
}

impl TokenService {
    /// Create a new blocking token service
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the token or selected validation endpoint
    /// is not an absolute URL
    pub fn new(config: ZAuthConfig) -> Result<Self> {
        validate_service_config(&config)?;
        Ok(Self { config })
    }

    /// The configuration this service was built with
    pub fn config(&self) -> &ZAuthConfig {
        &self.config
    }

    /// Validate a token with the ZIQX introspection endpoint
    ///
    /// Same contract as the async version: `Err` only for an empty token,
    /// `Ok(false)` for every transport or protocol failure.
    pub fn validate(&self, token: &str) -> Result<bool> {
        validate_token(token)?;

        let url = self.config.validation_url();
        debug!(url, version = ?self.config.validation_version, "validating token");

        let client = reqwest::blocking::Client::new();
        let response = match client.get(url).header(AUTHORIZATION, token).send() {
            Ok(response) => response,
            Err(e) => {
                error!("token validation failed: {}", e);
                return Ok(false);
            }
        };

        let status = response.status().as_u16();
        match response.text() {
            Ok(body) => Ok(is_valid_response(status, &body)),
            Err(e) => {
                error!("token validation failed reading body: {}", e);
                Ok(false)
            }
        }
    }

    /// Exchange an authorization code for a token
    ///
    /// Returns the gateway's JSON whatever the HTTP status.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a missing parameter (before any request),
    /// `Http` on transport failure, `Json` for a non-JSON body.
    pub fn get_auth_token(&self, request: &TokenExchangeRequest) -> Result<TokenExchangeResponse> {
        validate_exchange_request(request)?;

        debug!(url = %self.config.token_url, "exchanging authorization code");

        let client = reqwest::blocking::Client::new();
        let response = client
            .post(&self.config.token_url)
            .header(CONTENT_TYPE, "application/json")
            .header(APP_KEY_HEADER, &request.auth_app_key)
            .header(APP_SECRET_HEADER, &request.auth_secret)
            .json(&build_token_request(request))
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;
        debug!(status, "token endpoint responded");

        Ok(serde_json::from_str(&body)?)
    }
}
