use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, error};

use super::shared::*;
use crate::{Result, TokenExchangeRequest, TokenExchangeResponse, ZAuthConfig};

/// Asynchronous ZIQX Auth token service
///
/// Exchanges authorization codes for tokens and validates tokens against the
/// gateway's introspection endpoint. Works with any async runtime.
///
/// # Example
///
/// ```no_run
/// use ziqx_auth::{AsyncTokenService, ZAuthConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = AsyncTokenService::new(ZAuthConfig::default())?;
///
///     if service.validate("your-jwt-token").await? {
///         println!("Token is valid");
///     } else {
///         println!("Invalid or expired token");
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AsyncTokenService {
    config: ZAuthConfig,
}

impl AsyncTokenService {
    /// Create a new async token service
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

    /// Validate a token with the ZIQX introspection endpoint (async)
    ///
    /// The token is sent verbatim as the `Authorization` header.
    ///
    /// # Returns
    ///
    /// `Ok(true)` only for status 200 with body `{"success": true}`. Transport
    /// failures and any other response yield `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `token` is empty; no request is made.
    pub async fn validate(&self, token: &str) -> Result<bool> {
        validate_token(token)?;

        let url = self.config.validation_url();
        debug!(url, version = ?self.config.validation_version, "validating token");

        let client = reqwest::Client::new();
        let response = match client.get(url).header(AUTHORIZATION, token).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("token validation failed: {}", e);
                return Ok(false);
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => Ok(is_valid_response(status, &body)),
            Err(e) => {
                error!("token validation failed reading body: {}", e);
                Ok(false)
            }
        }
    }

    /// Exchange an authorization code for a token (async)
    ///
    /// The gateway's JSON response is returned as-is whatever the HTTP status,
    /// so error payloads reach the caller for inspection.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `InvalidArgument` if any parameter is empty (no request is made)
    /// - `Http` if the transport fails
    /// - `Json` if the response body is not valid JSON
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use ziqx_auth::{AsyncTokenService, TokenExchangeRequest, ZAuthConfig};
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let service = AsyncTokenService::new(ZAuthConfig::default())?;
    /// let response = service
    ///     .get_auth_token(&TokenExchangeRequest {
    ///         auth_app_key: "app-key".into(),
    ///         auth_secret: "app-secret".into(),
    ///         code: "code-from-callback".into(),
    ///         code_verifier: "pkce-verifier".into(),
    ///         redirect_uri: "http://localhost:3000/callback".into(),
    ///     })
    ///     .await?;
    /// println!("{:?}", response.access_token());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_auth_token(
        &self,
        request: &TokenExchangeRequest,
    ) -> Result<TokenExchangeResponse> {
        validate_exchange_request(request)?;

        debug!(url = %self.config.token_url, "exchanging authorization code");

        let client = reqwest::Client::new();
        let response = client
            .post(&self.config.token_url)
            .header(CONTENT_TYPE, "application/json")
            .header(APP_KEY_HEADER, &request.auth_app_key)
            .header(APP_SECRET_HEADER, &request.auth_secret)
            .json(&build_token_request(request))
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, "token endpoint responded");

        Ok(serde_json::from_str(&body)?)
    }
}
