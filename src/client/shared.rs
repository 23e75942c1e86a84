use serde::Serialize;
use tracing::warn;

use crate::types::require_absolute_url;
use crate::{Result, TokenExchangeRequest, ZAuthConfig, ZAuthError};

pub(super) const APP_KEY_HEADER: &str = "x-app-key";
pub(super) const APP_SECRET_HEADER: &str = "x-app-secret";
pub(super) const GRANT_TYPE: &str = "authorization_code";

/// Token exchange request body
///
/// Field order is the wire order.
#[derive(Debug, Serialize)]
pub(super) struct TokenRequestBody<'a> {
    code: &'a str,
    grant_type: &'static str,
    code_verifier: &'a str,
    redirect_uri: &'a str,
}

/// Build the token exchange request body
pub(super) fn build_token_request(request: &TokenExchangeRequest) -> TokenRequestBody<'_> {
    TokenRequestBody {
        code: &request.code,
        grant_type: GRANT_TYPE,
        code_verifier: &request.code_verifier,
        redirect_uri: &request.redirect_uri,
    }
}

/// Check the endpoints a token service talks to
pub(super) fn validate_service_config(config: &ZAuthConfig) -> Result<()> {
    require_absolute_url("token_url", &config.token_url)?;
    require_absolute_url("validation_url", config.validation_url())
}

/// Validate the token passed to `validate`
pub(super) fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(ZAuthError::InvalidArgument(
            "token is required for validation".to_string(),
        ));
    }
    Ok(())
}

/// Validate that every token exchange parameter is present
pub(super) fn validate_exchange_request(request: &TokenExchangeRequest) -> Result<()> {
    let missing: Vec<&str> = [
        ("auth_app_key", &request.auth_app_key),
        ("auth_secret", &request.auth_secret),
        ("code", &request.code),
        ("code_verifier", &request.code_verifier),
        ("redirect_uri", &request.redirect_uri),
    ]
    .iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| *name)
    .collect();

    if !missing.is_empty() {
        return Err(ZAuthError::InvalidArgument(format!(
            "all parameters are required, missing: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

/// Decide whether an introspection response means "valid"
///
/// Only status 200 with a JSON body whose `success` is boolean `true` passes.
pub(super) fn is_valid_response(status: u16, body: &str) -> bool {
    if status != 200 {
        warn!(status, "token validation rejected by gateway");
        return false;
    }

    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(data) => data.get("success") == Some(&serde_json::Value::Bool(true)),
        Err(e) => {
            warn!("token validation response is not JSON: {}", e);
            false
        }
    }
}
