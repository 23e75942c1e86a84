//! # ziqx-auth
//!
//! Client helpers for the ZIQX Auth gateway's PKCE authorization flow.
//!
//! ## Features
//!
//! - **Authorization redirect**: Builds the gateway login URL (full PKCE or simple app-key
//!   profile) and hands it to an injectable [`Navigator`]
//! - **Code exchange**: Trades an authorization code and PKCE verifier for a token
//! - **Token validation**: Checks a token against the V1 or V2 introspection endpoint
//! - **Sync API** (default) and **Async API** (optional, runtime agnostic)
//! - **Browser Integration**: Opens the system browser (default)
//! - **Callback Server**: Local server receiving the gateway redirect (optional, requires tokio)
//!
//! The PKCE verifier and challenge are computed by the caller.
//!
//! ## Quick Start
//!
//! ```no_run
//! # #[cfg(all(feature = "blocking", feature = "browser"))]
//! # {
//! use ziqx_auth::{
//!     AuthorizationRedirector, AuthorizationRequest, BrowserNavigator, TokenExchangeRequest,
//!     TokenService, ZAuthConfig,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ZAuthConfig::default();
//!
//!     let request = AuthorizationRequest::new(
//!         "your-auth-key",
//!         "http://localhost:3000/callback",
//!         "your-code-challenge",
//!     )
//!     .with_code_challenge_method("S256")
//!     .with_state("opaque-state");
//!     AuthorizationRedirector::new(&config, request, BrowserNavigator)?.login(false);
//!
//!     // ...the gateway redirects back to the callback with `code`...
//!
//!     let service = TokenService::new(config)?;
//!     let tokens = service.get_auth_token(&TokenExchangeRequest {
//!         auth_app_key: "your-auth-key".into(),
//!         auth_secret: "your-secret".into(),
//!         code: "code-from-callback".into(),
//!         code_verifier: "your-code-verifier".into(),
//!         redirect_uri: "http://localhost:3000/callback".into(),
//!     })?;
//!
//!     if let Some(token) = tokens.access_token() {
//!         println!("valid: {}", service.validate(token)?);
//!     }
//!     Ok(())
//! }
//! # }
//! ```

mod error;
mod redirect;
mod types;

#[cfg(any(feature = "blocking", feature = "async"))]
mod client;

#[cfg(feature = "browser")]
mod browser;

#[cfg(feature = "callback-server")]
mod server;

// Public API exports
pub use error::{Result, ZAuthError};
pub use redirect::{AuthorizationRedirector, Navigator};
pub use types::{
    AuthorizationRequest, RedirectProfile, TokenExchangeRequest, TokenExchangeResponse,
    ValidationVersion, ZAuthConfig, ZAuthConfigBuilder,
};

#[cfg(feature = "blocking")]
pub use client::TokenService;

#[cfg(feature = "async")]
pub use client::AsyncTokenService;

#[cfg(feature = "browser")]
pub use browser::{open_browser, BrowserNavigator};

#[cfg(feature = "callback-server")]
pub use server::{run_callback_server, CallbackData};
