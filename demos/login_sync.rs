//! ZIQX Auth login, code exchange and validation (synchronous)
//!
//! Opens the gateway login page, waits for the authorization code to be pasted,
//! exchanges it and validates the returned token.
//!
//! Run with: ZIQX_APP_KEY=... ZIQX_APP_SECRET=... cargo run --example login_sync

use std::io::{self, Write};

use ziqx_auth::{
    AuthorizationRedirector, AuthorizationRequest, BrowserNavigator, TokenExchangeRequest,
    TokenService, ZAuthConfig,
};

const REDIRECT_URL: &str = "http://localhost:3000/callback";

fn main() -> anyhow::Result<()> {
    println!("=== ZIQX Auth - Login (Sync) ===\n");

    let app_key = std::env::var("ZIQX_APP_KEY")?;
    let app_secret = std::env::var("ZIQX_APP_SECRET")?;
    // Normally derived from a random verifier; plain method keeps the demo dependency-free.
    let verifier = "demo-code-verifier-demo-code-verifier-0123456";
    let config = ZAuthConfig::default();

    let request = AuthorizationRequest::new(&app_key, REDIRECT_URL, verifier)
        .with_code_challenge_method("plain");
    let redirector = AuthorizationRedirector::new(&config, request, BrowserNavigator)?;

    println!("Opening browser for authorization...");
    println!("If nothing opens, visit: {}\n", redirector.authorization_url(false));
    redirector.login(false);

    print!("Paste the `code` from the callback URL: ");
    io::stdout().flush()?;
    let mut code = String::new();
    io::stdin().read_line(&mut code)?;

    let service = TokenService::new(config)?;
    let response = service.get_auth_token(&TokenExchangeRequest {
        auth_app_key: app_key,
        auth_secret: app_secret,
        code: code.trim().to_string(),
        code_verifier: verifier.to_string(),
        redirect_uri: REDIRECT_URL.to_string(),
    })?;

    match response.access_token() {
        Some(token) => println!("Token valid: {}", service.validate(token)?),
        None => println!("Gateway response: {}", response.as_value()),
    }

    Ok(())
}
