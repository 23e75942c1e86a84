use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, error};

use crate::{Result, ZAuthError};

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

struct ServerState {
    tx: Mutex<Option<oneshot::Sender<Result<CallbackData>>>>,
    expected_state: Option<String>,
}

impl ServerState {
    async fn finish(&self, outcome: Result<CallbackData>) {
        if let Some(tx) = self.tx.lock().await.take() {
            let _ = tx.send(outcome);
        }
    }
}

/// Authorization code delivered on the gateway redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackData {
    pub code: String,
    /// The `state` query value, if the gateway echoed one
    pub state: Option<String>,
}

/// Run a local server that receives the ZIQX Auth redirect
///
/// Listens on `127.0.0.1:port` at `path` (the path of the `redirect_url`
/// given to the redirector) and resolves with the first callback.
///
/// # Errors
///
/// Returns an error if:
/// - `path` does not start with `/`, or the port cannot be bound
/// - the gateway redirects back with an `error` parameter
/// - `expected_state` is given and the returned state differs
/// - no `code` parameter is present
///
/// # Example
///
/// ```no_run
/// use ziqx_auth::run_callback_server;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let callback = run_callback_server(3000, "/callback", Some("s1")).await?;
/// println!("code: {}", callback.code);
/// # Ok(())
/// # }
/// ```
pub async fn run_callback_server(
    port: u16,
    path: &str,
    expected_state: Option<&str>,
) -> Result<CallbackData> {
    if !path.starts_with('/') {
        return Err(ZAuthError::CallbackServer(format!(
            "callback path must start with '/': {}",
            path
        )));
    }

    let (tx, rx) = oneshot::channel();
    let state = Arc::new(ServerState {
        tx: Mutex::new(Some(tx)),
        expected_state: expected_state.map(str::to_string),
    });

    let app = callback_router(path, state);

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        ZAuthError::CallbackServer(format!("Failed to bind to {}: {}", addr, e))
    })?;
    debug!("waiting for ZIQX Auth callback on http://{}{}", addr, path);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });
        if let Err(e) = server.await {
            error!("callback server stopped: {}", e);
        }
    });

    let outcome = match rx.await {
        Ok(outcome) => outcome,
        Err(_) => Err(ZAuthError::CallbackServer(
            "Server shut down unexpectedly".to_string(),
        )),
    };
    let _ = shutdown_tx.send(());
    outcome
}

fn callback_router(path: &str, state: Arc<ServerState>) -> Router {
    Router::new()
        .route(path, get(handle_callback))
        .with_state(state)
}

async fn handle_callback(
    Query(params): Query<CallbackQuery>,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    if let Some(error) = params.error {
        error!("gateway redirected back with error: {}", error);
        state
            .finish(Err(ZAuthError::OAuth(format!("gateway returned error: {}", error))))
            .await;
        return failure_page("The gateway reported an error. Please try again.");
    }

    if let Some(expected) = &state.expected_state {
        if params.state.as_deref() != Some(expected.as_str()) {
            state
                .finish(Err(ZAuthError::OAuth(
                    "State mismatch - possible CSRF attack".to_string(),
                )))
                .await;
            return failure_page("Security validation failed. Please try again.");
        }
    }

    match params.code {
        Some(code) if !code.is_empty() => {
            state
                .finish(Ok(CallbackData {
                    code,
                    state: params.state,
                }))
                .await;
            Html(
                r#"
                <html>
                    <head><title>Signed in</title></head>
                    <body>
                        <h1>Signed in with ZIQX</h1>
                        <p>You can close this window and return to the application.</p>
                    </body>
                </html>
                "#
                .to_string(),
            )
        }
        _ => {
            state
                .finish(Err(ZAuthError::OAuth(
                    "No authorization code received".to_string(),
                )))
                .await;
            failure_page("No authorization code received.")
        }
    }
}

fn failure_page(message: &'static str) -> Html<String> {
    Html(format!(
        r#"
        <html>
            <head><title>Sign-in Failed</title></head>
            <body>
                <h1>Sign-in Failed</h1>
                <p>{}</p>
                <p>You can close this window.</p>
            </body>
        </html>
        "#,
        message
    ))
}
