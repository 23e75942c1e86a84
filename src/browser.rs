use tracing::error;

use crate::{Navigator, Result, ZAuthError};

/// Open a URL in the user's default web browser
///
/// # Errors
///
/// Returns an error if the browser cannot be launched
///
/// # Example
///
/// ```no_run
/// use ziqx_auth::open_browser;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// open_browser("https://ziqx.cc/zauth?key=your-app-key")?;
/// # Ok(())
/// # }
/// ```
pub fn open_browser(url: &str) -> Result<()> {
    webbrowser::open(url)
        .map_err(|e| ZAuthError::BrowserLaunch(format!("Failed to open browser: {}", e)))
}

/// [`Navigator`] that opens the system browser
///
/// Launch failures are logged, since `login` has no error channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) {
        if let Err(e) = open_browser(url) {
            error!("could not open the authorization page: {}", e);
        }
    }
}
