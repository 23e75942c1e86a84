use std::fmt;

use tracing::debug;

use crate::types::require_absolute_url;
use crate::{AuthorizationRequest, RedirectProfile, Result, ZAuthConfig, ZAuthError};

/// Something that can send the user to an absolute URL
///
/// Implemented for closures, so tests can capture the URL instead of
/// opening a browser.
pub trait Navigator {
    fn navigate(&self, url: &str);
}

impl<F> Navigator for F
where
    F: Fn(&str),
{
    fn navigate(&self, url: &str) {
        self(url)
    }
}

/// Builds the ZIQX authorization URL and navigates to it
///
/// # Example
///
/// ```no_run
/// # #[cfg(feature = "browser")]
/// # {
/// use ziqx_auth::{AuthorizationRedirector, AuthorizationRequest, BrowserNavigator, ZAuthConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request = AuthorizationRequest::new(
///     "your-auth-key",
///     "http://localhost:3000/callback",
///     "your-code-challenge",
/// )
/// .with_code_challenge_method("S256");
///
/// let redirector = AuthorizationRedirector::new(&ZAuthConfig::default(), request, BrowserNavigator)?;
/// redirector.login(false);
/// # Ok(())
/// # }
/// # }
/// ```
#[derive(Clone)]
pub struct AuthorizationRedirector<N> {
    base_url: String,
    profile: RedirectProfile,
    navigator: N,
}

impl<N> fmt::Debug for AuthorizationRedirector<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationRedirector")
            .field("base_url", &self.base_url)
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl<N: Navigator> AuthorizationRedirector<N> {
    /// Create a redirector for one login attempt
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `auth_key` is empty, or in full mode if
    /// `redirect_url` or `code_challenge` is empty or the redirect URL is not absolute.
    pub fn new(
        config: &ZAuthConfig,
        profile: impl Into<RedirectProfile>,
        navigator: N,
    ) -> Result<Self> {
        let profile = profile.into();
        require_absolute_url("auth_base_url", &config.auth_base_url)?;

        match &profile {
            RedirectProfile::Full(request) => check_full_request(request)?,
            RedirectProfile::Simple { auth_key } => {
                if auth_key.is_empty() {
                    return Err(ZAuthError::InvalidConfiguration(
                        "`auth_key` is required".to_string(),
                    ));
                }
            }
        }

        Ok(Self {
            base_url: config.auth_base_url.clone(),
            profile,
            navigator,
        })
    }

    /// The profile this redirector was built with
    pub fn profile(&self) -> &RedirectProfile {
        &self.profile
    }

    /// Build the authorization URL without navigating
    ///
    /// Values are appended verbatim in the order the gateway expects.
    /// `dev_mode` only affects the simple profile.
    pub fn authorization_url(&self, dev_mode: bool) -> String {
        match &self.profile {
            RedirectProfile::Full(request) => {
                let mut url = format!(
                    "{}?key={}&redir={}&code_challenge={}",
                    self.base_url,
                    request.auth_key(),
                    request.redirect_url(),
                    request.code_challenge()
                );
                if let Some(method) = request.code_challenge_method() {
                    url.push_str("&challenge_method=");
                    url.push_str(method);
                }
                if let Some(state) = request.state() {
                    url.push_str("&state=");
                    url.push_str(state);
                }
                url
            }
            RedirectProfile::Simple { auth_key } => {
                let mut url = format!("{}?key={}", self.base_url, auth_key);
                if dev_mode {
                    url.push_str("&dev=true");
                }
                url
            }
        }
    }

    /// Send the user to the ZIQX authorization page
    pub fn login(&self, dev_mode: bool) {
        let url = self.authorization_url(dev_mode);
        debug!(dev_mode, "redirecting to ZIQX Auth: {}", url);
        self.navigator.navigate(&url);
    }
}

fn check_full_request(request: &AuthorizationRequest) -> Result<()> {
    if request.auth_key().is_empty()
        || request.redirect_url().is_empty()
        || request.code_challenge().is_empty()
    {
        return Err(ZAuthError::InvalidConfiguration(
            "`auth_key`, `redirect_url` and `code_challenge` are required".to_string(),
        ));
    }
    require_absolute_url("redirect_url", request.redirect_url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn config() -> ZAuthConfig {
        ZAuthConfig::builder()
            .auth_base_url("https://auth.test/zauth")
            .build()
    }

    #[test]
    fn full_mode_with_all_parameters() {
        let request = AuthorizationRequest::new("k1", "http://localhost:3000/cb", "chal123")
            .with_code_challenge_method("S256")
            .with_state("s1");
        let redirector = AuthorizationRedirector::new(&config(), request, |_: &str| {}).unwrap();

        assert_eq!(
            redirector.authorization_url(false),
            "https://auth.test/zauth?key=k1&redir=http://localhost:3000/cb&code_challenge=chal123&challenge_method=S256&state=s1"
        );
    }

    #[test]
    fn full_mode_omits_absent_optionals() {
        let request = AuthorizationRequest::new("k1", "http://localhost:3000/cb", "chal123");
        let redirector = AuthorizationRedirector::new(&config(), request, |_: &str| {}).unwrap();

        let url = redirector.authorization_url(false);
        assert_eq!(
            url,
            "https://auth.test/zauth?key=k1&redir=http://localhost:3000/cb&code_challenge=chal123"
        );
        assert!(!url.contains("challenge_method"));
        assert!(!url.contains("state"));
    }

    #[test]
    fn full_mode_state_without_method() {
        let request = AuthorizationRequest::new("k1", "http://x", "c").with_state("s1");
        let redirector = AuthorizationRedirector::new(&config(), request, |_: &str| {}).unwrap();

        assert!(redirector
            .authorization_url(false)
            .ends_with("code_challenge=c&state=s1"));
    }

    #[test]
    fn full_mode_ignores_dev_flag() {
        let request = AuthorizationRequest::new("k1", "http://x", "c");
        let redirector = AuthorizationRedirector::new(&config(), request, |_: &str| {}).unwrap();

        assert_eq!(
            redirector.authorization_url(true),
            redirector.authorization_url(false)
        );
    }

    #[test]
    fn simple_mode_dev_flag() {
        let redirector =
            AuthorizationRedirector::new(&config(), RedirectProfile::simple("k2"), |_: &str| {})
                .unwrap();

        assert_eq!(
            redirector.authorization_url(true),
            "https://auth.test/zauth?key=k2&dev=true"
        );
        assert_eq!(
            redirector.authorization_url(false),
            "https://auth.test/zauth?key=k2"
        );
    }

    #[test]
    fn login_hands_url_to_navigator() {
        let seen = RefCell::new(Vec::new());
        let redirector = AuthorizationRedirector::new(
            &config(),
            RedirectProfile::simple("k2"),
            |url: &str| seen.borrow_mut().push(url.to_string()),
        )
        .unwrap();

        redirector.login(true);

        assert_eq!(
            *seen.borrow(),
            vec!["https://auth.test/zauth?key=k2&dev=true".to_string()]
        );
    }

    #[test]
    fn missing_required_fields_fail_before_navigation() {
        let navigated = RefCell::new(false);
        let navigator = |_: &str| *navigated.borrow_mut() = true;

        let cases = [
            AuthorizationRequest::new("", "http://x", "c"),
            AuthorizationRequest::new("k", "", "c"),
            AuthorizationRequest::new("k", "http://x", ""),
        ];
        for request in cases {
            let err = AuthorizationRedirector::new(&config(), request, &navigator).unwrap_err();
            assert!(err.is_invalid_configuration(), "unexpected error: {err}");
        }

        let err = AuthorizationRedirector::new(&config(), RedirectProfile::simple(""), &navigator)
            .unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(!*navigated.borrow());
    }

    #[test]
    fn relative_redirect_url_is_rejected() {
        let request = AuthorizationRequest::new("k", "/callback", "c");
        let err = AuthorizationRedirector::new(&config(), request, |_: &str| {}).unwrap_err();
        assert!(matches!(err, ZAuthError::InvalidConfiguration(_)));
    }

    #[test]
    fn redirect_url_without_scheme_is_rejected() {
        let request = AuthorizationRequest::new("k", "localhost:3000/cb", "c");
        let err = AuthorizationRedirector::new(&config(), request, |_: &str| {}).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(err.to_string().contains("redirect_url"));
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let config = ZAuthConfig::builder().auth_base_url("").build();
        let err = AuthorizationRedirector::new(&config, RedirectProfile::simple("k"), |_: &str| {})
            .unwrap_err();
        assert!(err.is_invalid_configuration());
    }
}
