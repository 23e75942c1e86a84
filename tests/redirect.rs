use std::sync::Mutex;

use ziqx_auth::{AuthorizationRedirector, AuthorizationRequest, RedirectProfile, ZAuthConfig};

#[test]
fn full_login_navigates_to_pkce_url() {
    let visited = Mutex::new(None);
    let request = AuthorizationRequest::new("k1", "http://localhost:3000/cb", "chal123")
        .with_code_challenge_method("S256")
        .with_state("s1");

    let redirector = AuthorizationRedirector::new(&ZAuthConfig::default(), request, |url: &str| {
        *visited.lock().unwrap() = Some(url.to_string());
    })
    .unwrap();
    redirector.login(false);

    let url = visited.lock().unwrap().clone().unwrap();
    assert!(url.starts_with(&ZAuthConfig::default().auth_base_url));
    assert!(url.ends_with(
        "?key=k1&redir=http://localhost:3000/cb&code_challenge=chal123&challenge_method=S256&state=s1"
    ));
}

#[test]
fn simple_login_in_dev_mode() {
    let visited = Mutex::new(Vec::new());
    let redirector = AuthorizationRedirector::new(
        &ZAuthConfig::default(),
        RedirectProfile::simple("k2"),
        |url: &str| visited.lock().unwrap().push(url.to_string()),
    )
    .unwrap();

    redirector.login(true);
    redirector.login(false);

    let visited = visited.lock().unwrap();
    assert!(visited[0].contains("key=k2&dev=true"));
    assert!(!visited[1].contains("dev="));
}

#[test]
fn redirector_targets_configured_gateway() {
    let config = ZAuthConfig::builder()
        .gateway_origin("http://localhost:8080")
        .build();
    let redirector =
        AuthorizationRedirector::new(&config, RedirectProfile::simple("k2"), |_: &str| {}).unwrap();

    assert_eq!(
        redirector.authorization_url(false),
        "http://localhost:8080/zauth?key=k2"
    );
}
