//! Sign-in and sign-up flows against a mocked backend

use serde_json::json;
use splitalgo_core::{
    Access, CredentialOutcome, ExternalCredential, IdentityProvider, LoginForm, Redirect,
    RegisterForm, Route, Session, check_access,
};
use splitalgo_http::{ApiClient, AuthService, ClientError};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer, session: Session) -> AuthService {
    let client = ApiClient::new(format!("{}/api", server.uri()), session).unwrap();
    AuthService::new(client)
}

fn auth_response(token: &str) -> serde_json::Value {
    json!({
        "access_token": token,
        "token_type": "bearer",
        "user": {"id": "u-1", "email": "alex@example.com", "wallet_address": null}
    })
}

fn register_form() -> RegisterForm {
    RegisterForm {
        first_name: "Alex".to_string(),
        last_name: String::new(),
        email: "alex@example.com".to_string(),
        password: "hunter22".to_string(),
        confirm_password: "hunter22".to_string(),
        accept_terms: true,
    }
}

#[tokio::test]
async fn test_login_stores_session_and_unlocks_protected_pages() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "alex@example.com", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_response("tok-1")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::in_memory();
    let auth = service(&mock_server, session.clone());

    assert_eq!(
        check_access(Route::Dashboard, &session.check()),
        Access::Redirect(Redirect {
            to: Route::Login,
            from: Route::Dashboard,
        })
    );

    let response = auth
        .login(&LoginForm::new(" alex@example.com ", "hunter22"))
        .await
        .unwrap();
    assert_eq!(response.access_token, "tok-1");

    assert_eq!(session.token().as_deref(), Some("tok-1"));
    assert_eq!(session.user().unwrap()["email"], "alex@example.com");
    assert_eq!(check_access(Route::Dashboard, &session.check()), Access::Render);
    assert!(!auth.form().is_busy());
    assert_eq!(auth.form().error(), None);
}

#[tokio::test]
async fn test_register_sends_optional_names_and_stores_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "email": "alex@example.com",
            "password": "hunter22",
            "first_name": "Alex"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_response("tok-new")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = Session::in_memory();
    let auth = service(&mock_server, session.clone());

    auth.register(&register_form()).await.unwrap();
    assert_eq!(session.token().as_deref(), Some("tok-new"));
    assert_eq!(check_access(Route::Groups, &session.check()), Access::Render);
}

#[tokio::test]
async fn test_password_mismatch_never_reaches_the_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_response("tok")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let session = Session::in_memory();
    let auth = service(&mock_server, session.clone());

    let mut form = register_form();
    form.confirm_password = "different".to_string();

    let err = auth.register(&form).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(err.to_string(), "Passwords do not match");
    assert_eq!(auth.form().error().as_deref(), Some("Passwords do not match"));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_terms_must_be_accepted() {
    let mock_server = MockServer::start().await;
    let auth = service(&mock_server, Session::in_memory());

    let mut form = register_form();
    form.accept_terms = false;

    let err = auth.register(&form).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "You must accept the Terms of Service and Privacy Policy"
    );
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_login_surfaces_backend_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
        )
        .mount(&mock_server)
        .await;

    let session = Session::in_memory();
    let auth = service(&mock_server, session.clone());

    let err = auth
        .login(&LoginForm::new("alex@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(auth.form().error().as_deref(), Some("Invalid credentials"));
    assert!(!auth.form().is_busy());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_retry_clears_previous_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_response("tok-2")))
        .mount(&mock_server)
        .await;

    let auth = service(&mock_server, Session::in_memory());
    auth.form().set_error(Some("Invalid credentials".to_string()));

    auth.login(&LoginForm::new("alex@example.com", "hunter22"))
        .await
        .unwrap();
    assert_eq!(auth.form().error(), None);
}

#[tokio::test]
async fn test_logout_locks_protected_pages_again() {
    let mock_server = MockServer::start().await;
    let session = Session::in_memory();
    session.establish("tok-1", &json!({"id": "u-1"}));

    let auth = service(&mock_server, session.clone());
    assert_eq!(check_access(Route::Dashboard, &session.check()), Access::Render);

    auth.logout();

    assert!(session.token().is_none());
    assert!(session.user().is_none());
    assert!(matches!(
        check_access(Route::Dashboard, &session.check()),
        Access::Redirect(_)
    ));
    assert_eq!(check_access(Route::Home, &session.check()), Access::Render);
}

#[tokio::test]
async fn test_external_credential_leaves_session_untouched() {
    let mock_server = MockServer::start().await;
    let session = Session::in_memory();
    let auth = service(&mock_server, session.clone());

    let credential = ExternalCredential::new(IdentityProvider::Google, "eyJhbGciOi.payload.sig");
    assert_eq!(
        auth.external_credential(&credential),
        CredentialOutcome::NotForwarded
    );
    assert!(!session.is_authenticated());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}
