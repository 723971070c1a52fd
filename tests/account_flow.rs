use careermatch::application_impl::*;
use careermatch::application_port::*;
use careermatch::client::Client;
use careermatch::domain_model::*;
use careermatch::domain_port::*;
use careermatch::settings::{Api, Log, Settings, Storage};

fn settings(api_backend: &str, storage_backend: &str) -> Settings {
    Settings {
        api: Api {
            backend: api_backend.to_string(),
            base_url: "http://127.0.0.1:8000/api".to_string(),
            login_path: "/login/".to_string(),
            timeout_secs: None,
        },
        storage: Storage {
            backend: storage_backend.to_string(),
            path: String::new(),
        },
        log: Log {
            filter: "info".to_string(),
        },
    }
}

async fn client() -> Client {
    let client = Client::try_new(&settings("fake", "memory")).unwrap();
    client.session_service.bootstrap().await;
    client
}

fn login(username: &str, password: &str) -> LoginInput {
    LoginInput {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn unknown_backends_are_rejected() {
    assert!(Client::try_new(&settings("grpc", "memory")).is_err());
    assert!(Client::try_new(&settings("fake", "cookie")).is_err());
}

#[tokio::test]
async fn admin_lands_on_admin_view() {
    let client = client().await;

    let landing = client
        .account_service
        .sign_in(login("admin", "admin"))
        .await
        .unwrap();

    assert_eq!(landing, Route::Admin);
    assert_eq!(client.navigator.current(), Route::Admin);
    assert!(client.session_service.state().user().unwrap().is_admin());
}

#[tokio::test]
async fn wrong_password_surfaces_to_caller() {
    let client = client().await;

    let err = client
        .account_service
        .sign_in(login("demo", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, AccountError::InvalidCredentials));
    assert_eq!(client.session_service.state(), SessionState::Unauthorized);
}

#[tokio::test]
async fn user_is_kept_out_of_admin_but_not_signed_out() {
    let client = client().await;
    client
        .account_service
        .sign_in(login("demo", "demo"))
        .await
        .unwrap();

    let (route, outcome) = client.visit("/admin");

    assert_eq!(route, Route::Admin);
    assert_eq!(outcome, GuardOutcome::Redirect(Route::Dashboard));
    assert!(client.session_service.state().user().is_some());
    assert_eq!(client.visit("/profile").1, GuardOutcome::Render);
}

#[tokio::test]
async fn authorization_loss_from_any_request_signs_out() {
    let client = client().await;
    client
        .account_service
        .sign_in(login("demo", "demo"))
        .await
        .unwrap();

    let ok = client.api.call(HttpRequest::get("/education/")).await;
    assert!(ok.is_ok());

    // The fake API verifies bearer tokens; a forged one is refused.
    client.session_service.logout();
    client
        .session_service
        .login(CredentialPair::new(forged_access(), "r1"));
    assert!(client.session_service.state().user().is_some());

    let err = client
        .api
        .call(HttpRequest::get("/job-history/"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(client.session_service.state(), SessionState::Unauthorized);
    assert_eq!(client.navigator.current(), Route::Login);
    assert_eq!(client.visit("/dashboard").1, GuardOutcome::Redirect(Route::Login));
}

#[tokio::test]
async fn google_sign_in_creates_a_user() {
    let client = client().await;

    let landing = client
        .account_service
        .sign_in_with_google(GoogleLoginInput {
            token: "google:grace".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(landing, Route::Dashboard);
    assert_eq!(
        client.session_service.state().user().map(|c| c.username.clone()),
        Some("grace".to_string())
    );
}

#[tokio::test]
async fn register_signs_out_first_and_reports_duplicates() {
    let client = client().await;
    client
        .account_service
        .sign_in(login("demo", "demo"))
        .await
        .unwrap();

    let input = RegisterInput {
        username: "ada".to_string(),
        email: "ada@example.com".to_string(),
        password: "analytical".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role: None,
    };
    let account = client
        .account_service
        .register(input.clone())
        .await
        .unwrap();

    assert_eq!(account.username, "ada");
    assert_eq!(account.role, Role::User);
    assert_eq!(client.session_service.state(), SessionState::Unauthorized);
    assert_eq!(client.navigator.current(), Route::Login);

    let err = client.account_service.register(input).await.unwrap_err();
    assert!(matches!(err, AccountError::Rejected { status: 400, .. }));

    let landing = client
        .account_service
        .sign_in(login("ada", "analytical"))
        .await
        .unwrap();
    assert_eq!(landing, Route::Dashboard);
}

#[tokio::test]
async fn visiting_logout_ends_the_session() {
    let client = client().await;
    client
        .account_service
        .sign_in(login("demo", "demo"))
        .await
        .unwrap();

    let (route, outcome) = client.visit("/logout");

    assert_eq!(route, Route::Logout);
    assert_eq!(outcome, GuardOutcome::Redirect(Route::Login));
    assert_eq!(client.navigator.current(), Route::Login);
    assert_eq!(client.session_service.state(), SessionState::Unauthorized);
}

#[tokio::test]
async fn visiting_register_ends_the_session_and_shows_the_form() {
    let client = client().await;
    client
        .account_service
        .sign_in(login("demo", "demo"))
        .await
        .unwrap();

    let (route, outcome) = client.visit("/register/");

    assert_eq!(route, Route::Register);
    assert_eq!(outcome, GuardOutcome::Render);
    assert_eq!(client.navigator.current(), Route::Register);
    assert_eq!(client.session_service.state(), SessionState::Unauthorized);
}

#[tokio::test]
async fn sign_out_returns_to_sign_in() {
    let client = client().await;
    client
        .account_service
        .sign_in(login("demo", "demo"))
        .await
        .unwrap();

    assert_eq!(client.account_service.sign_out(), Route::Login);
    assert_eq!(client.session_service.state(), SessionState::Unauthorized);
}

fn forged_access() -> String {
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
    let claims = serde_json::json!({
        "exp": (chrono::Utc::now() + chrono::Duration::minutes(5)).timestamp(),
        "user_id": 2,
        "username": "demo",
        "role": "user",
    });
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"someone-elses-key"),
    )
    .unwrap()
}
