mod support;

use multik8s_common::{ConsoleError, Credentials, NETWORK_ERROR_MESSAGE};
use multik8s_console_lib::login::{LOGIN_FAILED_MESSAGE, MISSING_CREDENTIALS_MESSAGE};
use multik8s_console_lib::LoginForm;
use support::{admin, server_error, Call, FakeApi};

#[tokio::test]
async fn test_empty_fields_never_reach_backend() {
    let api = FakeApi::new();
    let mut form = LoginForm::new();
    form.username = "alice".to_string();

    assert!(form.submit(api.as_ref()).await.is_none());
    assert_eq!(form.error(), Some(MISSING_CREDENTIALS_MESSAGE));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_successful_login_returns_user() {
    let api = FakeApi::new();
    api.set_login(Ok(admin()));

    let mut form = LoginForm::new();
    form.username = "alice".to_string();
    form.password = "secret".to_string();

    let user = form.submit(api.as_ref()).await;
    assert_eq!(user, Some(admin()));
    assert_eq!(form.error(), None);
    assert!(!form.is_submitting());
    assert_eq!(
        api.calls(),
        vec![Call::Login(Credentials {
            username: "alice".to_string(),
            password: "secret".to_string(),
        })]
    );
}

#[tokio::test]
async fn test_rejected_login_shows_server_message_and_keeps_input() {
    let api = FakeApi::new();
    api.set_login(Err(server_error(401, "Invalid credentials")));

    let mut form = LoginForm::new();
    form.username = "alice".to_string();
    form.password = "wrong".to_string();

    assert!(form.submit(api.as_ref()).await.is_none());
    assert_eq!(form.error(), Some("Invalid credentials"));
    assert_eq!(form.username, "alice");
    assert_eq!(form.password, "wrong");
    assert!(!form.is_submitting());
}

#[tokio::test]
async fn test_login_error_fallbacks() {
    let api = FakeApi::new();
    let mut form = LoginForm::new();
    form.username = "alice".to_string();
    form.password = "secret".to_string();

    api.set_login(Err(ConsoleError::Server {
        status: 500,
        message: None,
    }));
    form.submit(api.as_ref()).await;
    assert_eq!(form.error(), Some(LOGIN_FAILED_MESSAGE));

    api.set_login(Err(ConsoleError::Transport("connection reset".to_string())));
    form.submit(api.as_ref()).await;
    assert_eq!(form.error(), Some(NETWORK_ERROR_MESSAGE));
}

#[test]
fn test_single_submission_in_flight() {
    let mut form = LoginForm::new();
    form.username = "alice".to_string();
    form.password = "secret".to_string();

    assert!(form.begin_submit().is_some());
    assert!(form.is_submitting());
    assert!(form.begin_submit().is_none());

    form.finish_submit(Ok(admin()));
    assert!(form.begin_submit().is_some());
}
