mod support;

use multik8s_common::{AuthStatus, ConsoleError};
use multik8s_console_lib::{Shell, View};
use support::{admin, FakeApi};

#[tokio::test]
async fn test_shell_starts_loading_then_shows_login() {
    let api = FakeApi::new();
    let mut shell = Shell::new(api.clone());
    assert_eq!(shell.view(), View::Loading);

    shell.check_session().await;
    assert_eq!(shell.view(), View::Login);
    assert!(shell.user().is_none());
}

#[tokio::test]
async fn test_existing_session_goes_straight_to_list() {
    let api = FakeApi::new();
    api.set_auth(Ok(AuthStatus {
        authenticated: true,
        user: Some(admin()),
    }));

    let mut shell = Shell::new(api.clone());
    shell.check_session().await;
    assert_eq!(shell.view(), View::ClusterList);
    assert_eq!(shell.user(), Some(&admin()));
}

#[tokio::test]
async fn test_failed_session_check_means_signed_out() {
    let api = FakeApi::new();
    api.set_auth(Err(ConsoleError::Transport("connection refused".to_string())));

    let mut shell = Shell::new(api.clone());
    shell.check_session().await;
    assert_eq!(shell.view(), View::Login);
}

#[tokio::test]
async fn test_authenticated_flag_wins_over_user_payload() {
    let api = FakeApi::new();
    api.set_auth(Ok(AuthStatus {
        authenticated: false,
        user: Some(admin()),
    }));

    let mut shell = Shell::new(api.clone());
    shell.check_session().await;
    assert_eq!(shell.view(), View::Login);
}

#[tokio::test]
async fn test_view_transitions() {
    let api = FakeApi::new();
    let mut shell = Shell::new(api.clone());
    shell.check_session().await;

    // The form is unreachable without a user.
    shell.open_create_form();
    assert_eq!(shell.view(), View::Login);

    shell.on_login(admin());
    assert_eq!(shell.view(), View::ClusterList);

    shell.open_create_form();
    assert_eq!(shell.view(), View::ClusterForm);
    shell.close_create_form();
    assert_eq!(shell.view(), View::ClusterList);

    shell.open_create_form();
    shell.on_logout();
    assert_eq!(shell.view(), View::Login);

    shell.on_login(admin());
    assert_eq!(shell.view(), View::ClusterList);
}
