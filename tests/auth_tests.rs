//! Signup and login flows against a recording backend

mod common;

use common::mocks::{login_ok, user_data, Call, Endpoint, RecordingBackend};
use eduquest_ui::auth::{self, SignupForm, MISSING_FIELDS_MESSAGE, PASSWORD_POLICY_MESSAGE};
use eduquest_ui::error::ClientError;
use eduquest_ui::state::TokenStore;
use eduquest_ui::types::{LoginResponse, SignupResponse, Token};
use futures::executor::block_on;
use rstest::rstest;

fn form(password: &str) -> SignupForm {
    SignupForm {
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: "ada@example.com".into(),
        password: password.into(),
    }
}

#[rstest]
#[case("short1!")]
#[case("alllowercase1!")]
#[case("NoDigits!!")]
#[case("NoSpecial123")]
#[case("Has Space1!")]
fn test_signup_policy_violation_sends_nothing(#[case] password: &str) {
    let backend = RecordingBackend::new();
    let result = block_on(auth::signup(&backend, &form(password)));

    assert_eq!(
        result,
        Err(ClientError::Validation(PASSWORD_POLICY_MESSAGE.to_string()))
    );
    assert_eq!(backend.call_count(), 0);
}

#[test]
fn test_signup_missing_field_sends_nothing() {
    let backend = RecordingBackend::new();
    let mut incomplete = form("Passw0rd!");
    incomplete.last_name.clear();

    let result = block_on(auth::signup(&backend, &incomplete));

    assert_eq!(
        result,
        Err(ClientError::Validation(MISSING_FIELDS_MESSAGE.to_string()))
    );
    assert_eq!(backend.call_count(), 0);
}

#[test]
fn test_signup_success_joins_names() {
    let backend = RecordingBackend::new().with_signup(SignupResponse {
        message: Some("User created successfully".into()),
        user_id: Some(3),
    });

    block_on(auth::signup(&backend, &form("Passw0rd!"))).unwrap();

    match backend.calls().as_slice() {
        [Call::Signup(req)] => {
            assert_eq!(req.full_name, "Ada Lovelace");
            assert_eq!(req.email, "ada@example.com");
        }
        other => panic!("unexpected calls {other:?}"),
    }
}

#[test]
fn test_signup_other_message_is_surfaced_verbatim() {
    let backend = RecordingBackend::new().with_signup(SignupResponse {
        message: Some("Email already registered".into()),
        user_id: None,
    });

    let result = block_on(auth::signup(&backend, &form("Passw0rd!")));

    assert_eq!(
        result,
        Err(ClientError::Rejected("Email already registered".into()))
    );
}

#[test]
fn test_login_persists_token_and_populates_session() {
    let _owner = common::owner();
    let (session, tokens) = common::session_store();
    let backend = RecordingBackend::new()
        .with_login(login_ok(7, "Ada Lovelace"))
        .with_user_data(user_data(7, "Ada Lovelace", vec![]));

    let token = block_on(auth::login(&backend, &session, "ada@example.com", "Passw0rd!")).unwrap();

    assert_eq!(
        token,
        Token {
            user_id: 7,
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
        }
    );
    assert_eq!(tokens.load(), Some(token.clone()));
    assert_eq!(session.user_id_untracked(), Some(token.user_id));
    assert_eq!(
        session.session_untracked().map(|s| s.user.full_name),
        Some("Ada Lovelace".to_string())
    );
    assert_eq!(backend.calls().last(), Some(&Call::FetchUser(7)));
}

#[test]
fn test_login_rejection_keeps_backend_message() {
    let _owner = common::owner();
    let (session, tokens) = common::session_store();
    let backend = RecordingBackend::new().with_login(LoginResponse {
        status: false,
        message: Some("Incorrect password".into()),
        ..Default::default()
    });

    let result = block_on(auth::login(&backend, &session, "ada@example.com", "wrong"));

    assert_eq!(result, Err(ClientError::Rejected("Incorrect password".into())));
    assert!(tokens.load().is_none());
    assert!(session.session_untracked().is_none());
    assert_eq!(backend.call_count(), 1);
}

#[test]
fn test_login_survives_failed_session_fetch() {
    let _owner = common::owner();
    let (session, tokens) = common::session_store();
    let backend = RecordingBackend::new()
        .with_login(login_ok(9, "Grace Hopper"))
        .failing(Endpoint::FetchUser);

    let token = block_on(auth::login(&backend, &session, "grace@example.com", "Passw0rd!")).unwrap();

    assert_eq!(token.user_id, 9);
    assert_eq!(tokens.load().map(|t| t.user_id), Some(9));
    assert!(session.session_untracked().is_none());
    // Falls back to the persisted token
    assert_eq!(session.user_id_untracked(), Some(9));
}
