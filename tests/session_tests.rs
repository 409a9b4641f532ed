//! Session store refresh, restore and ordering

mod common;

use common::mocks::{user_data, Call, Endpoint, RecordingBackend};
use eduquest_ui::state::{Refresh, TokenStore};
use eduquest_ui::types::{Token, UserDataResponse};
use futures::executor::{block_on, LocalPool};
use futures::task::LocalSpawnExt;
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_restore_without_token_does_nothing() {
    let _owner = common::owner();
    let (session, _tokens) = common::session_store();
    let backend = RecordingBackend::new();

    assert!(block_on(session.restore(&backend)).is_none());
    assert_eq!(backend.call_count(), 0);
}

#[test]
fn test_restore_uses_persisted_user_id() {
    let _owner = common::owner();
    let (session, tokens) = common::session_store();
    tokens
        .save(&Token {
            user_id: 12,
            full_name: "Alan Turing".into(),
            email: "alan@example.com".into(),
        })
        .unwrap();
    let backend = RecordingBackend::new().with_user_data(user_data(12, "Alan Turing", vec![]));

    let outcome = block_on(session.restore(&backend));

    assert_eq!(outcome, Some(Ok(Refresh::Applied)));
    assert_eq!(backend.calls(), vec![Call::FetchUser(12)]);
    assert_eq!(session.user_id_untracked(), Some(12));
}

#[test]
fn test_failed_refresh_keeps_previous_session() {
    let _owner = common::owner();
    let (session, _tokens) = common::session_store();
    let backend = RecordingBackend::new().with_user_data(user_data(5, "Before", vec![]));
    block_on(session.refresh(&backend, 5)).unwrap();

    let failing = RecordingBackend::new().failing(Endpoint::FetchUser);
    assert!(block_on(session.refresh(&failing, 5)).is_err());

    let unknown = RecordingBackend::new().with_user_data(UserDataResponse {
        status: Some(false),
        message: Some("User not found".into()),
        ..Default::default()
    });
    assert!(block_on(session.refresh(&unknown, 5)).is_err());

    assert_eq!(
        session.session_untracked().map(|s| s.user.full_name),
        Some("Before".to_string())
    );
}

#[test]
fn test_stale_refresh_response_is_discarded() {
    let _owner = common::owner();
    let (session, _tokens) = common::session_store();
    let backend = Rc::new(RecordingBackend::new());
    let first_reply = backend.defer_user_data();
    let second_reply = backend.defer_user_data();

    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let mut pool = LocalPool::new();
    for _ in 0..2 {
        let backend = backend.clone();
        let outcomes = outcomes.clone();
        pool.spawner()
            .spawn_local(async move {
                let outcome = session.refresh(backend.as_ref(), 1).await;
                outcomes.borrow_mut().push(outcome);
            })
            .unwrap();
    }
    pool.run_until_stalled();
    assert!(session.is_loading_untracked());

    // The newer request answers first, the older one last
    second_reply.send(Ok(user_data(1, "Newer", vec![]))).unwrap();
    pool.run_until_stalled();
    first_reply.send(Ok(user_data(1, "Older", vec![]))).unwrap();
    pool.run_until_stalled();

    assert_eq!(
        session.session_untracked().map(|s| s.user.full_name),
        Some("Newer".to_string())
    );
    assert!(!session.is_loading_untracked());
    assert_eq!(
        *outcomes.borrow(),
        vec![Ok(Refresh::Applied), Ok(Refresh::Stale)]
    );
}

#[test]
fn test_logout_invalidates_in_flight_refresh() {
    let _owner = common::owner();
    let (session, tokens) = common::session_store();
    tokens
        .save(&Token {
            user_id: 2,
            full_name: "Edsger Dijkstra".into(),
            email: "ewd@example.com".into(),
        })
        .unwrap();
    let backend = Rc::new(RecordingBackend::new());
    let reply = backend.defer_user_data();

    let mut pool = LocalPool::new();
    let spawned = backend.clone();
    pool.spawner()
        .spawn_local(async move {
            let _ = session.refresh(spawned.as_ref(), 2).await;
        })
        .unwrap();
    pool.run_until_stalled();

    session.logout();
    reply.send(Ok(user_data(2, "Edsger Dijkstra", vec![]))).unwrap();
    pool.run_until_stalled();

    assert!(tokens.load().is_none());
    assert!(session.session_untracked().is_none());
}
