//! Guest access code exchange against a mocked API

mod support;

use pretty_assertions::assert_eq;
use serde_json::json;
use sprout_client::{ClientError, GuestFailure, GuestState, Route};
use std::time::Duration;
use support::{ana, client_for, request_count};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_authorize(server: &MockServer, code: &str, guest_token: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/access-tokens/authorize/{}", code)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "guest_token": guest_token })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_code_without_session_stores_guest_token_and_redirects() {
    let server = MockServer::start().await;
    mount_authorize(&server, "abc123", "g-1").await;

    let client = client_for(&server, None);
    let mut flow = client.guest_authorization();

    let state = flow.run(Some("abc123")).await.unwrap().clone();

    assert_eq!(
        state,
        GuestState::Authorized {
            guest_token: "g-1".into()
        }
    );
    assert_eq!(client.session.token(), Some("g-1".to_string()));
    assert_eq!(state.redirect(), Some(Route::MyPlants));
    assert_eq!(Route::MyPlants.path(), "/my-plants");
}

#[tokio::test]
async fn test_repeat_authorization_is_idempotent() {
    let server = MockServer::start().await;
    mount_authorize(&server, "abc123", "g-1").await;

    let first = client_for(&server, None);
    first.guest_authorization().run(Some("abc123")).await.unwrap();

    let second = client_for(&server, None);
    second.guest_authorization().run(Some("abc123")).await.unwrap();

    assert_eq!(first.session.token(), Some("g-1".to_string()));
    assert_eq!(first.session.token(), second.session.token());
}

#[tokio::test]
async fn test_missing_code_makes_no_requests() {
    let server = MockServer::start().await;
    let client = client_for(&server, None);
    let mut flow = client.guest_authorization();

    assert_eq!(flow.run(None).await.unwrap(), &GuestState::AwaitingCode);
    assert_eq!(request_count(&server).await, 0);

    // The router catches up on a later pass
    mount_authorize(&server, "abc123", "g-1").await;
    assert!(matches!(
        flow.run(Some("abc123")).await.unwrap(),
        GuestState::Authorized { .. }
    ));
}

#[tokio::test]
async fn test_existing_session_is_kept_until_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer owner-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ana()))
        .mount(&server)
        .await;
    mount_authorize(&server, "abc123", "g-1").await;

    let client = client_for(&server, Some("owner-token"));
    let mut flow = client.guest_authorization();

    let state = flow.run(Some("abc123")).await.unwrap().clone();
    assert!(state.needs_user_input());
    assert_eq!(
        state.confirmation_prompt().unwrap(),
        "You are logged in as Ana; continuing will log you out and log you in as a guest."
    );
    assert_eq!(client.session.token(), Some("owner-token".to_string()));

    // Running again without an answer changes nothing
    flow.settle().await.unwrap();
    assert_eq!(client.session.token(), Some("owner-token".to_string()));

    flow.confirm_override().unwrap();
    let state = flow.settle().await.unwrap();
    assert_eq!(
        state,
        &GuestState::Authorized {
            guest_token: "g-1".into()
        }
    );
    assert_eq!(client.session.token(), Some("g-1".to_string()));
}

#[tokio::test]
async fn test_declining_override_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ana()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/access-tokens/authorize/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "guest_token": "g-1" })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("owner-token"));
    let mut flow = client.guest_authorization();
    flow.run(Some("abc123")).await.unwrap();

    let state = flow.decline_override().unwrap();
    assert_eq!(
        state,
        &GuestState::Failed {
            code: "abc123".into(),
            failure: GuestFailure::OverrideDeclined
        }
    );
    assert_eq!(client.session.token(), Some("owner-token".to_string()));
}

#[tokio::test]
async fn test_stale_session_is_replaced_without_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    mount_authorize(&server, "abc123", "g-1").await;

    let client = client_for(&server, Some("expired"));
    let mut flow = client.guest_authorization();

    let state = flow.run(Some("abc123")).await.unwrap();
    assert!(matches!(state, GuestState::Authorized { .. }));
    assert_eq!(client.session.token(), Some("g-1".to_string()));
}

#[tokio::test]
async fn test_stale_session_already_resolved_is_replaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    mount_authorize(&server, "abc123", "g-1").await;

    let client = client_for(&server, Some("expired"));

    // A gated page ran first and cached the failed lookup
    let outcome = client.gate.require_user().await;
    assert_eq!(outcome.redirect_target(), Some(&Route::Login));
    assert_eq!(client.session.token(), Some("expired".to_string()));

    let mut flow = client.guest_authorization();
    let state = tokio::time::timeout(Duration::from_secs(5), flow.run(Some("abc123")))
        .await
        .expect("guest flow did not settle")
        .unwrap()
        .clone();

    assert_eq!(
        state,
        GuestState::Authorized {
            guest_token: "g-1".into()
        }
    );
    assert_eq!(client.session.token(), Some("g-1".to_string()));
}

#[tokio::test]
async fn test_unreachable_server_never_drops_session() {
    let server = MockServer::start().await;
    let client = client_for(&server, Some("owner-token"));
    drop(server);

    let mut flow = client.guest_authorization();
    let state = flow.run(Some("abc123")).await.unwrap();

    assert!(matches!(
        state,
        GuestState::Failed {
            failure: GuestFailure::Session(ClientError::Network(_)),
            ..
        }
    ));
    assert_eq!(client.session.token(), Some("owner-token".to_string()));
}

#[tokio::test]
async fn test_rejected_code_fails_and_can_be_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/access-tokens/authorize/abc123"))
        .respond_with(ResponseTemplate::new(404).set_body_string("unknown code"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_authorize(&server, "abc123", "g-2").await;

    let client = client_for(&server, None);
    let mut flow = client.guest_authorization();

    let state = flow.run(Some("abc123")).await.unwrap().clone();
    assert_eq!(
        state,
        GuestState::Failed {
            code: "abc123".into(),
            failure: GuestFailure::Exchange(ClientError::Http {
                status: 404,
                body: "unknown code".into()
            })
        }
    );
    assert_eq!(client.session.token(), None);

    flow.retry().await.unwrap();
    let state = flow.settle().await.unwrap();
    assert_eq!(
        state,
        &GuestState::Authorized {
            guest_token: "g-2".into()
        }
    );
}

#[tokio::test]
async fn test_expired_code_is_an_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/access-tokens/authorize/old"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let mut flow = client.guest_authorization();
    let state = flow.run(Some("old")).await.unwrap();

    match state {
        GuestState::Failed {
            failure: GuestFailure::Exchange(err),
            ..
        } => assert!(err.is_auth_error()),
        other => panic!("unexpected state {:?}", other),
    }
}
