//! Request shapes and error mapping of the REST client

mod support;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use sprout_client::api::{FertilisingRequest, Light, Location, PlantRequest};
use sprout_client::ClientError;
use support::{ana, client_for, plant_json, request_count};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_stores_access_token_and_uses_it() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "email": "a@x.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access_token": "t-9" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("authorization", "Bearer t-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ana()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    client.api.login("a@x.com", "hunter22").await.unwrap();

    assert_eq!(client.session.token(), Some("t-9".to_string()));
    assert_eq!(client.api.me().await.unwrap().name, "Ana");

    client.api.logout().unwrap();
    assert_eq!(client.session.token(), None);
}

#[tokio::test]
async fn test_failed_login_leaves_session_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let err = client.api.login("a@x.com", "wrong").await.unwrap_err();

    assert!(err.is_auth_error());
    assert!(!client.session.is_present());
}

#[tokio::test]
async fn test_requests_without_token_carry_no_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/register"))
        .and(body_json(json!({
            "name": "Ana",
            "email": "a@x.com",
            "password": "hunter22"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    client
        .api
        .register("Ana", "a@x.com", "hunter22")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_access_grant_lifecycle_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/access-tokens"))
        .and(header("authorization", "Bearer owner"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 4,
            "token": "abc123",
            "nameToken": "Neighbour",
            "userId": 1,
            "startDate": "2024-05-01T10:00:00.000Z",
            "endDate": "2024-05-14T10:00:00.000Z"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/access-tokens"))
        .and(body_json(json!({
            "guest_name": "Neighbour",
            "end_date": "2024-05-14T10:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/access-tokens"))
        .and(body_json(json!({ "token_id": 4 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("owner"));

    let grants = client.api.access_grants().await.unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].token, "abc123");

    let end = Utc.with_ymd_and_hms(2024, 5, 14, 10, 0, 0).unwrap();
    client.api.create_access_grant("Neighbour", end).await.unwrap();
    client.api.revoke_access_grant(4).await.unwrap();
}

#[tokio::test]
async fn test_plant_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/my-plants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([plant_json(5, true)])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/my-plants/5/watering"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/my-plants/5/fertilizing"))
        .and(body_json(json!({ "type": "nitrogen", "quantity": 2.5 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/my-plants/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("owner"));

    let plants = client.api.my_plants().await.unwrap();
    assert_eq!(plants[0].location, Location::SouthWest);

    client.api.water_plant(5).await.unwrap();
    client
        .api
        .log_fertilising(
            5,
            &FertilisingRequest {
                kind: "nitrogen".into(),
                quantity: 2.5,
            },
        )
        .await
        .unwrap();
    client.api.delete_plant(5).await.unwrap();
}

#[tokio::test]
async fn test_invalid_plant_form_is_not_sent() {
    let server = MockServer::start().await;
    let client = client_for(&server, Some("owner"));

    let request = PlantRequest {
        name: "x".repeat(150),
        photo: None,
        how_often_watering: 3,
        water_volume: 1.0,
        light: Light::FullSun,
        location: Location::East,
        comment: None,
        species: None,
    };
    let err = client.api.create_plant(&request).await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_schema_mismatch_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/my-plants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "seven" }])))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("owner"));
    let err = client.api.my_plants().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_profile_rejects_bad_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "Ana",
            "email": "not-an-email",
            "photo": null
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Some("owner"));
    assert!(matches!(
        client.api.profile().await,
        Err(ClientError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_guest_code_is_path_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/access-tokens/authorize/a%20b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "guest_token": "g-3" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    assert_eq!(client.api.authorize_guest("a b").await.unwrap(), "g-3");
}

#[tokio::test]
async fn test_photo_upload_checks_type_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/plant"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "filename": "fern.png", "user_id": 1 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let gif = dir.path().join("fern.gif");
    std::fs::write(&gif, b"GIF89a").unwrap();
    let png = dir.path().join("fern.png");
    std::fs::write(&png, b"\x89PNG\r\n").unwrap();

    let client = client_for(&server, Some("owner"));
    assert!(matches!(
        client.api.upload_plant_photo(&gif).await,
        Err(ClientError::Validation(_))
    ));

    let uploaded = client.api.upload_plant_photo(&png).await.unwrap();
    assert_eq!(uploaded.filename, "fern.png");
}
