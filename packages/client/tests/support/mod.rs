//! Shared fixtures for client integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use sprout_client::{MemoryTokenStore, Session, SproutClient};
use sprout_config::ClientConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::MockServer;

/// Client stack pointed at `server`, with an in-memory session
pub fn client_for(server: &MockServer, token: Option<&str>) -> SproutClient {
    let store = match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    };
    let session = Session::new(Arc::new(store)).unwrap();
    let config = ClientConfig {
        api_url: Url::parse(&server.uri()).unwrap(),
        public_url: Url::parse("http://localhost:3000").unwrap(),
        session_file: PathBuf::from("unused-session.toml"),
        timeout: Duration::from_secs(5),
    };
    SproutClient::with_session(config, session).unwrap()
}

pub fn ana() -> Value {
    json!({
        "name": "Ana",
        "email": "a@x.com",
        "photo": null,
        "is_guest": false
    })
}

pub fn plant_json(id: u64, time_to_water: bool) -> Value {
    json!({
        "id": id,
        "name": format!("plant-{}", id),
        "howOftenWatering": 3,
        "light": "full sun",
        "location": "south_west",
        "species": null,
        "photo_url": null,
        "waterVolume": 0.25,
        "comment": null,
        "userId": 1,
        "is_healthy": true,
        "time_to_water": time_to_water
    })
}

pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}
