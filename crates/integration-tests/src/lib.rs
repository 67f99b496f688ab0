//! Shared fixtures for the end-to-end suites.

use std::sync::Arc;

use actix_web::web;
use rf_api::AppState;
use rf_auth_simple::SimpleAuthProvider;
use rf_core::entities::Payload;
use rf_core::{ForumService, Repos};
use rf_db_memory::MemoryForumRepo;
use serde_json::Value;

pub const TOKEN_SECRET: &str = "integration-secret";

/// Builds a payload from a `json!` object literal.
pub fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("payload fixture must be an object, got {other}"),
    }
}

/// A service over a fresh in-memory store seeded with the usual users.
pub fn memory_forum() -> ForumService {
    let store = Arc::new(MemoryForumRepo::new());
    store.add_user("user-dicoding", "dicoding");
    store.add_user("user-budi", "budi");
    store.add_user("user-sari", "sari");
    ForumService::new(Repos::from_store(store))
}

pub fn app_state(forum: ForumService) -> web::Data<AppState> {
    web::Data::new(AppState {
        forum,
        auth: Box::new(SimpleAuthProvider::new(TOKEN_SECRET)),
    })
}

/// `Authorization` header value for `user_id`.
pub fn bearer(user_id: &str) -> String {
    let token = SimpleAuthProvider::new(TOKEN_SECRET)
        .issue_token(user_id)
        .expect("fixture token");
    format!("Bearer {token}")
}
