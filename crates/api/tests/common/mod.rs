//! Shared helpers for the handler integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chacer_api::error::{ApiError, Code};
use chacer_api::types::{CreateAccountRequest, CreateLocationRequest, CreateRoomRequest};
use chacer_api::{AppState, ServerConfig, handlers};
use chacer_persistence::backends::sqlite::SqliteBackend;
use chacer_persistence::types::{Account, Location, Paginator, Room};

pub type TestState = AppState<SqliteBackend>;

/// Creates state over a fresh in-memory database.
pub fn create_state() -> TestState {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    AppState::new(
        Arc::new(backend),
        Paginator::random(),
        ServerConfig::for_testing(),
    )
}

pub async fn create_account(state: &TestState, account_id: &str) -> Account {
    handlers::create_account(
        state,
        CreateAccountRequest {
            account_id: account_id.to_string(),
            account: Some(Account {
                display_name: format!("Account {account_id}"),
                ..Default::default()
            }),
        },
    )
    .await
    .expect("account should be created")
}

pub async fn create_location(state: &TestState, parent: &str, location_id: &str) -> Location {
    handlers::create_location(
        state,
        CreateLocationRequest {
            parent: parent.to_string(),
            location_id: location_id.to_string(),
            location: Some(Location {
                display_name: format!("Location {location_id}"),
                ..Default::default()
            }),
        },
    )
    .await
    .expect("location should be created")
}

pub async fn create_room(state: &TestState, parent: &str, room_id: &str) -> Room {
    handlers::create_room(
        state,
        CreateRoomRequest {
            parent: parent.to_string(),
            room_id: room_id.to_string(),
            room: Some(Room {
                display_name: format!("Room {room_id}"),
                ..Default::default()
            }),
        },
    )
    .await
    .expect("room should be created")
}

/// Asserts that `err` is an invalid-argument error with a violation on `field`.
pub fn assert_violation(err: &ApiError, field: &str) {
    assert_eq!(err.code(), Code::InvalidArgument, "unexpected error: {err:?}");
    assert!(
        err.violations().iter().any(|v| v.field == field),
        "expected a violation on {}, got {:?}",
        field,
        err.violations()
    );
}
