//! Paging through list handlers.

#![cfg(feature = "sqlite")]

mod common;

use std::collections::HashSet;

use chacer_api::handlers;
use chacer_api::types::{ListAccountsRequest, ListLocationsRequest, ListRoomsRequest};

use common::{
    TestState, assert_violation, create_account, create_location, create_room, create_state,
};

fn list_locations_request(parent: &str, page_size: i32, page_token: &str) -> ListLocationsRequest {
    ListLocationsRequest {
        parent: parent.to_string(),
        page_size,
        page_token: page_token.to_string(),
        ..Default::default()
    }
}

async fn seed_locations(state: &TestState) {
    create_account(state, "acme").await;
    create_account(state, "zeta").await;
    for id in ["east", "west", "north", "south", "main"] {
        create_location(state, "accounts/acme", id).await;
    }
    create_location(state, "accounts/zeta", "depot").await;
}

#[tokio::test]
async fn test_token_only_when_page_is_full() {
    let state = create_state();
    seed_locations(&state).await;

    let first = handlers::list_locations(&state, list_locations_request("accounts/acme", 2, ""))
        .await
        .unwrap();
    assert_eq!(first.locations.len(), 2);
    assert!(!first.next_page_token.is_empty());

    let second = handlers::list_locations(
        &state,
        list_locations_request("accounts/acme", 2, &first.next_page_token),
    )
    .await
    .unwrap();
    assert_eq!(second.locations.len(), 2);

    let third = handlers::list_locations(
        &state,
        list_locations_request("accounts/acme", 2, &second.next_page_token),
    )
    .await
    .unwrap();
    assert_eq!(third.locations.len(), 1);
    assert!(third.next_page_token.is_empty());

    let names: Vec<String> = first
        .locations
        .iter()
        .chain(&second.locations)
        .chain(&third.locations)
        .map(|l| l.name.clone())
        .collect();
    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(unique.len(), 5);
    assert!(names.iter().all(|n| n.starts_with("accounts/acme/")));

    // Rows come back in resource ID order.
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn test_zero_page_size_uses_default() {
    let state = create_state();
    for i in 0..12 {
        create_account(&state, &format!("acct{i:02}")).await;
    }

    let page = handlers::list_accounts(&state, ListAccountsRequest::default())
        .await
        .unwrap();
    assert_eq!(page.accounts.len(), 10);
    assert!(!page.next_page_token.is_empty());

    let rest = handlers::list_accounts(
        &state,
        ListAccountsRequest {
            page_size: 0,
            page_token: page.next_page_token,
        },
    )
    .await
    .unwrap();
    assert_eq!(rest.accounts.len(), 2);
    assert!(rest.next_page_token.is_empty());
}

#[tokio::test]
async fn test_wildcard_parent_lists_every_account() {
    let state = create_state();
    seed_locations(&state).await;

    let all = handlers::list_locations(&state, list_locations_request("accounts/-", 50, ""))
        .await
        .unwrap();
    assert_eq!(all.locations.len(), 6);
    assert!(all.next_page_token.is_empty());
}

#[tokio::test]
async fn test_changing_parent_between_pages_is_rejected() {
    let state = create_state();
    seed_locations(&state).await;

    let first = handlers::list_locations(&state, list_locations_request("accounts/acme", 2, ""))
        .await
        .unwrap();

    let err = handlers::list_locations(
        &state,
        list_locations_request("accounts/zeta", 2, &first.next_page_token),
    )
    .await
    .unwrap_err();
    assert_violation(&err, "parent");
    assert_eq!(
        err.violations()[0].description,
        "parent must not be changed during pagination query"
    );
}

#[tokio::test]
async fn test_changing_filter_or_order_is_rejected() {
    let state = create_state();
    seed_locations(&state).await;

    let first = handlers::list_locations(&state, list_locations_request("accounts/acme", 2, ""))
        .await
        .unwrap();

    let err = handlers::list_locations(
        &state,
        ListLocationsRequest {
            filter: "display_name=HQ".to_string(),
            order: "name desc".to_string(),
            ..list_locations_request("accounts/acme", 2, &first.next_page_token)
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.violations().len(), 2);
    assert_violation(&err, "filter");
    assert_violation(&err, "order");
}

#[tokio::test]
async fn test_bad_page_token_and_size() {
    let state = create_state();
    create_account(&state, "acme").await;

    let err = handlers::list_locations(
        &state,
        list_locations_request("accounts/acme", 2, "bm90IGEgdG9rZW4="),
    )
    .await
    .unwrap_err();
    assert_violation(&err, "page_token");
    assert_eq!(err.violations()[0].description, "invalid page_token provided");

    let err = handlers::list_locations(&state, list_locations_request("accounts/acme", 101, ""))
        .await
        .unwrap_err();
    assert_violation(&err, "page_size");
    assert_eq!(
        err.violations()[0].description,
        "page_size must be between 0 and 100 inclusive"
    );
}

#[tokio::test]
async fn test_list_parent_validation() {
    let state = create_state();

    let err = handlers::list_locations(&state, list_locations_request("accounts/a", -1, ""))
        .await
        .unwrap_err();
    assert_eq!(err.violations().len(), 2);
    assert_violation(&err, "parent");
    assert_violation(&err, "page_size");

    let err = handlers::list_rooms(
        &state,
        ListRoomsRequest {
            parent: "accounts/acme".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_violation(&err, "parent");
}

#[tokio::test]
async fn test_list_rooms_across_locations() {
    let state = create_state();
    create_account(&state, "acme").await;
    create_location(&state, "accounts/acme", "east").await;
    create_location(&state, "accounts/acme", "west").await;
    create_room(&state, "accounts/acme/locations/east", "lobby").await;
    create_room(&state, "accounts/acme/locations/east", "kitchen").await;
    create_room(&state, "accounts/acme/locations/west", "lobby").await;

    let east = handlers::list_rooms(
        &state,
        ListRoomsRequest {
            parent: "accounts/acme/locations/east".to_string(),
            page_size: 10,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    let names: Vec<&str> = east.rooms.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "accounts/acme/locations/east/rooms/kitchen",
            "accounts/acme/locations/east/rooms/lobby",
        ]
    );

    let everywhere = handlers::list_rooms(
        &state,
        ListRoomsRequest {
            parent: "accounts/-/locations/-".to_string(),
            page_size: 10,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(everywhere.rooms.len(), 3);
}
