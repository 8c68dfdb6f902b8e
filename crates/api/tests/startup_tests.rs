//! Building the application state from configuration.

#![cfg(feature = "sqlite")]

use base64::{Engine, engine::general_purpose::STANDARD};

use chacer_api::types::{CreateAccountRequest, GetAccountRequest, ListAccountsRequest};
use chacer_api::{InitError, ServerConfig, build_state, handlers};

fn file_config(dir: &tempfile::TempDir) -> ServerConfig {
    ServerConfig {
        database_url: dir.path().join("catalog.db").to_string_lossy().into_owned(),
        page_token_secret: Some(STANDARD.encode([3u8; 32])),
        ..ServerConfig::for_testing()
    }
}

#[tokio::test]
async fn test_file_database_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let state = build_state(file_config(&dir)).unwrap();
    handlers::create_account(
        &state,
        CreateAccountRequest {
            account_id: "acme".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    handlers::create_account(
        &state,
        CreateAccountRequest {
            account_id: "acme".to_string(),
            account: Some(Default::default()),
        },
    )
    .await
    .unwrap();
    drop(state);

    let state = build_state(file_config(&dir)).unwrap();
    let account = handlers::get_account(
        &state,
        GetAccountRequest {
            name: "accounts/acme".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(account.name, "accounts/acme");
}

#[tokio::test]
async fn test_configured_secret_keeps_tokens_valid_across_states() {
    let dir = tempfile::tempdir().unwrap();
    let first = build_state(file_config(&dir)).unwrap();
    for id in ["acme", "beta", "gamma"] {
        handlers::create_account(
            &first,
            CreateAccountRequest {
                account_id: id.to_string(),
                account: Some(Default::default()),
            },
        )
        .await
        .unwrap();
    }

    let page = handlers::list_accounts(
        &first,
        ListAccountsRequest {
            page_size: 2,
            page_token: String::new(),
        },
    )
    .await
    .unwrap();

    let second = build_state(file_config(&dir)).unwrap();
    let rest = handlers::list_accounts(
        &second,
        ListAccountsRequest {
            page_size: 2,
            page_token: page.next_page_token,
        },
    )
    .await
    .unwrap();
    assert_eq!(rest.accounts.len(), 1);
    assert_eq!(rest.accounts[0].name, "accounts/gamma");
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = ServerConfig {
        default_page_size: 0,
        ..ServerConfig::for_testing()
    };
    match build_state(config) {
        Err(InitError::Config(errors)) => assert_eq!(errors.len(), 1),
        other => panic!("expected a configuration error, got {:?}", other.err()),
    }
}
