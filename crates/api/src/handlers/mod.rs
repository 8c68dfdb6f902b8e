//! Catalog request handlers.
//!
//! - [`accounts`] - Accounts, their status and quotas
//! - [`locations`] - Locations within an account
//! - [`rooms`] - Rooms within a location
//!
//! Every handler validates its request completely before touching the store,
//! then runs at most one coordinator operation per mutation.

pub mod accounts;
pub mod locations;
pub mod rooms;

pub use accounts::{
    activate_account, create_account, delete_account, get_account, get_account_quotas,
    get_account_status, list_accounts, suspend_account, update_account, update_account_quotas,
    update_account_status,
};
pub use locations::{
    create_location, delete_location, get_location, list_locations, update_location,
};
pub use rooms::{create_room, delete_room, get_room, list_rooms, update_room};

use chacer_persistence::StorageError;
use chacer_persistence::core::{CatalogStorage, ListQuery};
use chacer_persistence::types::{Entity, ListOptions};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Fetches one page and the token for the page after it.
///
/// The token is empty unless the page came back full.
async fn fetch_page<S, E>(
    state: &AppState<S>,
    options: &ListOptions,
    query: &ListQuery,
) -> ApiResult<(Vec<E>, String)>
where
    S: CatalogStorage,
    E: Entity,
{
    let items: Vec<E> = state.coordinator().list(query).await?;
    let next_page_token = options
        .next_page_token(state.paginator(), items.len())
        .map_err(StorageError::from)?
        .unwrap_or_default();
    Ok((items, next_page_token))
}

async fn get_existing<S, E>(state: &AppState<S>, name: &str) -> ApiResult<E>
where
    S: CatalogStorage,
    E: Entity,
{
    state
        .coordinator()
        .get::<E>(name)
        .await?
        .ok_or_else(|| ApiError::not_found(name))
}

async fn delete_existing<S, E>(state: &AppState<S>, name: &str) -> ApiResult<E>
where
    S: CatalogStorage,
    E: Entity,
{
    state
        .coordinator()
        .delete::<E>(name)
        .await?
        .ok_or_else(|| ApiError::not_found(name))
}
