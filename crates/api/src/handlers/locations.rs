//! Location handlers.
//!
//! Locations live under an account: `accounts/{account}/locations/{location}`.

use chacer_persistence::core::{CatalogStorage, ListQuery};
use chacer_persistence::name::{self, ParseOptions, ResourcePath};
use chacer_persistence::types::{Account, ListOptions, Location, UpdateOptions};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{
    CreateLocationRequest, DeleteLocationRequest, GetLocationRequest, ListLocationsRequest,
    ListLocationsResponse, UpdateLocationRequest,
};
use crate::validation::{
    ErrorList, FieldPath, parse_name, validate_description, validate_display_name,
    validate_name, validate_page_request, validate_resource_id, validate_update_mask,
};

use super::{delete_existing, fetch_page, get_existing};

/// Lists the locations of one account, or of every account with `accounts/-`.
pub async fn list_locations<S: CatalogStorage>(
    state: &AppState<S>,
    req: ListLocationsRequest,
) -> ApiResult<ListLocationsResponse> {
    debug!(
        parent = %req.parent,
        page_size = req.page_size,
        "Processing list locations request"
    );

    let mut errs = ErrorList::new();
    let parent = validate_name(&mut errs, &FieldPath::new("parent"), &req.parent, |parent| {
        ResourcePath::parse(parent, name::ACCOUNT_COLLECTIONS, ParseOptions::allow_wildcard())
    });
    let page = validate_page_request(
        &mut errs,
        &req,
        state.paginator(),
        state.default_page_size(),
        state.max_page_size(),
    );
    let (Some(parent), Some(page)) = (parent, page) else {
        return Err(errs.into_error());
    };

    let options = ListOptions::new(page.page_size, page.page_info);
    let (locations, next_page_token) =
        fetch_page(state, &options, &ListQuery::children_of(&parent, &options)).await?;

    Ok(ListLocationsResponse {
        locations,
        next_page_token,
    })
}

/// Creates a location under an existing account.
///
/// Without a `location_id` the ID is derived from the display name.
pub async fn create_location<S: CatalogStorage>(
    state: &AppState<S>,
    req: CreateLocationRequest,
) -> ApiResult<Location> {
    debug!(
        parent = %req.parent,
        location_id = %req.location_id,
        "Processing create location request"
    );

    let mut errs = ErrorList::new();
    let parent = validate_name(
        &mut errs,
        &FieldPath::new("parent"),
        &req.parent,
        name::parse_account,
    );
    let path = FieldPath::new("location");
    match &req.location {
        Some(location) => {
            validate_display_name(&mut errs, &path, &location.display_name);
            validate_description(&mut errs, &path, &location.description);
        }
        None => errs.required(&path, "location is required"),
    }

    // Without either field there is no ID to check beyond `location is required`.
    let check_id = req.location.is_some() || !req.location_id.is_empty();
    let location = req.location.unwrap_or_default();
    let location_id = if req.location_id.is_empty() {
        name::slugify(&location.display_name)
    } else {
        req.location_id
    };
    if check_id {
        let id_path = FieldPath::new("location_id");
        validate_resource_id(&mut errs, &id_path, &location_id, "location");
    }

    let Some(parent) = parent else {
        return Err(errs.into_error());
    };
    errs.into_result()?;

    let parent_name = parent.to_string();
    if state.coordinator().get::<Account>(&parent_name).await?.is_none() {
        return Err(ApiError::not_found(parent_name));
    }

    let name = name::build_location(&parent.account, &location_id);
    let self_link = state.self_link(&name);

    let created = state
        .coordinator()
        .create_if_absent(&name, |now| Location {
            name: name.clone(),
            uid: Uuid::new_v4().to_string(),
            self_link,
            display_name: location.display_name,
            description: location.description,
            create_time: now,
            update_time: None,
        })
        .await?;

    created.ok_or_else(|| ApiError::already_exists(&name))
}

pub async fn get_location<S: CatalogStorage>(
    state: &AppState<S>,
    req: GetLocationRequest,
) -> ApiResult<Location> {
    debug!(name = %req.name, "Processing get location request");
    parse_name(&req.name, name::parse_location)?;
    get_existing(state, &req.name).await
}

pub async fn update_location<S: CatalogStorage>(
    state: &AppState<S>,
    req: UpdateLocationRequest,
) -> ApiResult<Location> {
    debug!(mask = ?req.update_mask.paths(), "Processing update location request");

    let mut errs = ErrorList::new();
    let path = FieldPath::new("location");
    match &req.location {
        Some(location) => {
            validate_name(&mut errs, &path.child("name"), &location.name, name::parse_location);
            validate_display_name(&mut errs, &path, &location.display_name);
            validate_description(&mut errs, &path, &location.description);
        }
        None => errs.required(&path, "location is required"),
    }
    validate_update_mask::<Location>(&mut errs, &req.update_mask);
    errs.into_result()?;

    let location = req.location.unwrap_or_default();
    state
        .coordinator()
        .update_masked(&location, &UpdateOptions::new(req.update_mask))
        .await?
        .ok_or_else(|| ApiError::not_found(&location.name))
}

/// Deletes a location and returns it as it was. Rooms below it are kept.
pub async fn delete_location<S: CatalogStorage>(
    state: &AppState<S>,
    req: DeleteLocationRequest,
) -> ApiResult<Location> {
    debug!(name = %req.name, "Processing delete location request");
    parse_name(&req.name, name::parse_location)?;
    delete_existing(state, &req.name).await
}
