//! Room handlers.
//!
//! Rooms live under a location:
//! `accounts/{account}/locations/{location}/rooms/{room}`.

use chacer_persistence::core::{CatalogStorage, ListQuery};
use chacer_persistence::name::{self, ParseOptions, ResourcePath};
use chacer_persistence::types::{ListOptions, Location, Room, UpdateOptions};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{
    CreateRoomRequest, DeleteRoomRequest, GetRoomRequest, ListRoomsRequest, ListRoomsResponse,
    UpdateRoomRequest,
};
use crate::validation::{
    ErrorList, FieldPath, parse_name, validate_description, validate_display_name,
    validate_name, validate_page_request, validate_resource_id, validate_update_mask,
};

use super::{delete_existing, fetch_page, get_existing};

/// Lists the rooms of a location. Either parent ID may be `-`.
pub async fn list_rooms<S: CatalogStorage>(
    state: &AppState<S>,
    req: ListRoomsRequest,
) -> ApiResult<ListRoomsResponse> {
    debug!(
        parent = %req.parent,
        page_size = req.page_size,
        "Processing list rooms request"
    );

    let mut errs = ErrorList::new();
    let parent = validate_name(&mut errs, &FieldPath::new("parent"), &req.parent, |parent| {
        ResourcePath::parse(parent, name::LOCATION_COLLECTIONS, ParseOptions::allow_wildcard())
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
    let (rooms, next_page_token) =
        fetch_page(state, &options, &ListQuery::children_of(&parent, &options)).await?;

    Ok(ListRoomsResponse {
        rooms,
        next_page_token,
    })
}

/// Creates `{parent}/rooms/{room_id}` under an existing location.
pub async fn create_room<S: CatalogStorage>(
    state: &AppState<S>,
    req: CreateRoomRequest,
) -> ApiResult<Room> {
    debug!(
        parent = %req.parent,
        room_id = %req.room_id,
        "Processing create room request"
    );

    let mut errs = ErrorList::new();
    let parent = validate_name(
        &mut errs,
        &FieldPath::new("parent"),
        &req.parent,
        name::parse_location,
    );
    validate_resource_id(&mut errs, &FieldPath::new("room_id"), &req.room_id, "room");
    let path = FieldPath::new("room");
    match &req.room {
        Some(room) => {
            validate_display_name(&mut errs, &path, &room.display_name);
            validate_description(&mut errs, &path, &room.description);
        }
        None => errs.required(&path, "room is required"),
    }
    let Some(parent) = parent else {
        return Err(errs.into_error());
    };
    errs.into_result()?;

    let parent_name = parent.to_string();
    if state.coordinator().get::<Location>(&parent_name).await?.is_none() {
        return Err(ApiError::not_found(parent_name));
    }

    let room = req.room.unwrap_or_default();
    let name = name::build_room(&parent.account, &parent.location, &req.room_id);
    let self_link = state.self_link(&name);

    let created = state
        .coordinator()
        .create_if_absent(&name, |now| Room {
            name: name.clone(),
            uid: Uuid::new_v4().to_string(),
            self_link,
            display_name: room.display_name,
            description: room.description,
            create_time: now,
            update_time: None,
        })
        .await?;

    created.ok_or_else(|| ApiError::already_exists(&name))
}

pub async fn get_room<S: CatalogStorage>(
    state: &AppState<S>,
    req: GetRoomRequest,
) -> ApiResult<Room> {
    debug!(name = %req.name, "Processing get room request");
    parse_name(&req.name, name::parse_room)?;
    get_existing(state, &req.name).await
}

pub async fn update_room<S: CatalogStorage>(
    state: &AppState<S>,
    req: UpdateRoomRequest,
) -> ApiResult<Room> {
    debug!(mask = ?req.update_mask.paths(), "Processing update room request");

    let mut errs = ErrorList::new();
    let path = FieldPath::new("room");
    match &req.room {
        Some(room) => {
            validate_name(&mut errs, &path.child("name"), &room.name, name::parse_room);
            validate_display_name(&mut errs, &path, &room.display_name);
            validate_description(&mut errs, &path, &room.description);
        }
        None => errs.required(&path, "room is required"),
    }
    validate_update_mask::<Room>(&mut errs, &req.update_mask);
    errs.into_result()?;

    let room = req.room.unwrap_or_default();
    state
        .coordinator()
        .update_masked(&room, &UpdateOptions::new(req.update_mask))
        .await?
        .ok_or_else(|| ApiError::not_found(&room.name))
}

/// Deletes a room and returns it as it was.
pub async fn delete_room<S: CatalogStorage>(
    state: &AppState<S>,
    req: DeleteRoomRequest,
) -> ApiResult<Room> {
    debug!(name = %req.name, "Processing delete room request");
    parse_name(&req.name, name::parse_room)?;
    delete_existing(state, &req.name).await
}
