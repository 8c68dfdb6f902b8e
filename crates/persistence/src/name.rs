//! Hierarchical resource names.
//!
//! Every catalog entity is addressed by a relative resource name made of
//! alternating collection identifiers and resource IDs:
//!
//! ```text
//! accounts/acme/locations/hq01/rooms/lobby
//! ```
//!
//! Collection identifiers are fixed per hierarchy. Resource IDs follow a
//! strict grammar (see [`valid_resource_id`]). Names are only validated when
//! parsed; the builders in this module are plain string concatenation.
//!
//! # Examples
//!
//! ```
//! use chacer_persistence::name::{self, ParseOptions};
//!
//! let room = name::parse_room("accounts/acme/locations/hq01/rooms/lobby").unwrap();
//! assert_eq!(room.location, "hq01");
//! assert_eq!(room.to_string(), "accounts/acme/locations/hq01/rooms/lobby");
//!
//! // Wildcards are only accepted where the caller opts in.
//! assert!(name::parse_account_with("accounts/-", ParseOptions::allow_wildcard()).is_ok());
//! assert!(name::parse_account("accounts/-").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::NameError;

pub const COLLECTION_ACCOUNTS: &str = "accounts";
pub const COLLECTION_LOCATIONS: &str = "locations";
pub const COLLECTION_COLORS: &str = "colors";
pub const COLLECTION_DEVICES: &str = "devices";
pub const COLLECTION_TEMPLATES: &str = "templates";
pub const COLLECTION_ROOMS: &str = "rooms";
pub const COLLECTION_MESSAGES: &str = "messages";

/// Collection sequence for account names.
pub const ACCOUNT_COLLECTIONS: &[&str] = &[COLLECTION_ACCOUNTS];
/// Collection sequence for location names.
pub const LOCATION_COLLECTIONS: &[&str] = &[COLLECTION_ACCOUNTS, COLLECTION_LOCATIONS];
/// Collection sequence for room names.
pub const ROOM_COLLECTIONS: &[&str] =
    &[COLLECTION_ACCOUNTS, COLLECTION_LOCATIONS, COLLECTION_ROOMS];
/// Collection sequence for device names.
pub const DEVICE_COLLECTIONS: &[&str] =
    &[COLLECTION_ACCOUNTS, COLLECTION_LOCATIONS, COLLECTION_DEVICES];
/// Collection sequence for color names.
pub const COLOR_COLLECTIONS: &[&str] = &[COLLECTION_ACCOUNTS, COLLECTION_COLORS];

/// The resource ID that stands for "every resource in this collection".
pub const WILDCARD: &str = "-";

const MIN_RESOURCE_ID_LEN: usize = 4;
const MAX_RESOURCE_ID_LEN: usize = 63;

/// Options controlling how a name is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    allow_wildcard: bool,
}

impl ParseOptions {
    /// Strict parsing: every resource ID must satisfy the ID grammar.
    pub const fn strict() -> Self {
        Self {
            allow_wildcard: false,
        }
    }

    /// Accepts [`WILDCARD`] in place of any resource ID.
    pub const fn allow_wildcard() -> Self {
        Self {
            allow_wildcard: true,
        }
    }

    /// Returns whether wildcards are accepted.
    pub fn wildcard_allowed(&self) -> bool {
        self.allow_wildcard
    }
}

/// Returns `true` if `id` can be used as a resource ID.
///
/// A resource ID is 4-63 characters long, contains only `a-z`, `0-9` and `-`,
/// does not start or end with `-`, and never contains two consecutive `-`.
pub fn valid_resource_id(id: &str) -> bool {
    let bytes = id.as_bytes();
    if bytes.len() < MIN_RESOURCE_ID_LEN || bytes.len() > MAX_RESOURCE_ID_LEN {
        return false;
    }

    let mut previous = b'-';
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'a'..=b'z' | b'0'..=b'9' => {}
            // A leading hyphen is caught by `previous` starting as '-'.
            b'-' if previous != b'-' && i != bytes.len() - 1 => {}
            _ => return false,
        }
        previous = b;
    }
    true
}

/// Joins name parts with `/`.
pub fn build_relative_name<S: AsRef<str>>(parts: &[S]) -> String {
    let mut name = String::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            name.push('/');
        }
        name.push_str(part.as_ref());
    }
    name
}

/// Builds `accounts/{account}`.
pub fn build_account(account: &str) -> String {
    build_relative_name(&[COLLECTION_ACCOUNTS, account])
}

/// Builds `accounts/{account}/locations/{location}`.
pub fn build_location(account: &str, location: &str) -> String {
    build_relative_name(&[COLLECTION_ACCOUNTS, account, COLLECTION_LOCATIONS, location])
}

/// Builds `accounts/{account}/locations/{location}/rooms/{room}`.
pub fn build_room(account: &str, location: &str, room: &str) -> String {
    build_relative_name(&[
        COLLECTION_ACCOUNTS,
        account,
        COLLECTION_LOCATIONS,
        location,
        COLLECTION_ROOMS,
        room,
    ])
}

/// Builds the name of a child resource below `parent`.
pub fn build_child(parent: &str, collection: &str, id: &str) -> String {
    build_relative_name(&[parent, collection, id])
}

/// A parsed resource name: ordered `(collection, resource ID)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePath {
    segments: Vec<(String, String)>,
}

impl ResourcePath {
    /// Parses `name` against the expected collection sequence.
    pub fn parse(
        name: &str,
        collection_ids: &[&str],
        options: ParseOptions,
    ) -> Result<Self, NameError> {
        let parts: Vec<&str> = name.split('/').collect();
        if parts.len() != collection_ids.len() * 2 {
            return Err(NameError::invalid(collection_ids));
        }

        let mut segments = Vec::with_capacity(collection_ids.len());
        for (i, expected) in collection_ids.iter().enumerate() {
            let collection = parts[i * 2];
            let id = parts[i * 2 + 1];

            if collection != *expected {
                return Err(NameError::invalid(collection_ids));
            }

            let wildcard = options.wildcard_allowed() && id == WILDCARD;
            if !wildcard && !valid_resource_id(id) {
                return Err(NameError::invalid(collection_ids));
            }

            segments.push((collection.to_string(), id.to_string()));
        }

        Ok(Self { segments })
    }

    /// Returns the `(collection, resource ID)` pairs, ancestor first.
    pub fn segments(&self) -> &[(String, String)] {
        &self.segments
    }

    /// Returns the resource IDs, ancestor first.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(|(_, id)| id.as_str())
    }

    /// Returns the ID of the last segment.
    pub fn leaf_id(&self) -> &str {
        self.segments
            .last()
            .map(|(_, id)| id.as_str())
            .unwrap_or_default()
    }

    /// Returns the ancestor IDs, excluding the last segment.
    pub fn ancestor_ids(&self) -> Vec<&str> {
        let len = self.segments.len().saturating_sub(1);
        self.segments[..len]
            .iter()
            .map(|(_, id)| id.as_str())
            .collect()
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (collection, id)) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}/{}", collection, id)?;
        }
        Ok(())
    }
}

/// Parses `name` and returns its resource IDs in order.
pub fn parse_relative_name(
    name: &str,
    collection_ids: &[&str],
    options: ParseOptions,
) -> Result<Vec<String>, NameError> {
    let path = ResourcePath::parse(name, collection_ids, options)?;
    Ok(path.segments.into_iter().map(|(_, id)| id).collect())
}

/// `accounts/{account}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountName {
    pub account: String,
}

/// `accounts/{account}/locations/{location}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationName {
    pub account: String,
    pub location: String,
}

/// `accounts/{account}/locations/{location}/rooms/{room}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomName {
    pub account: String,
    pub location: String,
    pub room: String,
}

/// `accounts/{account}/locations/{location}/devices/{device}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceName {
    pub account: String,
    pub location: String,
    pub device: String,
}

/// `accounts/{account}/colors/{color}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorName {
    pub account: String,
    pub color: String,
}

impl AccountName {
    /// Returns `true` if the account ID is the wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.account == WILDCARD
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_account(&self.account))
    }
}

impl fmt::Display for LocationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_location(&self.account, &self.location))
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_room(&self.account, &self.location, &self.room))
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_relative_name(&[
            COLLECTION_ACCOUNTS,
            &self.account,
            COLLECTION_LOCATIONS,
            &self.location,
            COLLECTION_DEVICES,
            &self.device,
        ]))
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_relative_name(&[
            COLLECTION_ACCOUNTS,
            &self.account,
            COLLECTION_COLORS,
            &self.color,
        ]))
    }
}

fn take_ids<const N: usize>(
    name: &str,
    collection_ids: &[&str],
    options: ParseOptions,
) -> Result<[String; N], NameError> {
    let ids = parse_relative_name(name, collection_ids, options)?;
    ids.try_into()
        .map_err(|_| NameError::invalid(collection_ids))
}

/// Parses an account name, rejecting wildcards.
pub fn parse_account(name: &str) -> Result<AccountName, NameError> {
    parse_account_with(name, ParseOptions::strict())
}

/// Parses an account name with explicit options.
pub fn parse_account_with(name: &str, options: ParseOptions) -> Result<AccountName, NameError> {
    let [account] = take_ids(name, ACCOUNT_COLLECTIONS, options)?;
    Ok(AccountName { account })
}

/// Parses a location name, rejecting wildcards.
pub fn parse_location(name: &str) -> Result<LocationName, NameError> {
    parse_location_with(name, ParseOptions::strict())
}

/// Parses a location name with explicit options.
pub fn parse_location_with(
    name: &str,
    options: ParseOptions,
) -> Result<LocationName, NameError> {
    let [account, location] = take_ids(name, LOCATION_COLLECTIONS, options)?;
    Ok(LocationName { account, location })
}

/// Parses a room name, rejecting wildcards.
pub fn parse_room(name: &str) -> Result<RoomName, NameError> {
    let [account, location, room] = take_ids(name, ROOM_COLLECTIONS, ParseOptions::strict())?;
    Ok(RoomName {
        account,
        location,
        room,
    })
}

/// Parses a device name, rejecting wildcards.
pub fn parse_device(name: &str) -> Result<DeviceName, NameError> {
    let [account, location, device] =
        take_ids(name, DEVICE_COLLECTIONS, ParseOptions::strict())?;
    Ok(DeviceName {
        account,
        location,
        device,
    })
}

/// Parses a color name, rejecting wildcards.
pub fn parse_color(name: &str) -> Result<ColorName, NameError> {
    let [account, color] = take_ids(name, COLOR_COLLECTIONS, ParseOptions::strict())?;
    Ok(ColorName { account, color })
}

/// Derives a resource ID candidate from a display name.
///
/// Letters are lower-cased, digits kept, spaces and hyphens collapse into a
/// single `-`, and every other character is dropped. The result is not
/// guaranteed to satisfy [`valid_resource_id`].
pub fn slugify(display_name: &str) -> String {
    let mut slug = String::with_capacity(display_name.len());
    let mut added_hyphen = false;
    for c in display_name.chars().flat_map(char::to_lowercase) {
        match c {
            'a'..='z' | '0'..='9' => {
                slug.push(c);
                added_hyphen = false;
            }
            ' ' | '-' if !added_hyphen => {
                slug.push('-');
                added_hyphen = true;
            }
            _ => {}
        }
    }
    slug
}
