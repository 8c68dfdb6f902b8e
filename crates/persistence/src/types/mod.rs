//! Core types for the persistence layer.
//!
//! - [`Entity`] - The contract every stored resource implements
//! - [`Account`], [`Location`], [`Room`] - The catalog resources
//! - [`FieldMask`], [`Masked`] - Partial updates driven by update masks
//! - [`Paginator`], [`PageInfo`] - Authenticated page tokens
//!
//! # Examples
//!
//! ## Merging an update through a field mask
//!
//! ```
//! use chacer_persistence::types::{merge, FieldMask, Location};
//! use chrono::Utc;
//!
//! let existing = Location {
//!     name: "accounts/acme/locations/hq01".to_string(),
//!     uid: String::new(),
//!     self_link: String::new(),
//!     display_name: "HQ".to_string(),
//!     description: "Main office".to_string(),
//!     create_time: Utc::now(),
//!     update_time: None,
//! };
//! let mut update = existing.clone();
//! update.display_name = "Headquarters".to_string();
//! update.description = String::new();
//!
//! let merged = merge(&existing, &update, &FieldMask::new(["displayName"])).unwrap();
//! assert_eq!(merged.display_name, "Headquarters");
//! assert_eq!(merged.description, "Main office");
//! ```
//!
//! ## Issuing a page token
//!
//! ```
//! use chacer_persistence::types::{PageInfo, Paginator};
//!
//! let paginator = Paginator::random();
//! let token = paginator.encode(&PageInfo::first_page("accounts/-", "", ""), 25).unwrap();
//! assert_eq!(paginator.decode(&token).unwrap().end_cursor, 25);
//! ```

mod catalog;
mod entity;
mod field_mask;
mod pagination;

pub use catalog::{Account, AccountPhase, AccountQuotas, AccountStatus, Location, Room};
pub use entity::Entity;
pub use field_mask::{
    FieldMask, MaskField, Masked, MergeFn, UpdateOptions, merge, normalize_path,
};
pub use pagination::{KEY_LEN, ListOptions, PageInfo, Paginator};
