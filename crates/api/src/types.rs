//! Request and response messages.
//!
//! Messages use camelCase JSON field names. Absent fields deserialize to
//! their defaults, so `{}` is a valid (if usually invalid-argument) request.

use chacer_persistence::types::{Account, AccountStatus, FieldMask, Location, Room};
use serde::{Deserialize, Serialize};

/// A list request that can be paged through with page tokens.
///
/// `parent`, `filter` and `order` must stay the same across all pages of
/// one listing.
pub trait Pageable {
    fn page_size(&self) -> i32;

    fn page_token(&self) -> &str;

    fn parent(&self) -> &str {
        ""
    }

    fn filter(&self) -> &str {
        ""
    }

    fn order(&self) -> &str {
        ""
    }
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListAccountsRequest {
    pub page_size: i32,
    pub page_token: String,
}

impl Pageable for ListAccountsRequest {
    fn page_size(&self) -> i32 {
        self.page_size
    }

    fn page_token(&self) -> &str {
        &self.page_token
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListAccountsResponse {
    pub accounts: Vec<Account>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAccountRequest {
    pub account_id: String,
    pub account: Option<Account>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetAccountRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAccountRequest {
    pub account: Option<Account>,
    pub update_mask: FieldMask,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivateAccountRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivateAccountResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuspendAccountRequest {
    pub name: String,
    /// One of `Billing` or `Fraud`.
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspendAccountResponse {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteAccountRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetAccountStatusRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAccountStatusRequest {
    /// Name of the account whose status is replaced.
    pub name: String,
    pub account_status: AccountStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetAccountQuotasRequest {
    pub name: String,
}

/// Replaces the limits of `accounts/{account}/quotas`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAccountQuotasRequest {
    pub account_quotas: chacer_persistence::types::AccountQuotas,
}

// ============================================================================
// Locations
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListLocationsRequest {
    /// `accounts/{account}`, or `accounts/-` for every account.
    pub parent: String,
    pub page_size: i32,
    pub page_token: String,
    pub filter: String,
    pub order: String,
}

impl Pageable for ListLocationsRequest {
    fn page_size(&self) -> i32 {
        self.page_size
    }

    fn page_token(&self) -> &str {
        &self.page_token
    }

    fn parent(&self) -> &str {
        &self.parent
    }

    fn filter(&self) -> &str {
        &self.filter
    }

    fn order(&self) -> &str {
        &self.order
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListLocationsResponse {
    pub locations: Vec<Location>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLocationRequest {
    pub parent: String,
    /// Derived from the display name when empty.
    pub location_id: String,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetLocationRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateLocationRequest {
    pub location: Option<Location>,
    pub update_mask: FieldMask,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteLocationRequest {
    pub name: String,
}

// ============================================================================
// Rooms
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListRoomsRequest {
    /// `accounts/{account}/locations/{location}`; either ID may be `-`.
    pub parent: String,
    pub page_size: i32,
    pub page_token: String,
    pub filter: String,
    pub order: String,
}

impl Pageable for ListRoomsRequest {
    fn page_size(&self) -> i32 {
        self.page_size
    }

    fn page_token(&self) -> &str {
        &self.page_token
    }

    fn parent(&self) -> &str {
        &self.parent
    }

    fn filter(&self) -> &str {
        &self.filter
    }

    fn order(&self) -> &str {
        &self.order
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListRoomsResponse {
    pub rooms: Vec<Room>,
    pub next_page_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateRoomRequest {
    pub parent: String,
    pub room_id: String,
    pub room: Option<Room>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetRoomRequest {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRoomRequest {
    pub room: Option<Room>,
    pub update_mask: FieldMask,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteRoomRequest {
    pub name: String,
}
