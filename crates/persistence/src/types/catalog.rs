//! Catalog resources: accounts, locations and rooms.
//!
//! All three share the same bookkeeping fields (`name`, `uid`, `self_link`,
//! timestamps). Only display names, descriptions and quotas are settable
//! through field masks; account status changes through its own operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::name::{ACCOUNT_COLLECTIONS, LOCATION_COLLECTIONS, ROOM_COLLECTIONS};
use crate::types::entity::Entity;
use crate::types::field_mask::{MaskField, Masked};

/// Lifecycle phase of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountPhase {
    #[default]
    Unspecified,
    Active,
    Suspended,
}

impl AccountPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountPhase::Unspecified => "UNSPECIFIED",
            AccountPhase::Active => "ACTIVE",
            AccountPhase::Suspended => "SUSPENDED",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountStatus {
    pub phase: AccountPhase,
    pub reason: String,
    pub message: String,
}

impl AccountStatus {
    pub fn active() -> Self {
        Self {
            phase: AccountPhase::Active,
            ..Self::default()
        }
    }

    pub fn suspended(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            phase: AccountPhase::Suspended,
            reason: reason.into(),
            message: message.into(),
        }
    }
}

/// Resource limits for an account. `name` is always `{account}/quotas`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountQuotas {
    pub name: String,
    pub devices: i64,
    pub locations: i64,
}

impl AccountQuotas {
    /// Name of the quotas sub-resource of `account_name`.
    pub fn name_for(account_name: &str) -> String {
        format!("{account_name}/quotas")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub self_link: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub create_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: AccountStatus,
    #[serde(default)]
    pub quotas: AccountQuotas,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub self_link: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub create_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub self_link: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub create_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

macro_rules! impl_entity {
    ($ty:ty, $resource_type:literal, $collections:expr) => {
        impl Entity for $ty {
            const RESOURCE_TYPE: &'static str = $resource_type;
            const COLLECTIONS: &'static [&'static str] = $collections;

            fn name(&self) -> &str {
                &self.name
            }

            fn create_time(&self) -> DateTime<Utc> {
                self.create_time
            }

            fn update_time(&self) -> Option<DateTime<Utc>> {
                self.update_time
            }

            fn set_update_time(&mut self, time: DateTime<Utc>) {
                self.update_time = Some(time);
            }
        }
    };
}

impl_entity!(Account, "Account", ACCOUNT_COLLECTIONS);
impl_entity!(Location, "Location", LOCATION_COLLECTIONS);
impl_entity!(Room, "Room", ROOM_COLLECTIONS);

impl Masked for Account {
    const FIELDS: &'static [MaskField<Self>] = &[
        MaskField {
            path: "display_name",
            merge: |dst, src| dst.display_name = src.display_name.clone(),
        },
        MaskField {
            path: "quotas",
            merge: |dst, src| {
                dst.quotas.devices = src.quotas.devices;
                dst.quotas.locations = src.quotas.locations;
            },
        },
        MaskField {
            path: "quotas.devices",
            merge: |dst, src| dst.quotas.devices = src.quotas.devices,
        },
        MaskField {
            path: "quotas.locations",
            merge: |dst, src| dst.quotas.locations = src.quotas.locations,
        },
    ];
    const DEFAULT_PATHS: &'static [&'static str] = &["display_name"];
}

impl Masked for Location {
    const FIELDS: &'static [MaskField<Self>] = &[
        MaskField {
            path: "display_name",
            merge: |dst, src| dst.display_name = src.display_name.clone(),
        },
        MaskField {
            path: "description",
            merge: |dst, src| dst.description = src.description.clone(),
        },
    ];
    const DEFAULT_PATHS: &'static [&'static str] = &["display_name", "description"];
}

impl Masked for Room {
    const FIELDS: &'static [MaskField<Self>] = &[
        MaskField {
            path: "display_name",
            merge: |dst, src| dst.display_name = src.display_name.clone(),
        },
        MaskField {
            path: "description",
            merge: |dst, src| dst.description = src.description.clone(),
        },
    ];
    const DEFAULT_PATHS: &'static [&'static str] = &["display_name", "description"];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::field_mask::{FieldMask, merge};
    use chrono::Duration;

    fn account() -> Account {
        Account {
            name: "accounts/acme".to_string(),
            uid: "uid-1".to_string(),
            self_link: "//apis.chacerapp.com/accounts/acme".to_string(),
            display_name: "Acme".to_string(),
            create_time: Utc::now(),
            update_time: None,
            status: AccountStatus::active(),
            quotas: AccountQuotas {
                name: AccountQuotas::name_for("accounts/acme"),
                devices: 5,
                locations: 2,
            },
        }
    }

    #[test]
    fn test_account_json_shape() {
        let json = serde_json::to_value(account()).unwrap();
        assert_eq!(json["displayName"], "Acme");
        assert_eq!(json["status"]["phase"], "ACTIVE");
        assert_eq!(json["quotas"]["name"], "accounts/acme/quotas");
        assert!(json.get("updateTime").is_none());
    }

    #[test]
    fn test_account_mask_leaves_status_alone() {
        let existing = account();
        let mut update = account();
        update.display_name = "Acme Corp".to_string();
        update.status = AccountStatus::suspended("Fraud", "");
        update.quotas.devices = 50;

        let merged = merge(&existing, &update, &FieldMask::new(["displayName"])).unwrap();
        assert_eq!(merged.display_name, "Acme Corp");
        assert_eq!(merged.status.phase, AccountPhase::Active);
        assert_eq!(merged.quotas.devices, 5);

        let merged = merge(&existing, &update, &FieldMask::new(["quotas.devices"])).unwrap();
        assert_eq!(merged.quotas.devices, 50);
        assert_eq!(merged.quotas.name, "accounts/acme/quotas");

        assert!(merge(&existing, &update, &FieldMask::new(["status"])).is_err());
    }

    #[test]
    fn test_last_modified_prefers_update_time() {
        let mut account = account();
        assert_eq!(account.last_modified(), account.create_time);

        let later = account.create_time + Duration::seconds(5);
        account.set_update_time(later);
        assert_eq!(account.last_modified(), later);
    }
}
