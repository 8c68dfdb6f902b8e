//! Field-mask driven partial updates.
//!
//! Each maskable type declares a static table mapping dot-delimited snake
//! case paths to copy functions. [`merge`] clones the existing value and runs
//! the copy function of every requested path against the update payload.

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};

use crate::error::FieldMaskError;

/// Copies one field from the update payload (`src`) into the merge target.
pub type MergeFn<T> = fn(&mut T, &T);

/// A single settable field of a [`Masked`] type.
pub struct MaskField<T> {
    /// Canonical snake case path, e.g. `quotas.devices`.
    pub path: &'static str,
    pub merge: MergeFn<T>,
}

/// Types that can be partially updated through a [`FieldMask`].
pub trait Masked: Clone + Sized + 'static {
    /// Every path a mask may name.
    const FIELDS: &'static [MaskField<Self>];

    /// Paths applied when the mask is empty.
    const DEFAULT_PATHS: &'static [&'static str];

    /// Looks up the copy function for a canonical path.
    fn field(path: &str) -> Option<MergeFn<Self>> {
        Self::FIELDS
            .iter()
            .find(|field| field.path == path)
            .map(|field| field.merge)
    }
}

/// The list of paths named by an update request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMask {
    paths: Vec<String>,
}

impl FieldMask {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the paths as sent by the caller.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Returns the caller-supplied paths that `T` does not recognize.
    pub fn unknown_paths<T: Masked>(&self) -> Vec<String> {
        self.paths
            .iter()
            .filter(|path| T::field(&normalize_path(path)).is_none())
            .cloned()
            .collect()
    }
}

/// Converts every dot-delimited segment of `path` to snake case.
pub fn normalize_path(path: &str) -> String {
    path.split('.')
        .map(|segment| segment.to_case(Case::Snake))
        .collect::<Vec<_>>()
        .join(".")
}

/// Returns a copy of `existing` with the masked fields taken from `update`.
///
/// An empty mask applies [`Masked::DEFAULT_PATHS`]. Neither input is
/// modified; an unknown path fails the whole merge.
pub fn merge<T: Masked>(existing: &T, update: &T, mask: &FieldMask) -> Result<T, FieldMaskError> {
    let setters = if mask.is_empty() {
        T::DEFAULT_PATHS
            .iter()
            .map(|path| lookup::<T>(path))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        mask.paths
            .iter()
            .map(|path| lookup::<T>(&normalize_path(path)).map_err(|_| unknown(path)))
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut merged = existing.clone();
    for setter in setters {
        setter(&mut merged, update);
    }
    Ok(merged)
}

fn lookup<T: Masked>(path: &str) -> Result<MergeFn<T>, FieldMaskError> {
    T::field(path).ok_or_else(|| unknown(path))
}

fn unknown(path: &str) -> FieldMaskError {
    FieldMaskError::UnknownPath {
        path: path.to_string(),
    }
}

/// Options for a masked update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    pub update_mask: FieldMask,
}

impl UpdateOptions {
    pub fn new(update_mask: FieldMask) -> Self {
        Self { update_mask }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Limits {
        soft: i64,
        hard: i64,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Widget {
        id: String,
        display_name: String,
        limits: Limits,
    }

    impl Masked for Widget {
        const FIELDS: &'static [MaskField<Self>] = &[
            MaskField {
                path: "display_name",
                merge: |dst, src| dst.display_name = src.display_name.clone(),
            },
            MaskField {
                path: "limits",
                merge: |dst, src| dst.limits = src.limits.clone(),
            },
            MaskField {
                path: "limits.soft",
                merge: |dst, src| dst.limits.soft = src.limits.soft,
            },
        ];
        const DEFAULT_PATHS: &'static [&'static str] = &["display_name", "limits"];
    }

    fn existing() -> Widget {
        Widget {
            id: "w1".to_string(),
            display_name: "Old".to_string(),
            limits: Limits { soft: 1, hard: 2 },
        }
    }

    fn update() -> Widget {
        Widget {
            id: "ignored".to_string(),
            display_name: "New".to_string(),
            limits: Limits { soft: 10, hard: 20 },
        }
    }

    #[test]
    fn test_merge_copies_only_masked_fields() {
        let merged = merge(&existing(), &update(), &FieldMask::new(["displayName"])).unwrap();
        assert_eq!(merged.display_name, "New");
        assert_eq!(merged.limits, Limits { soft: 1, hard: 2 });
        assert_eq!(merged.id, "w1");
    }

    #[test]
    fn test_merge_nested_path() {
        let merged = merge(&existing(), &update(), &FieldMask::new(["limits.soft"])).unwrap();
        assert_eq!(merged.limits, Limits { soft: 10, hard: 2 });
        assert_eq!(merged.display_name, "Old");
    }

    #[test]
    fn test_empty_mask_applies_default_paths() {
        let merged = merge(&existing(), &update(), &FieldMask::default()).unwrap();
        assert_eq!(merged.display_name, "New");
        assert_eq!(merged.limits, Limits { soft: 10, hard: 20 });
        assert_eq!(merged.id, "w1");
    }

    #[test]
    fn test_unknown_path_fails_closed() {
        let original = existing();
        let err = merge(&original, &update(), &FieldMask::new(["displayName", "id"])).unwrap_err();
        assert_eq!(
            err,
            FieldMaskError::UnknownPath {
                path: "id".to_string()
            }
        );
        assert_eq!(original, existing());
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("displayName"), "display_name");
        assert_eq!(normalize_path("display_name"), "display_name");
        assert_eq!(normalize_path("quotas.maxDevices"), "quotas.max_devices");
    }

    #[test]
    fn test_unknown_paths_reports_caller_spelling() {
        let mask = FieldMask::new(["displayName", "createTime", "limits.hard"]);
        assert_eq!(mask.unknown_paths::<Widget>(), vec!["createTime", "limits.hard"]);
        assert!(FieldMask::new(["limits"]).unknown_paths::<Widget>().is_empty());
    }
}
