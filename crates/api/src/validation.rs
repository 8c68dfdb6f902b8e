//! Request validation.
//!
//! Validators collect every problem with a request into an [`ErrorList`]
//! before any store access. A non-empty list becomes a single
//! [`ApiError::InvalidArgument`] holding all violations.

use std::fmt;

use chacer_persistence::error::NameError;
use chacer_persistence::name::valid_resource_id;
use chacer_persistence::types::{FieldMask, Masked, PageInfo, Paginator};

use crate::error::{ApiError, ApiResult, FieldViolation};
use crate::types::Pageable;

pub const MAX_DISPLAY_NAME_LEN: usize = 255;
pub const MAX_DESCRIPTION_LEN: usize = 255;
pub const MAX_MESSAGE_LEN: usize = 1024;

/// Accepted reasons for suspending an account.
pub const SUSPENSION_REASONS: &[&str] = &["Billing", "Fraud"];

/// Dotted path to a request field, e.g. `account.displayName`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accumulates field violations.
#[derive(Debug, Default)]
pub struct ErrorList {
    violations: Vec<FieldViolation>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a missing required field.
    pub fn required(&mut self, path: &FieldPath, detail: &str) {
        self.violations
            .push(FieldViolation::new(path.to_string(), "", detail));
    }

    /// Records a field whose value is rejected.
    pub fn invalid(&mut self, path: &FieldPath, value: impl fmt::Display, detail: &str) {
        self.violations
            .push(FieldViolation::new(path.to_string(), value.to_string(), detail));
    }

    /// Records a value outside an enumerated set.
    pub fn not_supported(&mut self, path: &FieldPath, value: &str, supported: &[&str]) {
        let quoted: Vec<String> = supported.iter().map(|v| format!("{v:?}")).collect();
        self.violations.push(FieldViolation::new(
            path.to_string(),
            value,
            format!("supported values: {}", quoted.join(", ")),
        ));
    }

    /// Records a name that failed to parse.
    pub fn invalid_name(&mut self, path: &FieldPath, value: &str, err: &NameError) {
        self.invalid(path, value, &err.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn into_result(self) -> ApiResult<()> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }

    /// Converts the list into an error regardless of its length.
    pub fn into_error(self) -> ApiError {
        ApiError::InvalidArgument {
            violations: self.violations,
        }
    }
}

/// A validated list request: the page state to resume from and the number
/// of rows to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_info: PageInfo,
    pub page_size: u32,
}

/// Validates the paging fields of a list request.
///
/// `page_size` must be within `0..=max_page_size`; 0 selects
/// `default_page_size`. Without a page token the listing starts at offset 0
/// keyed by the request's parent. With a token, the parent, filter and order
/// must match the values the token was issued for.
///
/// Violations are added to `errs`; `None` is returned if there were any.
pub fn validate_page_request(
    errs: &mut ErrorList,
    req: &impl Pageable,
    paginator: &Paginator,
    default_page_size: u32,
    max_page_size: u32,
) -> Option<PageRequest> {
    let before = errs.len();

    let requested = req.page_size();
    let page_size = match u32::try_from(requested) {
        Ok(0) => default_page_size,
        Ok(size) if size <= max_page_size => size,
        _ => {
            errs.invalid(
                &FieldPath::new("page_size"),
                requested,
                &format!("page_size must be between 0 and {max_page_size} inclusive"),
            );
            default_page_size
        }
    };

    let page_info = if req.page_token().is_empty() {
        PageInfo::first_page(req.parent(), req.filter(), req.order())
    } else {
        let page_info = match paginator.decode(req.page_token()) {
            Ok(page_info) => page_info,
            Err(e) => {
                errs.invalid(&FieldPath::new("page_token"), req.page_token(), &e.to_string());
                return None;
            }
        };

        if page_info.request_key != req.parent() {
            errs.invalid(
                &FieldPath::new("parent"),
                req.parent(),
                "parent must not be changed during pagination query",
            );
        }
        if page_info.filter != req.filter() {
            errs.invalid(
                &FieldPath::new("filter"),
                req.filter(),
                "filter must not be changed during pagination query",
            );
        }
        if page_info.order != req.order() {
            errs.invalid(
                &FieldPath::new("order"),
                req.order(),
                "order must not be changed during pagination query",
            );
        }
        page_info
    };

    (errs.len() == before).then_some(PageRequest {
        page_info,
        page_size,
    })
}

/// Checks a resource ID supplied by the client for a new resource.
pub fn validate_resource_id(errs: &mut ErrorList, path: &FieldPath, id: &str, what: &str) {
    if id.is_empty() {
        errs.required(path, &format!("{path} is required"));
    } else if !valid_resource_id(id) {
        errs.invalid(path, id, &format!("invalid {what} ID"));
    }
}

pub fn validate_display_name(errs: &mut ErrorList, path: &FieldPath, display_name: &str) {
    if display_name.chars().count() > MAX_DISPLAY_NAME_LEN {
        errs.invalid(
            &path.child("displayName"),
            display_name,
            "display name must not be longer than 255 characters",
        );
    }
}

pub fn validate_description(errs: &mut ErrorList, path: &FieldPath, description: &str) {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        errs.invalid(
            &path.child("description"),
            description,
            "description must not be longer than 255 characters",
        );
    }
}

pub fn validate_message(errs: &mut ErrorList, path: &FieldPath, message: &str) {
    if message.chars().count() > MAX_MESSAGE_LEN {
        errs.invalid(path, message, "message must be between 0 and 1024 characters");
    }
}

pub fn validate_suspension_reason(errs: &mut ErrorList, path: &FieldPath, reason: &str) {
    if !SUSPENSION_REASONS.contains(&reason) {
        errs.not_supported(path, reason, SUSPENSION_REASONS);
    }
}

/// Rejects update mask paths `T` does not support.
pub fn validate_update_mask<T: Masked>(errs: &mut ErrorList, mask: &FieldMask) {
    let path = FieldPath::new("update_mask");
    for unknown in mask.unknown_paths::<T>() {
        errs.invalid(
            &path,
            &unknown,
            &format!("unknown field path in update_mask: {unknown}"),
        );
    }
}

/// Checks a required resource name with `parse`.
pub fn validate_name<T>(
    errs: &mut ErrorList,
    path: &FieldPath,
    name: &str,
    parse: impl FnOnce(&str) -> Result<T, NameError>,
) -> Option<T> {
    if name.is_empty() {
        errs.required(path, "name is required");
        return None;
    }
    match parse(name) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            errs.invalid_name(path, name, &e);
            None
        }
    }
}

/// Parses the `name` field of a get, delete or state-change request.
pub fn parse_name<T>(
    name: &str,
    parse: impl FnOnce(&str) -> Result<T, NameError>,
) -> ApiResult<T> {
    let mut errs = ErrorList::new();
    match validate_name(&mut errs, &FieldPath::new("name"), name, parse) {
        Some(parsed) => Ok(parsed),
        None => Err(errs.into_error()),
    }
}
