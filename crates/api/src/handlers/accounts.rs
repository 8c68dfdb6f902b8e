//! Account handlers.
//!
//! Accounts are top-level resources named `accounts/{account}`. A new
//! account starts ACTIVE with empty quotas. Status changes only through
//! [`activate_account`], [`suspend_account`] and [`update_account_status`].

use chacer_persistence::core::{CatalogStorage, ListQuery};
use chacer_persistence::error::NameError;
use chacer_persistence::name::{self, AccountName};
use chacer_persistence::types::{
    Account, AccountPhase, AccountQuotas, AccountStatus, ListOptions, UpdateOptions,
};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::types::{
    ActivateAccountRequest, ActivateAccountResponse, CreateAccountRequest, DeleteAccountRequest,
    GetAccountQuotasRequest, GetAccountRequest, GetAccountStatusRequest, ListAccountsRequest,
    ListAccountsResponse, SuspendAccountRequest, SuspendAccountResponse,
    UpdateAccountQuotasRequest, UpdateAccountRequest, UpdateAccountStatusRequest,
};
use crate::validation::{
    ErrorList, FieldPath, parse_name, validate_display_name, validate_message, validate_name,
    validate_page_request, validate_resource_id, validate_suspension_reason,
    validate_update_mask,
};

use super::{delete_existing, fetch_page, get_existing};

const QUOTAS_SUFFIX: &str = "/quotas";

/// Lists accounts in resource ID order.
pub async fn list_accounts<S: CatalogStorage>(
    state: &AppState<S>,
    req: ListAccountsRequest,
) -> ApiResult<ListAccountsResponse> {
    debug!(page_size = req.page_size, "Processing list accounts request");

    let mut errs = ErrorList::new();
    let Some(page) = validate_page_request(
        &mut errs,
        &req,
        state.paginator(),
        state.default_page_size(),
        state.max_page_size(),
    ) else {
        return Err(errs.into_error());
    };

    let options = ListOptions::new(page.page_size, page.page_info);
    let (accounts, next_page_token) =
        fetch_page(state, &options, &ListQuery::root(&options)).await?;

    Ok(ListAccountsResponse {
        accounts,
        next_page_token,
    })
}

/// Creates `accounts/{account_id}`.
///
/// Only the display name is taken from the request; every other field is
/// set by the server.
pub async fn create_account<S: CatalogStorage>(
    state: &AppState<S>,
    req: CreateAccountRequest,
) -> ApiResult<Account> {
    debug!(account_id = %req.account_id, "Processing create account request");

    let mut errs = ErrorList::new();
    validate_resource_id(&mut errs, &FieldPath::new("account_id"), &req.account_id, "account");
    let path = FieldPath::new("account");
    match &req.account {
        Some(account) => validate_display_name(&mut errs, &path, &account.display_name),
        None => errs.required(&path, "account is required"),
    }
    errs.into_result()?;

    let display_name = req.account.map(|a| a.display_name).unwrap_or_default();
    let name = name::build_account(&req.account_id);
    let self_link = state.self_link(&name);

    let created = state
        .coordinator()
        .create_if_absent(&name, |now| Account {
            name: name.clone(),
            uid: Uuid::new_v4().to_string(),
            self_link,
            display_name,
            create_time: now,
            update_time: None,
            status: AccountStatus::active(),
            quotas: AccountQuotas {
                name: AccountQuotas::name_for(&name),
                ..AccountQuotas::default()
            },
        })
        .await?;

    created.ok_or_else(|| ApiError::already_exists(&name))
}

pub async fn get_account<S: CatalogStorage>(
    state: &AppState<S>,
    req: GetAccountRequest,
) -> ApiResult<Account> {
    debug!(name = %req.name, "Processing get account request");
    parse_name(&req.name, name::parse_account)?;
    get_existing(state, &req.name).await
}

/// Applies the masked fields of `req.account` to the stored account.
pub async fn update_account<S: CatalogStorage>(
    state: &AppState<S>,
    req: UpdateAccountRequest,
) -> ApiResult<Account> {
    debug!(mask = ?req.update_mask.paths(), "Processing update account request");

    let mut errs = ErrorList::new();
    let path = FieldPath::new("account");
    match &req.account {
        Some(account) => {
            validate_name(&mut errs, &path.child("name"), &account.name, name::parse_account);
            validate_display_name(&mut errs, &path, &account.display_name);
            validate_quota_limits(&mut errs, &path.child("quotas"), &account.quotas);
        }
        None => errs.required(&path, "account is required"),
    }
    validate_update_mask::<Account>(&mut errs, &req.update_mask);
    errs.into_result()?;

    let account = req.account.unwrap_or_default();
    state
        .coordinator()
        .update_masked(&account, &UpdateOptions::new(req.update_mask))
        .await?
        .ok_or_else(|| ApiError::not_found(&account.name))
}

/// Moves a suspended account back to ACTIVE.
pub async fn activate_account<S: CatalogStorage>(
    state: &AppState<S>,
    req: ActivateAccountRequest,
) -> ApiResult<ActivateAccountResponse> {
    debug!(name = %req.name, "Processing activate account request");
    parse_name(&req.name, name::parse_account)?;

    state
        .coordinator()
        .read_modify_write(&req.name, |mut account: Account| {
            if account.status.phase == AccountPhase::Active {
                return Err(ApiError::failed_precondition("account is already active"));
            }
            account.status = AccountStatus::active();
            Ok(account)
        })
        .await?
        .map(|_| ActivateAccountResponse {})
        .ok_or_else(|| ApiError::not_found(&req.name))
}

/// Suspends an account for one of the accepted reasons.
pub async fn suspend_account<S: CatalogStorage>(
    state: &AppState<S>,
    req: SuspendAccountRequest,
) -> ApiResult<SuspendAccountResponse> {
    debug!(name = %req.name, reason = %req.reason, "Processing suspend account request");

    let mut errs = ErrorList::new();
    validate_name(&mut errs, &FieldPath::new("name"), &req.name, name::parse_account);
    validate_suspension_reason(&mut errs, &FieldPath::new("reason"), &req.reason);
    validate_message(&mut errs, &FieldPath::new("message"), &req.message);
    errs.into_result()?;

    let SuspendAccountRequest {
        name,
        reason,
        message,
    } = req;

    state
        .coordinator()
        .read_modify_write(&name, |mut account: Account| {
            if account.status.phase == AccountPhase::Suspended {
                return Err(ApiError::failed_precondition("account is already suspended"));
            }
            account.status = AccountStatus::suspended(reason, message);
            Ok(account)
        })
        .await?
        .map(|_| SuspendAccountResponse {})
        .ok_or_else(|| ApiError::not_found(&name))
}

/// Deletes an account and returns it as it was.
///
/// Locations and rooms below the account are left in place.
pub async fn delete_account<S: CatalogStorage>(
    state: &AppState<S>,
    req: DeleteAccountRequest,
) -> ApiResult<Account> {
    debug!(name = %req.name, "Processing delete account request");
    parse_name(&req.name, name::parse_account)?;
    delete_existing(state, &req.name).await
}

pub async fn get_account_status<S: CatalogStorage>(
    state: &AppState<S>,
    req: GetAccountStatusRequest,
) -> ApiResult<AccountStatus> {
    debug!(name = %req.name, "Processing get account status request");
    parse_name(&req.name, name::parse_account)?;
    let account: Account = get_existing(state, &req.name).await?;
    Ok(account.status)
}

/// Replaces the status of an account without phase checks.
pub async fn update_account_status<S: CatalogStorage>(
    state: &AppState<S>,
    req: UpdateAccountStatusRequest,
) -> ApiResult<AccountStatus> {
    debug!(
        name = %req.name,
        phase = req.account_status.phase.as_str(),
        "Processing update account status request"
    );

    let mut errs = ErrorList::new();
    validate_name(&mut errs, &FieldPath::new("name"), &req.name, name::parse_account);
    let path = FieldPath::new("account_status");
    let status = &req.account_status;
    match status.phase {
        AccountPhase::Active => {}
        AccountPhase::Suspended => {
            validate_suspension_reason(&mut errs, &path.child("reason"), &status.reason)
        }
        AccountPhase::Unspecified => errs.not_supported(
            &path.child("phase"),
            status.phase.as_str(),
            &[AccountPhase::Active.as_str(), AccountPhase::Suspended.as_str()],
        ),
    }
    validate_message(&mut errs, &path.child("message"), &status.message);
    errs.into_result()?;

    let UpdateAccountStatusRequest {
        name,
        account_status,
    } = req;

    state
        .coordinator()
        .read_modify_write(&name, |mut account: Account| {
            account.status = account_status;
            Ok::<_, ApiError>(account)
        })
        .await?
        .map(|account| account.status)
        .ok_or_else(|| ApiError::not_found(&name))
}

pub async fn get_account_quotas<S: CatalogStorage>(
    state: &AppState<S>,
    req: GetAccountQuotasRequest,
) -> ApiResult<AccountQuotas> {
    debug!(name = %req.name, "Processing get account quotas request");
    parse_name(&req.name, name::parse_account)?;
    let account: Account = get_existing(state, &req.name).await?;
    Ok(account.quotas)
}

/// Replaces the limits of `accounts/{account}/quotas`.
pub async fn update_account_quotas<S: CatalogStorage>(
    state: &AppState<S>,
    req: UpdateAccountQuotasRequest,
) -> ApiResult<AccountQuotas> {
    let quotas = req.account_quotas;
    debug!(name = %quotas.name, "Processing update account quotas request");

    let mut errs = ErrorList::new();
    let path = FieldPath::new("account_quotas");
    let account = validate_name(&mut errs, &path.child("name"), &quotas.name, parse_quotas_name);
    validate_quota_limits(&mut errs, &path, &quotas);
    let Some(account) = account else {
        return Err(errs.into_error());
    };
    errs.into_result()?;

    let name = account.to_string();
    state
        .coordinator()
        .read_modify_write(&name, |mut account: Account| {
            account.quotas.devices = quotas.devices;
            account.quotas.locations = quotas.locations;
            Ok::<_, ApiError>(account)
        })
        .await?
        .map(|account| account.quotas)
        .ok_or_else(|| ApiError::not_found(&name))
}

/// Parses `accounts/{account}/quotas` into the owning account's name.
fn parse_quotas_name(quotas_name: &str) -> Result<AccountName, NameError> {
    let invalid = || NameError::InvalidFormat {
        pattern: "accounts/*/quotas".to_string(),
    };
    let account = quotas_name.strip_suffix(QUOTAS_SUFFIX).ok_or_else(invalid)?;
    name::parse_account(account).map_err(|_| invalid())
}

fn validate_quota_limits(errs: &mut ErrorList, path: &FieldPath, quotas: &AccountQuotas) {
    if quotas.devices < 0 {
        errs.invalid(&path.child("devices"), quotas.devices, "devices must not be negative");
    }
    if quotas.locations < 0 {
        errs.invalid(
            &path.child("locations"),
            quotas.locations,
            "locations must not be negative",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quotas_name() {
        let account = parse_quotas_name("accounts/acme/quotas").unwrap();
        assert_eq!(account.account, "acme");

        for bad in ["accounts/acme", "accounts/ab/quotas", "accounts/acme/limits"] {
            let err = parse_quotas_name(bad).unwrap_err();
            assert_eq!(
                err.to_string(),
                "a valid name will be in the format of `accounts/*/quotas`"
            );
        }
    }

    #[test]
    fn test_negative_quota_limits() {
        let mut errs = ErrorList::new();
        let quotas = AccountQuotas {
            name: "accounts/acme/quotas".to_string(),
            devices: -1,
            locations: 3,
        };
        validate_quota_limits(&mut errs, &FieldPath::new("account_quotas"), &quotas);
        let err = errs.into_result().unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field, "account_quotas.devices");
    }
}
