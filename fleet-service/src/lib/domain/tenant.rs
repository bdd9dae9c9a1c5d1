use thiserror::Error;

use crate::domain::auth::models::CompanyId;

/// Tenant authorization failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TenantError {
    #[error("Caller is not allowed to access this resource")]
    Forbidden,
}

/// Check that a resource's owning company matches the caller's company.
///
/// The caller's company id must come from verified session-token claims,
/// never from the request body or query string. Fails closed: a caller with
/// no company is always refused, regardless of the resource.
pub fn authorize(
    resource_company: CompanyId,
    caller_company: Option<CompanyId>,
) -> Result<(), TenantError> {
    match caller_company {
        Some(caller) if caller == resource_company => Ok(()),
        _ => Err(TenantError::Forbidden),
    }
}

/// Require the caller to belong to a company at all.
///
/// Used by list/create operations that scope to the caller rather than to an
/// existing resource.
pub fn require_company(caller_company: Option<CompanyId>) -> Result<CompanyId, TenantError> {
    caller_company.ok_or(TenantError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_company_is_allowed() {
        let company = CompanyId::new();
        assert!(authorize(company, Some(company)).is_ok());
    }

    #[test]
    fn test_mismatched_company_is_forbidden() {
        let resource = CompanyId::new();
        let caller = CompanyId::new();
        assert_eq!(authorize(resource, Some(caller)), Err(TenantError::Forbidden));
    }

    #[test]
    fn test_absent_caller_company_fails_closed() {
        assert_eq!(authorize(CompanyId::new(), None), Err(TenantError::Forbidden));
        assert_eq!(require_company(None), Err(TenantError::Forbidden));
    }

    #[test]
    fn test_require_company_returns_id() {
        let company = CompanyId::new();
        assert_eq!(require_company(Some(company)), Ok(company));
    }
}
