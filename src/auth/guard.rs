/// Access guard
///
/// Three checks, applied in this order by protected routes:
/// authenticated (bearer middleware), role (admin routes), owner (todo
/// lookups). Ownership is never checked after a fetch; store queries take an
/// `OwnerScope` and filter on it, so another user's row and a missing row
/// both come back as "not found".

use crate::auth::Claims;
use crate::error::{AppError, AuthError};

pub const ADMIN_ROLE: &str = "admin";
pub const USER_ROLE: &str = "user";

/// Turn the verifier outcome into an authenticated identity
pub fn require_authenticated(claims: Option<Claims>) -> Result<Claims, AuthError> {
    claims.ok_or(AuthError::MissingToken)
}

/// Exact, case-sensitive role match
pub fn require_role(claims: &Claims, role: &str) -> Result<(), AuthError> {
    if claims.has_role(role) {
        Ok(())
    } else {
        tracing::warn!(
            user_id = claims.id,
            role = %claims.role,
            required = role,
            "Role check failed"
        );
        Err(AuthError::Forbidden)
    }
}

/// Identity that owner-scoped store queries filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope {
    owner_id: i64,
}

impl OwnerScope {
    pub fn of(claims: &Claims) -> Self {
        Self { owner_id: claims.id }
    }

    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }
}

/// Map an empty owner-scoped lookup to 404
pub fn require_owner<T>(found: Option<T>, resource: &str) -> Result<T, AppError> {
    found.ok_or_else(|| AppError::not_found(resource))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_role(role: &str) -> Claims {
        Claims {
            sub: "alice".to_string(),
            id: 3,
            role: role.to_string(),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_require_authenticated() {
        assert_eq!(require_authenticated(None), Err(AuthError::MissingToken));

        let claims = claims_with_role(USER_ROLE);
        assert_eq!(require_authenticated(Some(claims.clone())), Ok(claims));
    }

    #[test]
    fn test_admin_passes_role_check() {
        assert!(require_role(&claims_with_role(ADMIN_ROLE), ADMIN_ROLE).is_ok());
    }

    #[test]
    fn test_user_fails_admin_check() {
        assert_eq!(
            require_role(&claims_with_role(USER_ROLE), ADMIN_ROLE),
            Err(AuthError::Forbidden)
        );
    }

    #[test]
    fn test_role_check_is_exact() {
        for role in ["Admin", "ADMIN", "admin ", " admin", "administrator", ""] {
            assert_eq!(
                require_role(&claims_with_role(role), ADMIN_ROLE),
                Err(AuthError::Forbidden),
                "role {:?} must not pass as admin",
                role
            );
        }
    }

    #[test]
    fn test_owner_scope_comes_from_claims() {
        let scope = OwnerScope::of(&claims_with_role(USER_ROLE));
        assert_eq!(scope.owner_id(), 3);
    }

    #[test]
    fn test_require_owner_maps_none_to_not_found() {
        assert_eq!(require_owner(Some(5), "Todo").unwrap(), 5);

        let err = require_owner::<i32>(None, "Todo").unwrap_err();
        assert_eq!(err.to_string(), "Todo not found");
    }
}
