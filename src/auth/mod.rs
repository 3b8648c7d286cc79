/// Authentication module
///
/// Password hashing, token issuance and verification, and the access guard
/// used by every protected route.

mod claims;
mod clock;
mod guard;
mod jwt;
mod password;

pub use claims::Claims;
pub use clock::{Clock, MockClock, SystemClock};
pub use guard::{
    require_authenticated, require_owner, require_role, OwnerScope, ADMIN_ROLE, USER_ROLE,
};
pub use jwt::{TokenAuthority, TokenError};
pub use password::{
    check_password, compute_password_hash, decoy_hash, hash_password, verify_against_decoy,
    verify_password,
};
