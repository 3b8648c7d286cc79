/// Token claims
///
/// `Claims` is the verified, strongly typed view of a token: every field is
/// required. Tokens are first decoded into `RawClaims`, where everything is
/// optional, so that a missing or null claim surfaces as
/// `TokenError::MissingClaims` instead of a generic decode failure.

use serde::{Deserialize, Serialize};

use crate::auth::TokenError;

/// Identity and role carried by an access token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// User id at issuance time
    pub id: i64,
    /// Role at issuance time; not refreshed if the stored role changes
    pub role: String,
    /// Expiration time (Unix timestamp, UTC)
    pub exp: i64,
    /// Issued at (Unix timestamp, UTC)
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> i64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.sub
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawClaims {
    pub sub: Option<String>,
    pub id: Option<i64>,
    pub role: Option<String>,
    pub exp: Option<i64>,
    pub iat: Option<i64>,
}

impl TryFrom<RawClaims> for Claims {
    type Error = TokenError;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        match (raw.sub, raw.id, raw.role, raw.exp) {
            (Some(sub), Some(id), Some(role), Some(exp)) => Ok(Claims {
                sub,
                id,
                role,
                exp,
                iat: raw.iat.unwrap_or_default(),
            }),
            _ => Err(TokenError::MissingClaims),
        }
    }
}
