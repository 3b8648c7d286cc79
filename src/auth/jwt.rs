/// JWT Token Generation and Validation
///
/// `TokenAuthority` owns the signing key, the access token lifetime and the
/// clock. It is built once from `JwtSettings` at startup and shared by the
/// login route and the bearer middleware.

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use std::sync::Arc;

use crate::auth::claims::RawClaims;
use crate::auth::{Claims, Clock};
use crate::configuration::JwtSettings;
use crate::error::AppError;

/// Why a presented token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Not a well-formed signed token
    Malformed,
    BadSignature,
    Expired,
    /// Subject, id, role or expiry absent or null
    MissingClaims,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Malformed => write!(f, "malformed token"),
            TokenError::BadSignature => write!(f, "signature mismatch"),
            TokenError::Expired => write!(f, "token expired"),
            TokenError::MissingClaims => write!(f, "required claims missing"),
        }
    }
}

impl std::error::Error for TokenError {}

pub struct TokenAuthority {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenAuthority {
    pub fn new(config: &JwtSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_ttl: Duration::seconds(config.access_token_expiry),
            clock,
        }
    }

    /// Lifetime of tokens handed out by `issue_access_token`
    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    /// Issue a token with the configured lifetime
    pub fn issue_access_token(
        &self,
        subject: &str,
        user_id: i64,
        role: &str,
    ) -> Result<String, AppError> {
        self.issue(subject, user_id, role, self.access_token_ttl)
    }

    /// Sign a claim set `{sub, id, role, exp, iat}` with HS256
    ///
    /// # Errors
    /// `AppError::InvalidArgument` for an empty subject or role, a
    /// non-positive user id, or a non-positive ttl
    pub fn issue(
        &self,
        subject: &str,
        user_id: i64,
        role: &str,
        ttl: Duration,
    ) -> Result<String, AppError> {
        if subject.is_empty() {
            return Err(AppError::InvalidArgument("subject must not be empty".into()));
        }
        if user_id <= 0 {
            return Err(AppError::InvalidArgument("user id must be positive".into()));
        }
        if role.is_empty() {
            return Err(AppError::InvalidArgument("role must not be empty".into()));
        }
        if ttl <= Duration::zero() {
            return Err(AppError::InvalidArgument("ttl must be positive".into()));
        }

        let now = self.clock.now();
        let claims = Claims {
            sub: subject.to_string(),
            id: user_id,
            role: role.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
    }

    /// Check structure, signature, expiry and required claims, in that order
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        // Expiry is checked below against the injected clock, without leeway.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let raw = decode::<RawClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                let kind = classify(e.kind());
                tracing::debug!(error = %e, kind = %kind, "JWT validation error");
                kind
            })?
            .claims;

        let exp = raw.exp.ok_or(TokenError::MissingClaims)?;
        if self.clock.now().timestamp() >= exp {
            return Err(TokenError::Expired);
        }

        Claims::try_from(raw)
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        _ => TokenError::Malformed,
    }
}
