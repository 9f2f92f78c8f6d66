use crate::{AccessClaims, AuthError, RefreshClaims, Result as AuthErrorResult};

use wf_core::{ErrorLocation, Identity};

use std::panic::Location;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

/// Signs and verifies the two bearer token classes.
///
/// Access and refresh tokens use separate HS256 secrets, so an access
/// token can never pass refresh verification or vice versa.
pub struct TokenCodec {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenCodec {
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 30; // 30 second clock skew tolerance

        Self {
            access_encoding: EncodingKey::from_secret(access_secret),
            access_decoding: DecodingKey::from_secret(access_secret),
            refresh_encoding: EncodingKey::from_secret(refresh_secret),
            refresh_decoding: DecodingKey::from_secret(refresh_secret),
            validation,
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Access token lifetime in seconds (drives cookie Max-Age)
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl_secs
    }

    /// Mint a short-lived access token for an identity
    #[track_caller]
    pub fn mint_access_token(&self, identity: &Identity) -> AuthErrorResult<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = AccessClaims {
            sub: identity.id.to_string(),
            full_name: identity.full_name.clone(),
            email: identity.email.clone(),
            role: identity.role.to_string(),
            exp: now + self.access_ttl_secs,
            iat: now,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding).map_err(|e| {
            AuthError::JwtEncode {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    /// Mint a long-lived refresh token; each call produces a distinct token
    #[track_caller]
    pub fn mint_refresh_token(&self, identity_id: Uuid) -> AuthErrorResult<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = RefreshClaims {
            sub: identity_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: now + self.refresh_ttl_secs,
            iat: now,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_encoding).map_err(|e| {
            AuthError::JwtEncode {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    /// Verify an access token and return its claims
    #[track_caller]
    pub fn verify_access_token(&self, token: &str) -> AuthErrorResult<AccessClaims> {
        let token_data = decode::<AccessClaims>(token, &self.access_decoding, &self.validation)
            .map_err(map_decode_error)?;

        token_data.claims.validate()?;

        Ok(token_data.claims)
    }

    /// Verify a refresh token signature and expiry and return its claims.
    ///
    /// Signature validity alone does not authorize a refresh: the caller
    /// must still compare the presented token against the stored one.
    #[track_caller]
    pub fn verify_refresh_token(&self, token: &str) -> AuthErrorResult<RefreshClaims> {
        let token_data = decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation)
            .map_err(map_decode_error)?;

        token_data.claims.validate()?;

        Ok(token_data.claims)
    }
}

#[track_caller]
fn map_decode_error(e: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;
    match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired {
            location: ErrorLocation::from(Location::caller()),
        },
        _ => AuthError::JwtDecode {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        },
    }
}
