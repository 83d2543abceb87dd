//! Access token signing and refresh token generation

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use sk_shared::config::auth::{
    DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES, DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
    MAX_ACCESS_TOKEN_EXPIRY_MINUTES, MAX_REFRESH_TOKEN_EXPIRY_DAYS,
};
use sk_shared::JwtConfig;

use crate::domain::entities::token::{
    hash_token_value, AccessToken, Claims, IssuedRefreshToken, RefreshToken, REFRESH_TOKEN_BYTES,
};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::services::clock::{Clock, SystemClock};
use crate::services::random::{OsSecureRandom, SecureRandom};

/// Signs access tokens and generates refresh tokens
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
    audience: Option<String>,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
    random: Arc<dyn SecureRandom>,
}

impl TokenSigner {
    /// Creates a signer backed by the system clock and OS randomness
    ///
    /// # Returns
    ///
    /// `DomainError::Configuration` if no signing secret is configured or a
    /// lifetime exceeds its maximum
    pub fn new(config: &JwtConfig) -> DomainResult<Self> {
        Self::with_sources(config, Arc::new(SystemClock), Arc::new(OsSecureRandom))
    }

    /// Creates a signer with explicit time and randomness sources
    pub fn with_sources(
        config: &JwtConfig,
        clock: Arc<dyn Clock>,
        random: Arc<dyn SecureRandom>,
    ) -> DomainResult<Self> {
        let secret = config.signing_secret().ok_or_else(|| DomainError::Configuration {
            message: "JWT signing secret is not configured".to_string(),
        })?;

        let access_ttl = lifetime(
            "access token",
            config.access_token_expiry_minutes,
            DEFAULT_ACCESS_TOKEN_EXPIRY_MINUTES,
            MAX_ACCESS_TOKEN_EXPIRY_MINUTES,
            Duration::try_minutes,
        )?;
        let refresh_ttl = lifetime(
            "refresh token",
            config.refresh_token_expiry_days,
            DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
            MAX_REFRESH_TOKEN_EXPIRY_DAYS,
            Duration::try_days,
        )?;

        // Expiry and not-before are checked against the injected clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        match &config.issuer {
            Some(issuer) => validation.set_issuer(&[issuer]),
            None => validation.iss = None,
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            access_ttl,
            refresh_ttl,
            clock,
            random,
        })
    }

    /// Current instant according to the signer's clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Access token lifetime in minutes
    pub fn access_ttl_minutes(&self) -> i64 {
        self.access_ttl.num_minutes()
    }

    /// Refresh token lifetime in days
    pub fn refresh_ttl_days(&self) -> i64 {
        self.refresh_ttl.num_days()
    }

    /// Mints a signed access token for a user
    ///
    /// `exp` is exactly `iat` plus the access lifetime.
    pub fn issue_access_token(&self, user: &User) -> DomainResult<AccessToken> {
        let issued_at = self.clock.now();
        let expires_at = expiry(issued_at, self.access_ttl)?;
        let jti = Uuid::new_v4();

        let claims = Claims::for_user(
            user,
            jti,
            issued_at,
            expires_at,
            self.issuer.clone(),
            self.audience.clone(),
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "Failed to sign access token");
                DomainError::Token(TokenError::TokenGenerationFailed)
            })?;

        Ok(AccessToken {
            token,
            jti,
            issued_at,
            expires_at,
        })
    }

    /// Generates a refresh token value and its unsaved record
    pub fn issue_refresh_token(&self, user_id: Uuid) -> DomainResult<IssuedRefreshToken> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        self.random.fill_bytes(&mut bytes);
        let value = STANDARD.encode(bytes);

        let created_at = self.clock.now();
        let record = RefreshToken::new(
            user_id,
            hash_token_value(&value),
            created_at,
            expiry(created_at, self.refresh_ttl)?,
        );

        Ok(IssuedRefreshToken { value, record })
    }

    /// Verifies an access token and returns its claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Signature, issuer, audience and lifetime are valid
    /// * `Err(TokenError)` - Token is expired, not yet valid, or invalid
    pub fn verify_access_token(&self, token: &str) -> DomainResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| DomainError::Token(map_jwt_error(e.kind())))?;
        let claims = token_data.claims;

        let now = self.clock.now().timestamp();
        if now >= claims.exp {
            return Err(DomainError::Token(TokenError::TokenExpired));
        }
        if now < claims.nbf {
            return Err(DomainError::Token(TokenError::TokenNotYetValid));
        }

        Ok(claims)
    }
}

fn map_jwt_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
        ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::MissingRequiredClaim(_) => {
            TokenError::InvalidClaims
        }
        _ => TokenError::InvalidTokenFormat,
    }
}

/// Resolves a configured lifetime; zero or negative means the default
fn lifetime(
    name: &str,
    value: i64,
    default: i64,
    max: i64,
    to_duration: fn(i64) -> Option<Duration>,
) -> DomainResult<Duration> {
    let value = if value > 0 { value } else { default };
    if value > max {
        return Err(DomainError::Configuration {
            message: format!("{} lifetime {} exceeds the maximum of {}", name, value, max),
        });
    }

    to_duration(value).ok_or_else(|| DomainError::Configuration {
        message: format!("{} lifetime {} is out of range", name, value),
    })
}

fn expiry(from: DateTime<Utc>, ttl: Duration) -> DomainResult<DateTime<Utc>> {
    from.checked_add_signed(ttl).ok_or_else(|| {
        tracing::error!(from = %from, "Token expiry is out of range");
        DomainError::Token(TokenError::TokenGenerationFailed)
    })
}
