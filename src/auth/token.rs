//! Token Issuer
//!
//! Signs and decodes HMAC JWTs binding a bearer to an account number.
//!
//! Decoding is split into the same steps the authenticator walks through:
//! the header algorithm is mapped to [`HmacAlgorithm`] before any signature
//! work, then the signature is checked and the payload is decoded into the
//! typed [`Claims`], and finally the expiry is compared to the clock.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::JwtSecret;
use crate::domain::{Account, AccountNumber};

/// Hex characters of the SHA-256 digest kept by [`fingerprint`]
const FINGERPRINT_LEN: usize = 12;

/// The only signing algorithms tokens may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HmacAlgorithm {
    Hs256,
    Hs384,
    Hs512,
}

impl HmacAlgorithm {
    /// Map a header algorithm onto the HMAC family, `None` for anything else.
    pub fn from_header(alg: Algorithm) -> Option<Self> {
        match alg {
            Algorithm::HS256 => Some(Self::Hs256),
            Algorithm::HS384 => Some(Self::Hs384),
            Algorithm::HS512 => Some(Self::Hs512),
            _ => None,
        }
    }

    pub fn as_jwt(self) -> Algorithm {
        match self {
            Self::Hs256 => Algorithm::HS256,
            Self::Hs384 => Algorithm::HS384,
            Self::Hs512 => Algorithm::HS512,
        }
    }
}

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Claims {
    pub account_number: AccountNumber,
    /// Unix timestamp (seconds)
    pub expires_at: i64,
}

impl Claims {
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),

    #[error("token is malformed")]
    Malformed,

    #[error("unsupported signing algorithm: {0:?}")]
    UnsupportedAlgorithm(Algorithm),

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token claims are invalid")]
    InvalidClaims,

    #[error("token expired")]
    Expired,
}

/// Issues and decodes tokens with the process-wide shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: HmacAlgorithm,
    ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &JwtSecret, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm: HmacAlgorithm::Hs256,
            ttl,
        }
    }

    /// Mint a token for `account`, valid for the configured ttl.
    pub fn issue(&self, account: &Account) -> Result<String, TokenError> {
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            account_number: account.number,
            expires_at: Utc::now().timestamp().saturating_add(ttl),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims with the configured algorithm.
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(self.algorithm.as_jwt()), claims, &self.encoding)
            .map_err(TokenError::Signing)
    }

    /// Read the header and return its algorithm if it is in the HMAC family.
    ///
    /// No signature work happens here.
    pub fn check_algorithm(&self, token: &str) -> Result<HmacAlgorithm, TokenError> {
        let header = jsonwebtoken::decode_header(token).map_err(|_| TokenError::Malformed)?;
        HmacAlgorithm::from_header(header.alg).ok_or(TokenError::UnsupportedAlgorithm(header.alg))
    }

    /// Verify the signature under `algorithm` and decode the typed claims.
    ///
    /// Expiry is not checked here, see [`TokenService::check_expiry`].
    pub fn verify_signature(
        &self,
        token: &str,
        algorithm: HmacAlgorithm,
    ) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(algorithm.as_jwt());
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => TokenError::UnsupportedAlgorithm(algorithm.as_jwt()),
                ErrorKind::Json(_) => TokenError::InvalidClaims,
                _ => TokenError::Malformed,
            })
    }

    pub fn check_expiry(&self, claims: &Claims) -> Result<(), TokenError> {
        if claims.is_expired_at(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }
        Ok(())
    }

    /// Run every check and return the claims of a valid token.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let algorithm = self.check_algorithm(token)?;
        let claims = self.verify_signature(token, algorithm)?;
        self.check_expiry(&claims)?;
        Ok(claims)
    }
}

/// Short SHA-256 fingerprint of a token, safe to log.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}
