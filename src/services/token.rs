// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token codec.
//!
//! Tokens are compact HS256 JWTs: `header.claims.signature`, each segment
//! URL-safe base64 without padding. The signing algorithm is fixed; a header
//! naming anything else is rejected before the MAC is even computed.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::models::User;

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// The only accepted `alg` header value.
pub const ALGORITHM: &str = "HS256";

/// Session lifetime (7 days).
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionClaims {
    /// Internal user id
    pub user_id: String,
    /// GitHub user id
    pub github_id: String,
    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for `user`, expiring [`SESSION_TTL_SECS`] after `now`.
    pub fn issue(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id.clone(),
            github_id: user.github_id.clone(),
            exp: now.timestamp() + SESSION_TTL_SECS,
        }
    }
}

/// Token verification failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid token format")]
    Malformed,

    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid signature")]
    BadSignature,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token claims: {0}")]
    Claims(String),
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign `claims` into a token.
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let header_json =
            serde_json::to_vec(&header).map_err(|e| TokenError::Claims(e.to_string()))?;
        let claims_json =
            serde_json::to_vec(claims).map_err(|e| TokenError::Claims(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(claims_json)
        );
        let signature = self.signature(&signing_input);

        Ok(format!("{}.{}", signing_input, signature))
    }

    /// Verify a token against the current time and decode its claims.
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        self.verify_at(token, Utc::now().timestamp_millis())
    }

    /// Verify a token as of `now_ms` (Unix milliseconds).
    ///
    /// A token whose claims carry `exp` is expired once
    /// `now_ms >= exp * 1000`.
    pub fn verify_at<T: DeserializeOwned>(&self, token: &str, now_ms: i64) -> Result<T, TokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        let [encoded_header, encoded_claims, signature] = parts[..] else {
            return Err(TokenError::Malformed);
        };

        let header: Header = decode_segment(encoded_header)?;
        if header.alg != ALGORITHM {
            return Err(TokenError::UnsupportedAlgorithm(header.alg));
        }

        let expected = self.signature(&format!("{}.{}", encoded_header, encoded_claims));
        if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
            return Err(TokenError::BadSignature);
        }

        let claims: serde_json::Value = decode_segment(encoded_claims)?;
        if let Some(exp) = claims.get("exp") {
            let exp = exp
                .as_f64()
                .ok_or_else(|| TokenError::Claims("exp is not a number".to_string()))?;
            if now_ms as f64 >= exp * 1000.0 {
                return Err(TokenError::Expired);
            }
        }

        serde_json::from_value(claims).map_err(|e| TokenError::Claims(e.to_string()))
    }

    fn signature(&self, signing_input: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
        mac.update(signing_input.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| TokenError::Malformed)
}
