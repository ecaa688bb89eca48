//! Session token signing and verification.
//!
//! Tokens are HS256 JWTs with a fixed one-day validity. There are two
//! independent signing domains, one per role: admin tokens are signed and
//! verified with the admin key, worker tokens with the worker key.
//!
//! Verification is necessarily two-staged, because the role that selects
//! the verification key is itself only recoverable from the token body:
//!
//! 1. Decode the claims with signature validation disabled, purely to read
//!    the `role` claim. This stage authorizes nothing.
//! 2. Re-verify the full token (signature and expiry) under the key selected
//!    by that role. Only stage-2 success is authoritative.
//!
//! A forged role claim fails stage 2 under the selected key and is rejected
//! exactly like any other invalid token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use harvest_roster_core::{MemberId, Role};

use crate::config::SigningKeySet;

/// Session token validity: one day from signing.
const TOKEN_TTL_SECS: i64 = 86_400;

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Member ID the token was issued to.
    pub id: i32,
    /// Role at issuance; selects the verification key.
    pub role: Role,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds.
    pub exp: i64,
}

impl Claims {
    /// The member ID as a typed ID.
    #[must_use]
    pub const fn member_id(&self) -> MemberId {
        MemberId::new(self.id)
    }
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// Signs and verifies session tokens with role-selected keys.
///
/// Built once at startup from the immutable [`SigningKeySet`]; key material
/// never appears in logs or `Debug` output.
pub struct TokenCodec {
    admin: KeyPair,
    worker: KeyPair,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenCodec")
    }
}

impl TokenCodec {
    /// Build a codec from the configured signing key set.
    #[must_use]
    pub fn new(keys: &SigningKeySet) -> Self {
        Self {
            admin: KeyPair::from_secret(keys.admin.expose_secret().as_bytes()),
            worker: KeyPair::from_secret(keys.worker.expose_secret().as_bytes()),
        }
    }

    /// Pure key selection: the admin key for admins, the worker key
    /// otherwise.
    const fn select_key(&self, role: Role) -> &KeyPair {
        match role {
            Role::Admin => &self.admin,
            Role::Worker => &self.worker,
        }
    }

    /// Sign a session token for a member, valid for one day.
    ///
    /// # Errors
    ///
    /// Returns an error only if JWT serialization itself fails.
    pub fn sign(
        &self,
        id: MemberId,
        role: Role,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.sign_at(id, role, Utc::now())
    }

    fn sign_at(
        &self,
        id: MemberId,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            id: id.as_i32(),
            role,
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.select_key(role).encoding)
    }

    /// Verify a session token and return its claims.
    ///
    /// # Errors
    ///
    /// Fails when the token is malformed, its signature is invalid under the
    /// role-selected key, or it has expired. Callers collapse all of these
    /// into a single unauthenticated response.
    pub fn verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        // Stage 1: non-authoritative claims read, just to learn the role.
        let mut unverified = Validation::new(Algorithm::HS256);
        unverified.insecure_disable_signature_validation();
        unverified.validate_exp = false;
        unverified.required_spec_claims.clear();
        let peeked =
            jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &unverified)?;

        // Stage 2: authoritative verification under the role-selected key.
        let keys = self.select_key(peeked.claims.role);
        let verified =
            jsonwebtoken::decode::<Claims>(token, &keys.decoding, &Validation::new(Algorithm::HS256))?;

        Ok(verified.claims)
    }
}
