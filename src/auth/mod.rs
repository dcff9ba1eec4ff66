use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{JwtConfig, PasswordSaltDetails};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// The decoded, request-scoped identity derived from a bearer token.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub user_name: String,
    pub roles: Vec<String>,
}

impl SessionUser {
    /// Logical OR over the required set: any one matching role is enough.
    pub fn has_any_role(&self, required: &[&str]) -> bool {
        self.roles.iter().any(|r| required.contains(&r.as_str()))
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    MissingSigningKey,
    InvalidToken(String),
    TokenGeneration(String),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Missing bearer token"),
            AuthError::MissingSigningKey => write!(f, "JWT signing key not configured"),
            AuthError::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
            AuthError::TokenGeneration(msg) => write!(f, "Token generation error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Issue a token for `user_name` carrying `roles`, valid for the configured
/// lifetime. Issuer/audience claims are stamped in when configured so the
/// decode side can verify them.
pub fn encode_token(
    jwt: &JwtConfig,
    user_id: Uuid,
    user_name: &str,
    roles: Vec<String>,
) -> Result<String, AuthError> {
    if jwt.issuer_signing_key.is_empty() {
        return Err(AuthError::MissingSigningKey);
    }

    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        name: user_name.to_string(),
        roles,
        iss: jwt.valid_issuer.clone(),
        aud: jwt.valid_audience.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(jwt.life_time_minutes as i64)).timestamp(),
    };

    let key = EncodingKey::from_secret(jwt.issuer_signing_key.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Decode and validate a bearer token into a [`SessionUser`], honoring every
/// `JwtConfig` flag. Every failure mode (blank token, bad signature, wrong
/// issuer or audience, expired, malformed) is the same terminal error kind,
/// distinguishable only by message.
pub fn decode_token(jwt: &JwtConfig, token: &str) -> Result<SessionUser, AuthError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    if jwt.issuer_signing_key.is_empty() {
        return Err(AuthError::MissingSigningKey);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = jwt.validate_lifetime;
    validation.validate_aud = jwt.validate_audience;

    let mut required: Vec<&str> = Vec::new();
    if jwt.require_expiration_time {
        required.push("exp");
    }
    validation.set_required_spec_claims(&required);

    if jwt.validate_issuer {
        if let Some(iss) = &jwt.valid_issuer {
            validation.set_issuer(&[iss]);
        }
    }
    if jwt.validate_audience {
        if let Some(aud) = &jwt.valid_audience {
            validation.set_audience(&[aud]);
        }
    }
    if !jwt.validate_issuer_signing_key {
        validation.insecure_disable_signature_validation();
    }

    let key = DecodingKey::from_secret(jwt.issuer_signing_key.as_bytes());
    let data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(SessionUser {
        user_id: data.claims.sub,
        user_name: data.claims.name,
        roles: data.claims.roles,
    })
}

/// Salted iterated SHA-256, hex encoded. Matches what the login store keeps
/// on record for each user.
pub fn hash_password(salt: &PasswordSaltDetails, password: &str) -> String {
    let mut digest = format!("{}{}", salt.salt, password).into_bytes();
    for _ in 0..salt.iterations.max(1) {
        digest = Sha256::digest(&digest).to_vec();
    }
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
