use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::{error::AppError, models::user::Claims};

/// How long an access token stays valid after login.
pub const TOKEN_TTL_MINUTES: i64 = 30;

/// HS256 signing material, built once from the configured secret and shared
/// read-only by every request.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::minutes(TOKEN_TTL_MINUTES),
        }
    }

    /// Sign a token for `subject` that expires one TTL from now.
    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        self.issue_until(subject, Utc::now() + self.ttl)
    }

    /// Sign a token for `subject` with an explicit absolute expiry. Expiries
    /// before the Unix epoch are clamped to 0, which is already expired.
    pub fn issue_until(
        &self,
        subject: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: usize::try_from(expires_at.timestamp()).unwrap_or(0),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Check signature and expiry and return the subject. Every failure is
    /// `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<String, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!("Rejected token: {}", e);
            AppError::Unauthorized
        })?;

        if data.claims.sub.is_empty() {
            return Err(AppError::Unauthorized);
        }
        Ok(data.claims.sub)
    }
}
