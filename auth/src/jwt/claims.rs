use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Bearer token claims.
///
/// Every field is required: a token without a subject or an expiry never
/// validates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique token identifier)
    pub jti: String,
}

impl Claims {
    /// Create claims for a subject issued at `issued_at`.
    ///
    /// # Arguments
    /// * `subject` - Unique subject identifier
    /// * `issued_at` - Issuance instant
    /// * `lifetime` - Time until the token expires
    ///
    /// # Returns
    /// Claims with `exp = iat + lifetime` and a fresh token ID
    pub fn for_subject(subject: impl ToString, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        let expiration = issued_at + lifetime;

        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if token is expired.
    ///
    /// A token is no longer valid at the instant of its expiry.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}
