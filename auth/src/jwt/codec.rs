use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::crypto;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Signed bearer token codec.
///
/// Issues and validates HS256 (HMAC with SHA-256) tokens. The signing secret
/// and token lifetime are fixed at construction and never change afterwards.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    lifetime: Duration,
}

impl TokenCodec {
    /// Create a new token codec.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    /// * `lifetime` - Time between issuance and expiry of every token
    ///
    /// # Returns
    /// TokenCodec instance configured with HS256 algorithm
    ///
    /// # Errors
    /// * `InvalidConfiguration` - Secret is empty or lifetime is not positive
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], lifetime: Duration) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidConfiguration(
                "signing secret must not be empty".to_string(),
            ));
        }
        if lifetime <= Duration::zero() {
            return Err(JwtError::InvalidConfiguration(format!(
                "token lifetime must be positive, got {} seconds",
                lifetime.num_seconds()
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            lifetime,
        })
    }

    /// Configured token lifetime.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `subject`, valid from now for the configured lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, subject: impl ToString) -> Result<String, JwtError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_at(&self, subject: impl ToString, now: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = Claims::for_subject(subject, now, self.lifetime);
        self.encode(&claims)
    }

    /// Sign an explicit claim set.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Parse a token, check its signature and expiry, and return its claims.
    ///
    /// # Errors
    /// * `MalformedToken` - Token is not a well-formed JWT with the expected claims
    /// * `InvalidSignature` - Token was not signed with this codec's secret
    /// * `TokenExpired` - Token expiry is at or before the current time
    pub fn parse_and_verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.parse_and_verify_at(token, Utc::now())
    }

    /// Same as [`TokenCodec::parse_and_verify`] with an explicit clock reading.
    pub fn parse_and_verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let (message, signature) = split_token(token)?;

        // Signature first, over the raw segments, so a tampered header or
        // payload is reported as a signature failure rather than a parse error.
        let signature_matches = crypto::verify(
            signature,
            message.as_bytes(),
            &self.decoding_key,
            self.algorithm,
        )
        .map_err(|e| JwtError::MalformedToken(e.to_string()))?;

        if !signature_matches {
            return Err(JwtError::InvalidSignature);
        }

        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                    ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                    _ => JwtError::MalformedToken(e.to_string()),
                }
            })?;

        let claims = token_data.claims;
        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}

/// Split `header.payload.signature` into the signed message and the signature.
fn split_token(token: &str) -> Result<(&str, &str), JwtError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments.iter().any(|segment| segment.is_empty()) {
        return Err(JwtError::MalformedToken(
            "expected three non-empty dot-separated segments".to_string(),
        ));
    }

    let (message, signature) = token
        .rsplit_once('.')
        .ok_or_else(|| JwtError::MalformedToken("missing signature segment".to_string()))?;

    Ok((message, signature))
}
