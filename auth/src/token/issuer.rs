use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Signed token issuer and verifier.
///
/// Generic over the claim set so both session and reset tokens share one
/// implementation. Uses HS256 (HMAC with SHA-256).
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl TokenIssuer {
    /// Create a new issuer with a signing key.
    ///
    /// The key is explicit constructor input rather than process-wide
    /// configuration; the secret should be at least 256 bits for HS256 and
    /// come from the environment or a vault, never from user input.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Encode claims into a signed token string.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a token.
    ///
    /// Checks signature integrity and expiry with zero leeway. The failure is
    /// typed so callers can distinguish an out-of-date token from a forged or
    /// garbled one.
    ///
    /// # Errors
    /// * `Expired` - The `exp` claim has passed
    /// * `BadSignature` - Signature does not verify under this key
    /// * `Malformed` - Not a token, or claims do not match the expected shape
    pub fn verify<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data =
            decode::<T>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::claims::ResetClaims;
    use crate::token::claims::SessionClaims;
    use crate::token::claims::TokenPurpose;

    #[test]
    fn test_issue_and_verify_session() {
        let issuer = TokenIssuer::new(b"my_secret_key_at_least_32_bytes_long!");

        let claims = SessionClaims::new("user123", Some("company456".to_string()), 2);
        let token = issuer.issue(&claims).expect("Failed to issue token");
        assert!(!token.is_empty());

        let decoded: SessionClaims = issuer.verify(&token).expect("Failed to verify token");
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_issue_and_verify_reset() {
        let issuer = TokenIssuer::new(b"my_secret_key_at_least_32_bytes_long!");

        let claims = ResetClaims::new("user123", 15);
        let token = issuer.issue(&claims).expect("Failed to issue token");

        let decoded: ResetClaims = issuer.verify(&token).expect("Failed to verify token");
        assert_eq!(decoded.sub, "user123");
        assert_eq!(decoded.purpose, TokenPurpose::Reset);
    }

    #[test]
    fn test_verify_garbage_is_malformed() {
        let issuer = TokenIssuer::new(b"my_secret_key_at_least_32_bytes_long!");

        let result = issuer.verify::<SessionClaims>("invalid.token.here");
        assert!(matches!(result, Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_verify_with_wrong_key_is_bad_signature() {
        let issuer1 = TokenIssuer::new(b"secret1_at_least_32_bytes_long_key!");
        let issuer2 = TokenIssuer::new(b"secret2_at_least_32_bytes_long_key!");

        let claims = SessionClaims::new("user123", None, 2);
        let token = issuer1.issue(&claims).expect("Failed to issue token");

        let result = issuer2.verify::<SessionClaims>(&token);
        assert_eq!(result, Err(TokenError::BadSignature));
    }

    #[test]
    fn test_verify_elapsed_ttl_is_expired() {
        let issuer = TokenIssuer::new(b"my_secret_key_at_least_32_bytes_long!");

        // Already past its expiry at issue time
        let claims = ResetClaims::new("user123", -2);
        let token = issuer.issue(&claims).expect("Failed to issue token");

        let result = issuer.verify::<ResetClaims>(&token);
        assert_eq!(result, Err(TokenError::Expired));
    }
}
