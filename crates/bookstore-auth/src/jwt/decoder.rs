//! JWT verification and `Authorization` header parsing.

use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::error::AuthError;

use super::claims::{Claims, TokenKind};

/// Verifies tokens against the access or refresh secret.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC key for access tokens.
    access_key: DecodingKey,
    /// HMAC key for refresh tokens.
    refresh_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl JwtDecoder {
    /// Creates a decoder. Secrets are validated by the caller.
    pub(crate) fn new(access_secret: &str, refresh_secret: &str) -> Self {
        // Any HMAC-SHA2 variant is accepted; other families are rejected
        // before the signature is checked.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            access_key: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Verifies a token signed with the secret for `kind`.
    pub fn verify(&self, kind: TokenKind, token: &str) -> Result<Claims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Malformed("empty token".to_string()));
        }
        let key = match kind {
            TokenKind::Access => &self.access_key,
            TokenKind::Refresh => &self.refresh_key,
        };

        decode::<Claims>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::Expired,
                JwtErrorKind::InvalidSignature
                | JwtErrorKind::InvalidAlgorithm
                | JwtErrorKind::InvalidAlgorithmName
                | JwtErrorKind::MissingAlgorithm => AuthError::InvalidSignature,
                _ => AuthError::Malformed(e.to_string()),
            })
    }
}

/// Splits `<scheme> <token>` and returns the token.
///
/// The header must be exactly two non-empty parts joined by a single
/// space. Anything else is `Malformed`, with no signature work done.
pub fn bearer_token(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if !scheme.is_empty() && !token.is_empty() => Ok(token),
        _ => Err(AuthError::Malformed(
            "authorization header must be '<scheme> <token>'".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_two_parts() {
        assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token("Token abc.def.ghi").unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_rejects_other_shapes() {
        for header in [
            "",
            "abc.def.ghi",
            "Bearer",
            "Bearer ",
            " abc.def.ghi",
            "Bearer a b",
            "Bearer  abc.def.ghi",
            "Bearer\tabc.def.ghi",
            " Bearer abc.def.ghi",
            "Bearer abc.def.ghi ",
        ] {
            assert!(
                matches!(bearer_token(header), Err(AuthError::Malformed(_))),
                "header {header:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_verify_empty_token_is_malformed() {
        let decoder = JwtDecoder::new("a", "r");
        assert!(matches!(
            decoder.verify(TokenKind::Access, ""),
            Err(AuthError::Malformed(_))
        ));
    }
}
