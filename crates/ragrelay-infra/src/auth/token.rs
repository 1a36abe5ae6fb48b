//! HMAC-SHA256 signed bearer tokens.
//!
//! Implements `TokenIssuer` from `ragrelay-core`. A token is
//! `base64url(claims JSON) . base64url(HMAC-SHA256 over the encoded
//! claims)`. Verification is constant-time via the hmac crate's
//! `verify_slice`.
//!
//! Policy: tokens are long-lived (24 h default, configurable) and there
//! is no refresh flow. Claims carry only `{sub, iat, exp}`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use ragrelay_core::identity::service::TokenIssuer;
use ragrelay_types::error::AuthError;
use ragrelay_types::identity::TokenClaims;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256-backed implementation of `TokenIssuer`.
///
/// The signing secret never appears in Debug output (the struct does
/// not derive Debug, and the key is a `SecretString`).
pub struct HmacTokenSigner {
    secret: SecretString,
    ttl_secs: u64,
}

impl HmacTokenSigner {
    /// Create a signer with the given secret and token lifetime.
    pub fn new(secret: SecretString, ttl_secs: u64) -> Self {
        Self { secret, ttl_secs }
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }
}

impl TokenIssuer for HmacTokenSigner {
    fn issue(&self, username: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            sub: username.to_string(),
            iat: now,
            exp: now.saturating_add(ttl),
        };

        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&claims).map_err(|e| AuthError::TokenSigning(e.to_string()))?,
        );

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let (payload, signature) = token.split_once('.').ok_or(AuthError::InvalidToken)?;

        let signature_bytes = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature_bytes)
            .map_err(|_| AuthError::InvalidToken)?;

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims: TokenClaims =
            serde_json::from_slice(&claims_bytes).map_err(|_| AuthError::InvalidToken)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}
