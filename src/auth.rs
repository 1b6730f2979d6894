//! Password hashing, access tokens and reset-code digests

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::{SaltString, rand_core::OsRng},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use uuid::Uuid;

use crate::prelude::*;

pub fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|err| Error::Internal(format!("password hashing failed: {err}")))
}

/// A malformed stored hash verifies as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash)
    .map(|parsed| {
      Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
    })
    .unwrap_or(false)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
  pub id: i32,
  pub iat: i64,
  pub exp: i64,
}

/// HS256 signing material derived from the server secret.
pub struct Keys {
  encoding: EncodingKey,
  decoding: DecodingKey,
  secret: Vec<u8>,
  ttl: Duration,
}

impl Keys {
  pub fn new(secret: &str, ttl: Duration) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      secret: secret.as_bytes().to_vec(),
      ttl,
    }
  }

  pub fn issue(&self, user_id: i32) -> Result<String> {
    let iat = Utc::now().timestamp();
    let claims =
      Claims { id: user_id, iat, exp: iat + self.ttl.as_secs() as i64 };

    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(|err| Error::Internal(format!("token signing failed: {err}")))
  }

  pub fn verify(&self, token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)
      .map(|data| data.claims)
      .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => Auth::TokenExpired.into(),
        _ => Auth::InvalidToken.into(),
      })
  }

  fn mac(&self) -> Hmac<Sha256> {
    <Hmac<Sha256> as Mac>::new_from_slice(&self.secret)
      .expect("HMAC accepts keys of any length")
  }

  /// Base64 HMAC-SHA256 of a reset code, the only form that is stored.
  pub fn reset_digest(&self, code: &str) -> String {
    let mut mac = self.mac();
    mac.update(code.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
  }

  /// Constant-time comparison against a stored digest.
  pub fn verify_reset(&self, code: &str, digest: &str) -> bool {
    let Ok(expected) = STANDARD.decode(digest) else {
      return false;
    };
    let mut mac = self.mac();
    mac.update(code.as_bytes());
    mac.verify_slice(&expected).is_ok()
  }
}

/// Six-digit numeric reset code.
pub fn reset_code() -> String {
  let n = Uuid::new_v4().as_u128() % 900_000 + 100_000;
  n.to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_password_roundtrip() {
    let hash = hash_password("secret1").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("secret1", &hash));
    assert!(!verify_password("secret2", &hash));
    assert!(!verify_password("secret1", "not-a-phc-string"));
  }

  #[test]
  fn test_token_issue_and_verify() {
    let keys = Keys::new("test-secret", Duration::from_secs(3600));
    let token = keys.issue(42).unwrap();

    let claims = keys.verify(&token).unwrap();
    assert_eq!(claims.id, 42);
    assert_eq!(claims.exp - claims.iat, 3600);

    let other = Keys::new("other-secret", Duration::from_secs(3600));
    assert!(matches!(other.verify(&token), Err(Error::Auth(Auth::InvalidToken))));
    assert!(matches!(keys.verify("garbage"), Err(Error::Auth(Auth::InvalidToken))));
  }

  #[test]
  fn test_expired_token() {
    let keys = Keys::new("test-secret", Duration::from_secs(3600));
    let iat = Utc::now().timestamp() - 7200;
    let claims = Claims { id: 1, iat, exp: iat + 60 };
    let token =
      jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
        .unwrap();

    assert!(matches!(keys.verify(&token), Err(Error::Auth(Auth::TokenExpired))));
  }

  #[test]
  fn test_reset_code_and_digest() {
    for _ in 0..32 {
      let code = reset_code();
      assert_eq!(code.len(), 6);
      assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    let keys = Keys::new("test-secret", Duration::from_secs(60));
    let digest = keys.reset_digest("123456");
    assert_ne!(digest, "123456");
    assert!(keys.verify_reset("123456", &digest));
    assert!(!keys.verify_reset("654321", &digest));
    assert!(!keys.verify_reset("123456", "%%%"));
  }
}
