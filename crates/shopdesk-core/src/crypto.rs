//! # 세션 봉인 모듈
//!
//! 세션 쿠키 값을 서명(JWT HS256) 후 AES-256-GCM으로 암호화합니다.
//!
//! ## 형식
//! - 평문: `Session`을 클레임으로 하는 JWT
//! - 쿠키 값: `base64url(nonce(12바이트) ‖ ciphertext)`
//! - AES 키: 세션 시크릿의 SHA-256 다이제스트
//!
//! ## 보안 고려사항
//! - 각 봉인마다 고유한 nonce 사용
//! - 복호화 시 GCM 태그, JWT 서명, `exp`를 모두 검증

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::Engine;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::domain::Session;

/// 세션 시크릿 최소 길이 (바이트)
pub const MIN_SECRET_LEN: usize = 32;

/// AES-256-GCM nonce 크기 (바이트)
pub const NONCE_SIZE: usize = 12;

/// 봉인/해제 에러
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Session secret too short: expected at least {MIN_SECRET_LEN} bytes, got {0}")]
    SecretTooShort(usize),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Malformed session token")]
    Malformed,

    #[error("Session token expired")]
    Expired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// 세션 쿠키 봉인 관리자.
///
/// 시크릿 하나로 JWT 서명 키와 AES 키를 모두 파생합니다.
#[derive(Clone)]
pub struct SessionSealer {
    cipher: Aes256Gcm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionSealer {
    /// 세션 시크릿으로 봉인 관리자 생성.
    ///
    /// # Errors
    /// 시크릿이 32바이트보다 짧으면 `CryptoError::SecretTooShort`를 반환합니다.
    pub fn new(secret: &SecretString) -> Result<Self, CryptoError> {
        let raw = secret.expose_secret().as_bytes();
        if raw.len() < MIN_SECRET_LEN {
            return Err(CryptoError::SecretTooShort(raw.len()));
        }

        let key = Sha256::digest(raw);
        let cipher = Aes256Gcm::new_from_slice(&key)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        Ok(Self {
            cipher,
            encoding_key: EncodingKey::from_secret(raw),
            decoding_key: DecodingKey::from_secret(raw),
        })
    }

    /// 임의의 클레임을 HS256으로 서명.
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, CryptoError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| CryptoError::Encoding(e.to_string()))
    }

    /// HS256 서명된 토큰 검증 및 디코딩 (`exp` 검증 포함).
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<T, CryptoError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation.required_spec_claims.insert("exp".to_string());

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => CryptoError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    CryptoError::InvalidSignature
                }
                _ => CryptoError::Malformed,
            })
    }

    /// 세션을 쿠키 값으로 봉인.
    pub fn seal(&self, session: &Session) -> Result<String, CryptoError> {
        let jwt = self.sign(session)?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, jwt.as_bytes())
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

        let mut packed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        packed.extend_from_slice(&nonce_bytes);
        packed.extend_from_slice(&ciphertext);

        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(packed))
    }

    /// 쿠키 값에서 세션 복원.
    pub fn open(&self, value: &str) -> Result<Session, CryptoError> {
        let packed = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(value.trim())
            .map_err(|_| CryptoError::Malformed)?;

        if packed.len() <= NONCE_SIZE {
            return Err(CryptoError::Malformed);
        }

        let (nonce_bytes, ciphertext) = packed.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        let jwt = String::from_utf8(plaintext).map_err(|_| CryptoError::Malformed)?;
        self.verify::<Session>(&jwt)
    }
}

/// 새로운 세션 시크릿 생성 (초기 설정용)
///
/// # Example
/// ```
/// let secret = shopdesk_core::crypto::generate_session_secret();
/// println!("SESSION_SECRET={}", secret);
/// ```
pub fn generate_session_secret() -> String {
    let mut key = [0u8; 48];
    OsRng.fill_bytes(&mut key);
    base64::engine::general_purpose::STANDARD.encode(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{sample_profile, Role};
    use chrono::Duration;

    fn test_sealer() -> SessionSealer {
        SessionSealer::new(&SecretString::from(generate_session_secret())).unwrap()
    }

    #[test]
    fn test_seal_and_open_session() {
        let sealer = test_sealer();
        let session = Session::new(sample_profile(Role::Vendor), "backend-token", Duration::days(1));

        let cookie = sealer.seal(&session).unwrap();
        assert!(!cookie.contains("backend-token"));

        let opened = sealer.open(&cookie).unwrap();
        assert_eq!(opened, session);
    }

    #[test]
    fn test_unique_nonce_per_seal() {
        let sealer = test_sealer();
        let session = Session::new(sample_profile(Role::Admin), "tok", Duration::days(1));

        let a = sealer.seal(&session).unwrap();
        let b = sealer.seal(&session).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_tampered_cookie_rejected() {
        let sealer = test_sealer();
        let session = Session::new(sample_profile(Role::Admin), "tok", Duration::days(1));
        let cookie = sealer.seal(&session).unwrap();

        let mut bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(&cookie)
            .unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);

        assert!(matches!(
            sealer.open(&tampered),
            Err(CryptoError::DecryptionFailed)
        ));
    }

    #[test]
    fn test_cookie_from_other_secret_rejected() {
        let session = Session::new(sample_profile(Role::Admin), "tok", Duration::days(1));
        let cookie = test_sealer().seal(&session).unwrap();

        assert!(test_sealer().open(&cookie).is_err());
    }

    #[test]
    fn test_expired_session_rejected() {
        let sealer = test_sealer();
        let session = Session::new(sample_profile(Role::Admin), "tok", Duration::seconds(-60));
        let cookie = sealer.seal(&session).unwrap();

        assert!(matches!(sealer.open(&cookie), Err(CryptoError::Expired)));
    }

    #[test]
    fn test_garbage_rejected() {
        let sealer = test_sealer();
        assert!(matches!(sealer.open("not base64!!"), Err(CryptoError::Malformed)));
        assert!(matches!(sealer.open("AAAA"), Err(CryptoError::Malformed)));
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = SessionSealer::new(&SecretString::from("short".to_string()));
        assert!(matches!(result, Err(CryptoError::SecretTooShort(5))));
    }
}
