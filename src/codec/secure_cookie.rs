use std::time::{SystemTime, UNIX_EPOCH};

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng, Payload},
    Aes128Gcm, Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{
    codec::{Codec, CodecError, KeyPair},
    session_cookie::DEFAULT_MAX_AGE,
};

type HmacSha256 = Hmac<Sha256>;

const MAX_LENGTH: usize = 4096;
const NONCE_LENGTH: usize = 12;

enum BlockCipher {
    Aes128(Aes128Gcm),
    Aes256(Aes256Gcm),
}

impl BlockCipher {
    fn new(key: &[u8]) -> Result<Self, CodecError> {
        let invalid = |_| CodecError::InvalidBlockKey(key.len());
        match key.len() {
            16 => Aes128Gcm::new_from_slice(key)
                .map(Self::Aes128)
                .map_err(invalid),
            32 => Aes256Gcm::new_from_slice(key)
                .map(Self::Aes256)
                .map_err(invalid),
            len => Err(CodecError::InvalidBlockKey(len)),
        }
    }

    /// Returns the nonce followed by the ciphertext. The cookie name is bound as
    /// associated data.
    fn encrypt(&self, name: &str, plaintext: &[u8]) -> Result<Vec<u8>, CodecError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let payload = Payload {
            msg: plaintext,
            aad: name.as_bytes(),
        };
        let ciphertext = match self {
            Self::Aes128(cipher) => cipher.encrypt(&nonce, payload),
            Self::Aes256(cipher) => cipher.encrypt(&nonce, payload),
        }
        .map_err(|_| CodecError::Encryption)?;
        let mut sealed = nonce.to_vec();
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    fn decrypt(&self, name: &str, sealed: &[u8]) -> Result<Vec<u8>, CodecError> {
        if sealed.len() < NONCE_LENGTH {
            return Err(CodecError::Decryption);
        }
        let (nonce, ciphertext) = sealed.split_at(NONCE_LENGTH);
        let nonce = Nonce::from_slice(nonce);
        let payload = Payload {
            msg: ciphertext,
            aad: name.as_bytes(),
        };
        match self {
            Self::Aes128(cipher) => cipher.decrypt(nonce, payload),
            Self::Aes256(cipher) => cipher.decrypt(nonce, payload),
        }
        .map_err(|_| CodecError::Decryption)
    }
}

/// Signs values with HMAC-SHA256 and, given a block key, encrypts them with AES-GCM.
///
/// A token is the URL-safe base64 encoding of `timestamp|payload|mac`, where the mac
/// covers the cookie name, the timestamp and the payload.
pub struct SecureCookie {
    hash_key: Vec<u8>,
    block: Option<BlockCipher>,
    max_age: i64,
}

impl SecureCookie {
    pub fn new(pair: &KeyPair) -> Result<Self, CodecError> {
        if pair.hash_key.is_empty() {
            return Err(CodecError::MissingHashKey);
        }
        let block = pair
            .block_key
            .as_deref()
            .map(BlockCipher::new)
            .transpose()?;
        Ok(Self {
            hash_key: pair.hash_key.clone(),
            block,
            max_age: DEFAULT_MAX_AGE,
        })
    }

    pub fn with_max_age(mut self, max_age: i64) -> Self {
        self.max_age = max_age;
        self
    }

    fn mac(&self, name: &str, timestamp: &[u8], payload: &[u8]) -> Result<HmacSha256, CodecError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.hash_key)
            .map_err(|_| CodecError::MissingHashKey)?;
        mac.update(name.as_bytes());
        mac.update(b"|");
        mac.update(timestamp);
        mac.update(b"|");
        mac.update(payload);
        Ok(mac)
    }

    fn encode_at(&self, name: &str, value: &str, timestamp: i64) -> Result<String, CodecError> {
        let payload = match &self.block {
            Some(block) => block.encrypt(name, value.as_bytes())?,
            None => value.as_bytes().to_vec(),
        };
        let payload = URL_SAFE_NO_PAD.encode(payload);
        let timestamp = timestamp.to_string();
        let signature = self
            .mac(name, timestamp.as_bytes(), payload.as_bytes())?
            .finalize()
            .into_bytes();

        let mut joined = Vec::with_capacity(timestamp.len() + payload.len() + signature.len() + 2);
        joined.extend_from_slice(timestamp.as_bytes());
        joined.push(b'|');
        joined.extend_from_slice(payload.as_bytes());
        joined.push(b'|');
        joined.extend_from_slice(&signature);

        let token = URL_SAFE_NO_PAD.encode(joined);
        if token.len() > MAX_LENGTH {
            return Err(CodecError::TooLong);
        }
        Ok(token)
    }

    fn decode_at(&self, name: &str, token: &str, now: i64) -> Result<String, CodecError> {
        if token.len() > MAX_LENGTH {
            return Err(CodecError::TooLong);
        }
        let joined = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| CodecError::Encoding)?;
        // The mac is raw bytes and may itself contain '|'.
        let mut parts = joined.splitn(3, |b| *b == b'|');
        let (Some(timestamp), Some(payload), Some(signature)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(CodecError::InvalidMac);
        };

        self.mac(name, timestamp, payload)?
            .verify_slice(signature)
            .map_err(|_| CodecError::InvalidMac)?;

        let timestamp = std::str::from_utf8(timestamp)
            .ok()
            .and_then(|t| t.parse::<i64>().ok())
            .ok_or(CodecError::InvalidTimestamp)?;
        if self.max_age > 0 && timestamp < now - self.max_age {
            return Err(CodecError::Expired);
        }

        let payload = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| CodecError::Encoding)?;
        let payload = match &self.block {
            Some(block) => block.decrypt(name, &payload)?,
            None => payload,
        };
        String::from_utf8(payload).map_err(|_| CodecError::Encoding)
    }
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}

impl Codec for SecureCookie {
    fn encode(&self, name: &str, value: &str) -> Result<String, CodecError> {
        self.encode_at(name, value, now())
    }

    fn decode(&self, name: &str, token: &str) -> Result<String, CodecError> {
        self.decode_at(name, token, now())
    }

    fn set_max_age(&mut self, max_age: i64) {
        self.max_age = max_age;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL_SAFE_ALPHABET: &str =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

    fn signing_pair() -> KeyPair {
        KeyPair::new(b"a-very-secret-hash-key-of-32-byte".to_vec())
    }

    fn encrypting_pair() -> KeyPair {
        signing_pair().with_block_key([7u8; 32].to_vec())
    }

    #[test]
    fn decode_returns_the_encoded_value() {
        for pair in [signing_pair(), encrypting_pair()] {
            let codec = SecureCookie::new(&pair).expect("Unable to build codec");
            let token = codec.encode("session", "ABC234").expect("Unable to encode");
            let value = codec.decode("session", &token).expect("Unable to decode");
            assert_eq!(value, "ABC234");
        }
    }

    #[test]
    fn encrypted_tokens_do_not_reveal_the_value() {
        let codec = SecureCookie::new(&encrypting_pair()).expect("Unable to build codec");
        let value = "PLAINTEXTIDENTIFIER";
        let token = codec.encode("session", value).expect("Unable to encode");
        let joined = URL_SAFE_NO_PAD.decode(&token).expect("Unable to decode base64");
        let encoded_value = URL_SAFE_NO_PAD.encode(value);
        assert!(!String::from_utf8_lossy(&joined).contains(&encoded_value));
    }

    #[test]
    fn decode_rejects_every_single_character_alteration() {
        for pair in [signing_pair(), encrypting_pair()] {
            let codec = SecureCookie::new(&pair).expect("Unable to build codec");
            let token = codec.encode("session", "ABC234").expect("Unable to encode");
            for (position, original) in token.char_indices() {
                let replacement = URL_SAFE_ALPHABET
                    .chars()
                    .find(|c| *c != original)
                    .expect("alphabet has more than one character");
                let mut tampered = token.clone();
                tampered.replace_range(position..position + 1, &replacement.to_string());
                assert!(
                    codec.decode("session", &tampered).is_err(),
                    "tampered token at position {position} decoded"
                );
            }
        }
    }

    #[test]
    fn decode_rejects_tokens_for_another_name() {
        let codec = SecureCookie::new(&signing_pair()).expect("Unable to build codec");
        let token = codec.encode("session", "ABC234").expect("Unable to encode");
        let err = codec.decode("other", &token).expect_err("expected decode to fail");
        assert!(matches!(err, CodecError::InvalidMac));
    }

    #[test]
    fn decode_rejects_tokens_signed_with_another_key() {
        let codec = SecureCookie::new(&signing_pair()).expect("Unable to build codec");
        let other = SecureCookie::new(&KeyPair::new(b"another-key".to_vec()))
            .expect("Unable to build codec");
        let token = other.encode("session", "ABC234").expect("Unable to encode");
        assert!(codec.decode("session", &token).is_err());
    }

    #[test]
    fn decode_rejects_expired_tokens() {
        let codec = SecureCookie::new(&signing_pair())
            .expect("Unable to build codec")
            .with_max_age(60);
        let token = codec
            .encode_at("session", "ABC234", 1_000)
            .expect("Unable to encode");
        assert!(codec.decode_at("session", &token, 1_060).is_ok());
        let err = codec
            .decode_at("session", &token, 1_061)
            .expect_err("expected token to be expired");
        assert!(matches!(err, CodecError::Expired));
    }

    #[test]
    fn now_is_the_current_unix_time_in_seconds() {
        let stamp = now();
        assert!(stamp > 1_600_000_000);
        assert!(stamp < i64::MAX);
    }

    #[test]
    fn zero_max_age_disables_expiry() {
        let mut codec = SecureCookie::new(&signing_pair()).expect("Unable to build codec");
        codec.set_max_age(0);
        let token = codec.encode_at("session", "ABC234", 0).expect("Unable to encode");
        assert!(codec.decode("session", &token).is_ok());
    }

    #[test]
    fn decode_rejects_garbage() {
        let codec = SecureCookie::new(&signing_pair()).expect("Unable to build codec");
        assert!(codec.decode("session", "bogus").is_err());
        assert!(codec.decode("session", "").is_err());
        let long = "A".repeat(MAX_LENGTH + 1);
        assert!(matches!(
            codec.decode("session", &long),
            Err(CodecError::TooLong)
        ));
    }

    #[test]
    fn new_validates_the_key_pair() {
        assert!(matches!(
            SecureCookie::new(&KeyPair::new(Vec::new())),
            Err(CodecError::MissingHashKey)
        ));
        assert!(matches!(
            SecureCookie::new(&signing_pair().with_block_key(vec![1u8; 20])),
            Err(CodecError::InvalidBlockKey(20))
        ));
        assert!(SecureCookie::new(&signing_pair().with_block_key(vec![1u8; 16])).is_ok());
    }
}
