use crate::codec::{Codec, CodecError, KeyPair, SecureCookie};

/// An ordered set of codecs, newest first.
pub struct KeyRing(Vec<SecureCookie>);

impl KeyRing {
    pub fn from_pairs(pairs: &[KeyPair]) -> Result<Self, CodecError> {
        if pairs.is_empty() {
            return Err(CodecError::NoKeys);
        }
        let codecs = pairs
            .iter()
            .map(SecureCookie::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(codecs))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Codec for KeyRing {
    fn encode(&self, name: &str, value: &str) -> Result<String, CodecError> {
        self.0
            .first()
            .ok_or(CodecError::NoKeys)?
            .encode(name, value)
    }

    fn decode(&self, name: &str, token: &str) -> Result<String, CodecError> {
        let mut error = CodecError::NoKeys;
        for codec in &self.0 {
            match codec.decode(name, token) {
                Ok(value) => return Ok(value),
                // Keep the most specific failure: a codec whose mac matched knows more.
                Err(e) if matches!(error, CodecError::NoKeys | CodecError::InvalidMac) => {
                    error = e
                }
                Err(_) => {}
            }
        }
        Err(error)
    }

    fn set_max_age(&mut self, max_age: i64) {
        for codec in &mut self.0 {
            codec.set_max_age(max_age);
        }
    }
}
