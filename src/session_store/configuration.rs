use crate::{
    codec::KeyPair,
    session_cookie::{CookieOptions, DEFAULT_MAX_AGE},
    SessionKey,
};

type KeyGen = dyn Fn(&SessionKey) -> String + Send + Sync;

/// Everything a [`Store`](crate::Store) needs, fixed at construction.
pub struct Configuration {
    /// Backend addresses, all dialed when the store connects.
    pub addresses: Vec<String>,
    pub pool_size: usize,
    /// Namespace the session objects live in.
    pub bucket: String,
    /// Newest first. Older pairs only decode.
    pub key_pairs: Vec<KeyPair>,
    /// TTL in seconds for sessions saved with a max-age of zero.
    pub default_max_age: i64,
    /// Cookie attributes copied into every new session.
    pub options: CookieOptions,
    key_gen: Box<KeyGen>,
}

impl Configuration {
    pub fn new(addresses: Vec<String>, bucket: impl Into<String>, key_pairs: Vec<KeyPair>) -> Self {
        Self {
            addresses,
            bucket: bucket.into(),
            key_pairs,
            ..Default::default()
        }
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_default_max_age(mut self, default_max_age: i64) -> Self {
        self.default_max_age = default_max_age;
        self
    }

    pub fn with_options(mut self, options: CookieOptions) -> Self {
        self.options = options;
        self
    }

    /// Overrides how a session key maps to its backend key.
    pub fn with_key_gen(
        mut self,
        key_gen: impl Fn(&SessionKey) -> String + Send + Sync + 'static,
    ) -> Self {
        self.key_gen = Box::new(key_gen);
        self
    }

    pub fn key_gen(&self) -> &KeyGen {
        &self.key_gen
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            addresses: Vec::new(),
            pool_size: 10,
            bucket: "sessions".to_string(),
            key_pairs: Vec::new(),
            default_max_age: DEFAULT_MAX_AGE,
            options: CookieOptions::default(),
            key_gen: Box::new(|v: &SessionKey| format!("session_{v}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_gen_prefixes_the_session_key() {
        let config = Configuration::default();
        let key = SessionKey::parse("ABC234").expect("expected a key");
        assert_eq!((config.key_gen())(&key), "session_ABC234");
    }

    #[test]
    fn new_keeps_the_defaults() {
        let config = Configuration::new(
            vec!["redis://localhost:6379".to_string()],
            "app",
            vec![KeyPair::new(b"hash".to_vec())],
        );
        assert_eq!(config.bucket, "app");
        assert_eq!(config.pool_size, 10);
        assert_eq!(config.default_max_age, 86400 * 30);
        assert_eq!(config.options, CookieOptions::default());
    }
}
