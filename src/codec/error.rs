#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Codec error: hash key is not set")]
    MissingHashKey,
    #[error("Codec error: block key must be 16 or 32 bytes, got {0}")]
    InvalidBlockKey(usize),
    #[error("Codec error: no key pairs were given")]
    NoKeys,
    #[error("Codec error: the value is too long")]
    TooLong,
    #[error("Codec error: the value could not be decoded")]
    Encoding,
    #[error("Codec error: the value is not valid")]
    InvalidMac,
    #[error("Codec error: invalid timestamp")]
    InvalidTimestamp,
    #[error("Codec error: expired timestamp")]
    Expired,
    #[error("Codec error: the value could not be encrypted")]
    Encryption,
    #[error("Codec error: the value could not be decrypted")]
    Decryption,
}
