use crate::{HeaderName, KeyId, ValidationError};
use std::time::SystemTime;

/// Proof attached to a request by the sender
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Signature {
    /// Entity the receiver uses to look up the client
    pub key_id: KeyId,

    /// Algorithm identifier, e.g. `rsa-sha512` or `hs2019`
    pub algorithm: Option<String>,

    /// Time the signature was created
    pub created: Option<SystemTime>,

    /// Time after which the signature is considered expired
    pub expires: Option<SystemTime>,

    /// Ordered list of the headers that were signed
    pub headers: Vec<HeaderName>,

    /// Base64-encoded signature
    pub string: String,

    /// Optional nonce to prevent replays
    pub nonce: Option<String>,
}

impl Signature {
    /// Validate the structural requirements of the signature
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key_id.is_empty() {
            return Err(ValidationError::MissingKeyId("signature"));
        }

        if self.string.is_empty() {
            return Err(ValidationError::MissingSignatureString);
        }

        Ok(())
    }

    /// Whether the signature lists the header
    #[must_use]
    pub fn includes_header(&self, name: &HeaderName) -> bool {
        self.headers.contains(name)
    }
}
