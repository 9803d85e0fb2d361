use super::{ensure_content, ensure_signature, HashAlgorithm, SignatureAlgorithm};
use crate::{Error, Result};
use ring::hmac;

/// Keyed hash over the content
///
/// Verification recomputes the tag and compares it in constant time
#[derive(Debug)]
pub struct HmacSignatureAlgorithm {
    hash: HashAlgorithm,
    key: hmac::Key,
}

impl HmacSignatureAlgorithm {
    /// Construct a new HMAC algorithm keyed with the secret
    pub fn new(hash: HashAlgorithm, secret: &[u8]) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::InvalidArgument("secret"));
        }

        let algorithm = match hash {
            HashAlgorithm::Sha256 => hmac::HMAC_SHA256,
            HashAlgorithm::Sha384 => hmac::HMAC_SHA384,
            HashAlgorithm::Sha512 => hmac::HMAC_SHA512,
        };

        Ok(Self {
            hash,
            key: hmac::Key::new(algorithm, secret),
        })
    }
}

impl SignatureAlgorithm for HmacSignatureAlgorithm {
    fn name(&self) -> &str {
        "HMAC"
    }

    fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    fn compute_hash(&self, content: &[u8]) -> Result<Vec<u8>> {
        ensure_content(content)?;
        Ok(hmac::sign(&self.key, content).as_ref().to_vec())
    }

    fn verify_signature(&self, content: &[u8], signature: &[u8]) -> Result<bool> {
        ensure_signature(content, signature)?;
        Ok(hmac::verify(&self.key, content, signature).is_ok())
    }
}
