use super::{ensure_content, ensure_signature, HashAlgorithm, SignatureAlgorithm};
use crate::Result;
use std::{fmt, sync::Arc};

type SignFn = dyn Fn(HashAlgorithm, &[u8]) -> Result<Vec<u8>> + Send + Sync;

/// User-pluggable algorithm for non-standard schemes
///
/// Verification recomputes the signature and compares it in constant time, so the
/// signing function has to be deterministic.
#[derive(Clone)]
pub struct CustomSignatureAlgorithm {
    name: String,
    hash: HashAlgorithm,
    sign: Arc<SignFn>,
}

impl CustomSignatureAlgorithm {
    /// Construct a new custom algorithm
    pub fn new<F>(name: impl Into<String>, hash: HashAlgorithm, sign: F) -> Self
    where
        F: Fn(HashAlgorithm, &[u8]) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            hash,
            sign: Arc::new(sign),
        }
    }
}

impl fmt::Debug for CustomSignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSignatureAlgorithm")
            .field("name", &self.name)
            .field("hash", &self.hash)
            .finish_non_exhaustive()
    }
}

impl SignatureAlgorithm for CustomSignatureAlgorithm {
    fn name(&self) -> &str {
        &self.name
    }

    fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    fn compute_hash(&self, content: &[u8]) -> Result<Vec<u8>> {
        ensure_content(content)?;
        (self.sign)(self.hash, content)
    }

    fn verify_signature(&self, content: &[u8], signature: &[u8]) -> Result<bool> {
        ensure_signature(content, signature)?;
        let expected = (self.sign)(self.hash, content)?;

        #[allow(deprecated)]
        let is_equal = ring::constant_time::verify_slices_are_equal(&expected, signature).is_ok();

        Ok(is_equal)
    }
}
