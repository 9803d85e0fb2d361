//!
//! Keyed signature algorithms
//!
//! Every algorithm hashes-and-signs (or hashes-and-verifies) raw bytes with key material it owns
//! exclusively. The key material is released when the instance is dropped.
//!

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::{AsRefStr, Display, EnumString};

pub use self::custom::CustomSignatureAlgorithm;
pub use self::ecdsa::{EcdsaCurve, EcdsaSignatureAlgorithm};
pub use self::hmac::HmacSignatureAlgorithm;
pub use self::registry::{AlgorithmConstructor, SignatureAlgorithmRegistry};
pub use self::rsa::RsaSignatureAlgorithm;
pub use self::secret::Secret;

pub mod key;

mod custom;
mod ecdsa;
mod hmac;
mod registry;
mod rsa;
mod secret;

/// The literal `hs2019` algorithm token
pub const HS2019: &str = "hs2019";

/// Hash algorithm bound to a signature algorithm
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    EnumString,
    Hash,
    PartialEq,
    Eq,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum HashAlgorithm {
    /// SHA-256
    #[default]
    #[serde(alias = "sha-256")]
    #[strum(to_string = "sha256", serialize = "sha-256")]
    Sha256,

    /// SHA-384
    #[serde(alias = "sha-384")]
    #[strum(to_string = "sha384", serialize = "sha-384")]
    Sha384,

    /// SHA-512
    #[serde(alias = "sha-512")]
    #[strum(to_string = "sha512", serialize = "sha-512")]
    Sha512,
}

/// Family of a signature algorithm
#[derive(Clone, Debug, Hash, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum SignatureAlgorithmKind {
    /// RSA with PKCS#1 v1.5 padding
    Rsa,

    /// HMAC
    Hmac,

    /// ECDSA
    Ecdsa,

    /// Family registered by the user
    Custom(String),
}

impl SignatureAlgorithmKind {
    /// Lowercase family token, as used in the `family-hash` identifier
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Rsa => "rsa".into(),
            Self::Hmac => "hmac".into(),
            Self::Ecdsa => "ecdsa".into(),
            Self::Custom(name) => name.to_lowercase(),
        }
    }
}

impl fmt::Display for SignatureAlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl From<&str> for SignatureAlgorithmKind {
    fn from(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "rsa" => Self::Rsa,
            "hmac" => Self::Hmac,
            "ecdsa" => Self::Ecdsa,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for SignatureAlgorithmKind {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<SignatureAlgorithmKind> for String {
    fn from(value: SignatureAlgorithmKind) -> Self {
        value.name()
    }
}

impl FromStr for SignatureAlgorithmKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// Keyed cryptographic primitive
pub trait SignatureAlgorithm: fmt::Debug + Send + Sync {
    /// Family name, e.g. `RSA`
    fn name(&self) -> &str;

    /// Hash algorithm the instance is bound to
    fn hash_algorithm(&self) -> HashAlgorithm;

    /// Compute the raw signature over the content
    ///
    /// Fails with [`Error::InvalidArgument`] on empty content
    fn compute_hash(&self, content: &[u8]) -> Result<Vec<u8>>;

    /// Verify the raw signature over the content
    ///
    /// Fails with [`Error::InvalidArgument`] on empty content or signature
    fn verify_signature(&self, content: &[u8], signature: &[u8]) -> Result<bool>;

    /// `family-hash` identifier, e.g. `rsa-sha512`
    fn identifier(&self) -> String {
        format!("{}-{}", self.name().to_lowercase(), self.hash_algorithm())
    }
}

fn ensure_content(content: &[u8]) -> Result<()> {
    if content.is_empty() {
        return Err(Error::InvalidArgument("content"));
    }

    Ok(())
}

fn ensure_signature(content: &[u8], signature: &[u8]) -> Result<()> {
    ensure_content(content)?;
    if signature.is_empty() {
        return Err(Error::InvalidArgument("signature"));
    }

    Ok(())
}
