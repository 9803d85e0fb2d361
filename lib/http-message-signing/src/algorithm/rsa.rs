use super::{
    ensure_content, ensure_signature,
    key::{self, PrivateKey, PublicKey},
    HashAlgorithm, SignatureAlgorithm,
};
use crate::{Error, Result};
use ring::{
    rand::SystemRandom,
    signature::{
        KeyPair, RsaEncoding, RsaKeyPair, RsaParameters, UnparsedPublicKey,
        RSA_PKCS1_2048_8192_SHA256, RSA_PKCS1_2048_8192_SHA384, RSA_PKCS1_2048_8192_SHA512,
        RSA_PKCS1_SHA256, RSA_PKCS1_SHA384, RSA_PKCS1_SHA512,
    },
};
use std::fmt;

fn padding(hash: HashAlgorithm) -> &'static dyn RsaEncoding {
    match hash {
        HashAlgorithm::Sha256 => &RSA_PKCS1_SHA256,
        HashAlgorithm::Sha384 => &RSA_PKCS1_SHA384,
        HashAlgorithm::Sha512 => &RSA_PKCS1_SHA512,
    }
}

fn parameters(hash: HashAlgorithm) -> &'static RsaParameters {
    match hash {
        HashAlgorithm::Sha256 => &RSA_PKCS1_2048_8192_SHA256,
        HashAlgorithm::Sha384 => &RSA_PKCS1_2048_8192_SHA384,
        HashAlgorithm::Sha512 => &RSA_PKCS1_2048_8192_SHA512,
    }
}

/// RSA with PKCS#1 v1.5 padding
///
/// Signing requires the private key, verification only the public key
pub struct RsaSignatureAlgorithm {
    hash: HashAlgorithm,
    key_pair: Option<RsaKeyPair>,
    public_key: UnparsedPublicKey<Vec<u8>>,
}

impl RsaSignatureAlgorithm {
    /// Construct an instance able to sign from a parsed key pair
    #[must_use]
    pub fn from_key_pair(hash: HashAlgorithm, key_pair: RsaKeyPair) -> Self {
        let public_key =
            UnparsedPublicKey::new(parameters(hash), key_pair.public_key().as_ref().to_vec());

        Self {
            hash,
            key_pair: Some(key_pair),
            public_key,
        }
    }

    /// Construct an instance able to sign from a PKCS#8 or PKCS#1 DER document
    pub fn from_private_key_der(hash: HashAlgorithm, der: &[u8]) -> Result<Self> {
        let key_pair = RsaKeyPair::from_pkcs8(der).or_else(|_| RsaKeyPair::from_der(der))?;
        Ok(Self::from_key_pair(hash, key_pair))
    }

    /// Construct an instance able to sign from a PEM document
    pub fn from_private_key_pem(hash: HashAlgorithm, pem: &str) -> Result<Self> {
        let PrivateKey::Rsa(key_pair) = key::private_key(pem)? else {
            return Err(key::Error::UnknownKeyType.into());
        };

        Ok(Self::from_key_pair(hash, key_pair))
    }

    /// Construct a verification-only instance from a DER-encoded `RSAPublicKey`
    #[must_use]
    pub fn from_public_key_der(hash: HashAlgorithm, der: impl Into<Vec<u8>>) -> Self {
        Self {
            hash,
            key_pair: None,
            public_key: UnparsedPublicKey::new(parameters(hash), der.into()),
        }
    }

    /// Construct a verification-only instance from a PEM document
    pub fn from_public_key_pem(hash: HashAlgorithm, pem: &str) -> Result<Self> {
        let PublicKey::Rsa(der) = key::public_key(pem)? else {
            return Err(key::Error::UnknownKeyType.into());
        };

        Ok(Self::from_public_key_der(hash, der))
    }

    /// Construct an instance from PEM or DER key material
    ///
    /// DER material is expected to hold a private key
    pub fn from_key_material(hash: HashAlgorithm, material: &[u8]) -> Result<Self> {
        if !key::is_pem(material) {
            return Self::from_private_key_der(hash, material);
        }

        let pem = std::str::from_utf8(material).map_err(|_| key::Error::MalformedKey)?;
        if pem.contains("PUBLIC KEY") {
            Self::from_public_key_pem(hash, pem)
        } else {
            Self::from_private_key_pem(hash, pem)
        }
    }

    /// DER-encoded `RSAPublicKey`
    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        self.public_key.as_ref()
    }
}

impl fmt::Debug for RsaSignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSignatureAlgorithm")
            .field("hash", &self.hash)
            .field("can_sign", &self.key_pair.is_some())
            .finish_non_exhaustive()
    }
}

impl SignatureAlgorithm for RsaSignatureAlgorithm {
    fn name(&self) -> &str {
        "RSA"
    }

    fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    fn compute_hash(&self, content: &[u8]) -> Result<Vec<u8>> {
        ensure_content(content)?;
        let key_pair = self.key_pair.as_ref().ok_or(Error::MissingPrivateKey)?;

        let mut signature = vec![0; key_pair.public().modulus_len()];
        key_pair.sign(
            padding(self.hash),
            &SystemRandom::new(),
            content,
            &mut signature,
        )?;

        Ok(signature)
    }

    fn verify_signature(&self, content: &[u8], signature: &[u8]) -> Result<bool> {
        ensure_signature(content, signature)?;
        Ok(self.public_key.verify(content, signature).is_ok())
    }
}
