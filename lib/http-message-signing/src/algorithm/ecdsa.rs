use super::{
    ensure_content, ensure_signature,
    key::{self, PrivateKey, PublicKey},
    HashAlgorithm, SignatureAlgorithm,
};
use crate::{Error, Result};
use ring::{
    rand::SystemRandom,
    signature::{
        EcdsaKeyPair, EcdsaSigningAlgorithm, EcdsaVerificationAlgorithm, KeyPair,
        UnparsedPublicKey, ECDSA_P256_SHA256_ASN1, ECDSA_P256_SHA256_ASN1_SIGNING,
        ECDSA_P384_SHA384_ASN1, ECDSA_P384_SHA384_ASN1_SIGNING,
    },
};
use std::fmt;

/// Supported elliptic curves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EcdsaCurve {
    /// NIST P-256, paired with SHA-256
    P256,

    /// NIST P-384, paired with SHA-384
    P384,
}

impl EcdsaCurve {
    /// Curve paired with the hash algorithm
    pub fn for_hash(hash: HashAlgorithm) -> Result<Self> {
        match hash {
            HashAlgorithm::Sha256 => Ok(Self::P256),
            HashAlgorithm::Sha384 => Ok(Self::P384),
            HashAlgorithm::Sha512 => Err(Error::UnsupportedAlgorithm {
                family: "ecdsa".into(),
                hash: hash.to_string(),
            }),
        }
    }

    pub(crate) fn signing_algorithm(self) -> &'static EcdsaSigningAlgorithm {
        match self {
            Self::P256 => &ECDSA_P256_SHA256_ASN1_SIGNING,
            Self::P384 => &ECDSA_P384_SHA384_ASN1_SIGNING,
        }
    }

    fn verification_algorithm(self) -> &'static EcdsaVerificationAlgorithm {
        match self {
            Self::P256 => &ECDSA_P256_SHA256_ASN1,
            Self::P384 => &ECDSA_P384_SHA384_ASN1,
        }
    }
}

/// ECDSA with ASN.1 encoded signatures
pub struct EcdsaSignatureAlgorithm {
    hash: HashAlgorithm,
    key_pair: Option<EcdsaKeyPair>,
    public_key: UnparsedPublicKey<Vec<u8>>,
}

impl EcdsaSignatureAlgorithm {
    fn check_curve(hash: HashAlgorithm, curve: EcdsaCurve) -> Result<()> {
        if EcdsaCurve::for_hash(hash)? == curve {
            Ok(())
        } else {
            Err(Error::UnsupportedAlgorithm {
                family: "ecdsa".into(),
                hash: hash.to_string(),
            })
        }
    }

    fn from_key_pair(hash: HashAlgorithm, curve: EcdsaCurve, key_pair: EcdsaKeyPair) -> Self {
        let public_key = UnparsedPublicKey::new(
            curve.verification_algorithm(),
            key_pair.public_key().as_ref().to_vec(),
        );

        Self {
            hash,
            key_pair: Some(key_pair),
            public_key,
        }
    }

    /// Construct an instance able to sign from a PKCS#8 DER document
    pub fn from_pkcs8(hash: HashAlgorithm, der: &[u8]) -> Result<Self> {
        let curve = EcdsaCurve::for_hash(hash)?;
        let key_pair =
            EcdsaKeyPair::from_pkcs8(curve.signing_algorithm(), der, &SystemRandom::new())?;

        Ok(Self::from_key_pair(hash, curve, key_pair))
    }

    /// Construct an instance able to sign from a PKCS#8 PEM document
    pub fn from_private_key_pem(hash: HashAlgorithm, pem: &str) -> Result<Self> {
        let PrivateKey::Ecdsa(curve, key_pair) = key::private_key(pem)? else {
            return Err(key::Error::UnknownKeyType.into());
        };
        Self::check_curve(hash, curve)?;

        Ok(Self::from_key_pair(hash, curve, key_pair))
    }

    /// Construct a verification-only instance from an uncompressed public point
    pub fn from_public_key_bytes(hash: HashAlgorithm, public_key: impl Into<Vec<u8>>) -> Result<Self> {
        let curve = EcdsaCurve::for_hash(hash)?;

        Ok(Self {
            hash,
            key_pair: None,
            public_key: UnparsedPublicKey::new(curve.verification_algorithm(), public_key.into()),
        })
    }

    /// Construct a verification-only instance from an SPKI PEM document
    pub fn from_public_key_pem(hash: HashAlgorithm, pem: &str) -> Result<Self> {
        let PublicKey::Ecdsa(curve, raw_bytes) = key::public_key(pem)? else {
            return Err(key::Error::UnknownKeyType.into());
        };
        Self::check_curve(hash, curve)?;

        Self::from_public_key_bytes(hash, raw_bytes)
    }

    /// Construct an instance from PEM or DER key material, private keys first
    pub fn from_key_material(hash: HashAlgorithm, material: &[u8]) -> Result<Self> {
        if !key::is_pem(material) {
            return Self::from_pkcs8(hash, material);
        }

        let pem = std::str::from_utf8(material).map_err(|_| key::Error::MalformedKey)?;
        if pem.contains("PUBLIC KEY") {
            Self::from_public_key_pem(hash, pem)
        } else {
            Self::from_private_key_pem(hash, pem)
        }
    }

    /// Uncompressed public point
    #[must_use]
    pub fn public_key(&self) -> &[u8] {
        self.public_key.as_ref()
    }
}

impl fmt::Debug for EcdsaSignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcdsaSignatureAlgorithm")
            .field("hash", &self.hash)
            .field("can_sign", &self.key_pair.is_some())
            .finish_non_exhaustive()
    }
}

impl SignatureAlgorithm for EcdsaSignatureAlgorithm {
    fn name(&self) -> &str {
        "ECDSA"
    }

    fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    fn compute_hash(&self, content: &[u8]) -> Result<Vec<u8>> {
        ensure_content(content)?;
        let key_pair = self.key_pair.as_ref().ok_or(Error::MissingPrivateKey)?;
        let signature = key_pair.sign(&SystemRandom::new(), content)?;

        Ok(signature.as_ref().to_vec())
    }

    fn verify_signature(&self, content: &[u8], signature: &[u8]) -> Result<bool> {
        ensure_signature(content, signature)?;
        Ok(self.public_key.verify(content, signature).is_ok())
    }
}
