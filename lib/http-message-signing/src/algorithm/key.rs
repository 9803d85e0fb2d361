//!
//! Parse cryptographic keys for use with the asymmetric signature algorithms
//!

use super::EcdsaCurve;
use const_oid::{
    db::rfc5912::{ID_EC_PUBLIC_KEY, RSA_ENCRYPTION, SECP_256_R_1, SECP_384_R_1},
    ObjectIdentifier,
};
use miette::Diagnostic;
use pkcs8::{
    spki::AlgorithmIdentifierRef, Document, PrivateKeyInfo, SecretDocument,
    SubjectPublicKeyInfoRef,
};
use ring::{
    rand::SystemRandom,
    signature::{EcdsaKeyPair, RsaKeyPair},
};
use thiserror::Error;

/// PEM label of a PKCS#1 private key
const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// PEM label of a PKCS#1 public key
const RSA_PUBLIC_KEY_LABEL: &str = "RSA PUBLIC KEY";

/// Key parsing error
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Malformed DER structure
    #[error(transparent)]
    Der(#[from] pkcs8::der::Error),

    /// Key rejected
    #[error(transparent)]
    KeyRejected(#[from] ring::error::KeyRejected),

    /// Malformed key
    #[error("Malformed key")]
    MalformedKey,

    /// Malformed PKCS#8 document
    #[error(transparent)]
    Pkcs8(#[from] pkcs8::Error),

    /// Unsupported elliptic curve
    #[error("Unsupported elliptic curve")]
    UnsupportedCurve,

    /// Unknown key type
    #[error("Unknown key type")]
    UnknownKeyType,
}

/// Private key parsed from its PEM form
#[non_exhaustive]
pub enum PrivateKey {
    /// ECDSA
    Ecdsa(EcdsaCurve, EcdsaKeyPair),

    /// RSA
    Rsa(RsaKeyPair),
}

/// Public key parsed from its PEM form
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublicKey {
    /// ECDSA, uncompressed point
    Ecdsa(EcdsaCurve, Vec<u8>),

    /// RSA, DER-encoded `RSAPublicKey`
    Rsa(Vec<u8>),
}

fn curve(algorithm: &AlgorithmIdentifierRef<'_>) -> Result<EcdsaCurve, Error> {
    let oid: ObjectIdentifier = algorithm
        .parameters_oid()
        .map_err(|_| Error::MalformedKey)?;

    if oid == SECP_256_R_1 {
        Ok(EcdsaCurve::P256)
    } else if oid == SECP_384_R_1 {
        Ok(EcdsaCurve::P384)
    } else {
        Err(Error::UnsupportedCurve)
    }
}

/// Parse a private key from its PEM form.
/// Uses constant-time PEM decoding and zeroizes any temporary allocations.
///
/// Currently supported formats:
///
/// - PKCS#1 `RSA PRIVATE KEY`
/// - PKCS#8 `PRIVATE KEY` with an RSA or ECDSA (P-256, P-384) key
#[inline]
pub fn private_key(pem: &str) -> Result<PrivateKey, Error> {
    let (label, document) = SecretDocument::from_pem(pem)?;
    if label == RSA_PRIVATE_KEY_LABEL {
        return Ok(PrivateKey::Rsa(RsaKeyPair::from_der(document.as_bytes())?));
    }

    let private_key_raw: PrivateKeyInfo<'_> = document.decode_msg()?;
    let private_key = if private_key_raw.algorithm.oid == RSA_ENCRYPTION {
        PrivateKey::Rsa(RsaKeyPair::from_der(private_key_raw.private_key)?)
    } else if private_key_raw.algorithm.oid == ID_EC_PUBLIC_KEY {
        let curve = curve(&private_key_raw.algorithm)?;
        let key_pair = EcdsaKeyPair::from_pkcs8(
            curve.signing_algorithm(),
            document.as_bytes(),
            &SystemRandom::new(),
        )?;
        PrivateKey::Ecdsa(curve, key_pair)
    } else {
        return Err(Error::UnknownKeyType);
    };

    Ok(private_key)
}

/// Parse a public key from its PEM form
///
/// Currently supported formats:
///
/// - PKCS#1 `RSA PUBLIC KEY`
/// - SPKI `PUBLIC KEY` with an RSA or ECDSA (P-256, P-384) key
#[inline]
pub fn public_key(pem: &str) -> Result<PublicKey, Error> {
    let (label, document) = Document::from_pem(pem)?;
    if label == RSA_PUBLIC_KEY_LABEL {
        return Ok(PublicKey::Rsa(document.as_bytes().to_vec()));
    }

    let spki: SubjectPublicKeyInfoRef<'_> = document.decode_msg()?;
    let raw_bytes = spki
        .subject_public_key
        .as_bytes()
        .ok_or(Error::MalformedKey)?
        .to_vec();

    let public_key = if spki.algorithm.oid == RSA_ENCRYPTION {
        PublicKey::Rsa(raw_bytes)
    } else if spki.algorithm.oid == ID_EC_PUBLIC_KEY {
        PublicKey::Ecdsa(curve(&spki.algorithm)?, raw_bytes)
    } else {
        return Err(Error::UnknownKeyType);
    };

    Ok(public_key)
}

/// Whether the key material looks PEM-encoded
pub(crate) fn is_pem(material: &[u8]) -> bool {
    let start = material
        .iter()
        .position(|byte| !byte.is_ascii_whitespace())
        .unwrap_or(material.len());

    material[start..].starts_with(b"-----BEGIN ")
}
