//!
//! `Digest` header computation and verification
//!

use ring::digest;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, EnumString};

/// Digest algorithm used for the `Digest` header
#[derive(
    AsRefStr, Clone, Copy, Debug, Default, Deserialize, EnumString, PartialEq, Eq, Serialize,
)]
#[non_exhaustive]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum DigestAlgorithm {
    /// SHA-256
    #[default]
    #[serde(rename = "sha-256")]
    #[strum(to_string = "SHA-256", serialize = "id-sha-256")]
    Sha256,

    /// SHA-512
    #[serde(rename = "sha-512")]
    #[strum(to_string = "SHA-512", serialize = "id-sha-512")]
    Sha512,
}

impl DigestAlgorithm {
    fn ring_algorithm(self) -> &'static digest::Algorithm {
        match self {
            Self::Sha256 => &digest::SHA256,
            Self::Sha512 => &digest::SHA512,
        }
    }

    /// Hash the data
    #[must_use]
    pub fn digest(self, data: impl AsRef<[u8]>) -> Vec<u8> {
        digest::digest(self.ring_algorithm(), data.as_ref())
            .as_ref()
            .to_vec()
    }

    /// Render the value of a `Digest` header, e.g. `SHA-256=47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=`
    #[must_use]
    pub fn header_value(self, body: impl AsRef<[u8]>) -> String {
        format!(
            "{}={}",
            self.as_ref(),
            base64_simd::STANDARD.encode_to_string(self.digest(body))
        )
    }
}

/// Check a `Digest` header value against the body
///
/// Unknown algorithms and malformed values don't match
#[must_use]
pub fn matches(header_value: &str, body: &[u8]) -> bool {
    let Some((algorithm_name, encoded)) = header_value.trim().split_once('=') else {
        return false;
    };
    let Ok(algorithm) = DigestAlgorithm::from_str(algorithm_name) else {
        return false;
    };
    let Ok(received) = base64_simd::STANDARD.decode_to_vec(encoded) else {
        return false;
    };

    #[allow(deprecated)]
    ring::constant_time::verify_slices_are_equal(&algorithm.digest(body), &received).is_ok()
}
