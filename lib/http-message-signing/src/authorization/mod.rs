//!
//! Authorization header parameter string
//!
//! ```text
//! keyId="<key id>",algorithm="<alg>",created=<unix>,expires=<unix>,headers="<names>",nonce="<nonce>",signature="<base64>"
//! ```
//!

use crate::{util::unix_seconds, Signature};
use itertools::Itertools;
use std::fmt::Write;

pub use self::parse::{parse, ParseError, ParseErrorKind};

mod parse;

/// Default authorization scheme
pub const DEFAULT_SCHEME: &str = "Signature";

/// Render the parameter string of a signature
///
/// `algorithm`, `created`, `expires` and `nonce` are only rendered if the signature carries them
#[must_use]
pub fn render(signature: &Signature) -> String {
    let mut buffer = String::new();

    let _ = write!(buffer, "keyId=\"{}\"", signature.key_id);

    if let Some(ref algorithm) = signature.algorithm {
        let _ = write!(buffer, ",algorithm=\"{algorithm}\"");
    }

    if let Some(created) = signature.created {
        let _ = write!(buffer, ",created={}", unix_seconds(created));
    }

    if let Some(expires) = signature.expires {
        let _ = write!(buffer, ",expires={}", unix_seconds(expires));
    }

    let headers = signature
        .headers
        .iter()
        .map(crate::HeaderName::to_lowercase)
        .join(" ");
    let _ = write!(buffer, ",headers=\"{headers}\"");

    if let Some(ref nonce) = signature.nonce {
        let _ = write!(buffer, ",nonce=\"{nonce}\"");
    }

    let _ = write!(buffer, ",signature=\"{}\"", signature.string);

    buffer
}

/// Render the full header value, `<scheme> <parameters>`
#[must_use]
pub fn header_value(scheme: &str, signature: &Signature) -> String {
    format!("{scheme} {}", render(signature))
}

/// Split a header value into its scheme and parameter string
///
/// The scheme comparison is case-insensitive. Returns `None` if the schemes don't match.
#[must_use]
pub fn strip_scheme<'a>(value: &'a str, scheme: &str) -> Option<&'a str> {
    let (received_scheme, parameters) = value.trim().split_once(' ')?;
    received_scheme
        .eq_ignore_ascii_case(scheme)
        .then(|| parameters.trim())
}
