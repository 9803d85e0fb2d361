use crate::{BoxError, HeaderName, KeyId};
use http::header::{InvalidHeaderName, InvalidHeaderValue};
use miette::Diagnostic;
use ring::error::{KeyRejected, Unspecified};
use std::time::SystemTimeError;
use thiserror::Error;

/// Crate-wide error
///
/// Verification failures are wrapped in [`Error::Verification`]. Everything else is either
/// a configuration problem or a transient failure of an external collaborator.
#[derive(Debug, Diagnostic, Error)]
pub enum Error {
    /// Failed to decode a Base64 payload
    #[error(transparent)]
    Base64(#[from] base64_simd::Error),

    /// A client with the same key ID is already registered
    #[error("A client with key ID '{0}' is already registered")]
    DuplicateClient(KeyId),

    /// A lifecycle hook failed
    #[error("Signing hook failed")]
    Hook(#[source] BoxError),

    /// Argument was empty or otherwise unusable
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Header name can't be represented on an HTTP request
    #[error(transparent)]
    InvalidHeaderName(#[from] InvalidHeaderName),

    /// Header value can't be represented on an HTTP request
    #[error(transparent)]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    /// Key material failed to parse
    #[error(transparent)]
    Key(#[from] crate::algorithm::key::Error),

    /// Key material was rejected by the cryptography backend
    #[error(transparent)]
    KeyRejected(#[from] KeyRejected),

    /// The algorithm instance only holds a public key
    #[error("Signature algorithm requires a private key to sign")]
    MissingPrivateKey,

    /// Unspecified failure inside the cryptography backend
    #[error(transparent)]
    RingUnspecified(#[from] Unspecified),

    /// Client or nonce store failure
    #[error("Store operation failed")]
    Store(#[source] BoxError),

    /// Time before the unix epoch
    #[error(transparent)]
    SystemTime(#[from] SystemTimeError),

    /// No algorithm is registered for the family, or the family doesn't support the hash
    #[error("Unsupported signature algorithm '{family}' with hash '{hash}'")]
    UnsupportedAlgorithm {
        /// Algorithm family name
        family: String,
        /// Hash algorithm name
        hash: String,
    },

    /// Settings or signature failed validation
    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    /// Signature verification failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Verification(#[from] SignatureVerificationError),
}

/// Malformed or incomplete configuration or signature
#[derive(Clone, Debug, Diagnostic, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Authorization scheme is empty
    #[error("The signing settings do not specify a valid authorization scheme")]
    MissingAuthorizationScheme,

    /// Expiration duration is zero
    #[error("The signing settings do not specify a valid expiration duration")]
    MissingExpiration,

    /// Header list is empty or contains an empty name
    #[error("The signing settings do not specify valid headers to include in the signature")]
    MissingHeaders,

    /// Key ID is empty
    #[error("The {0} does not specify a valid key ID")]
    MissingKeyId(&'static str),

    /// Secret is empty
    #[error("The signing settings do not specify a valid secret")]
    MissingSecret,

    /// Signature string is empty
    #[error("The signature does not specify a valid signature string")]
    MissingSignatureString,

    /// Algorithm family not covered by the mandatory header policy
    #[error("The algorithm family '{0}' has no mandatory header policy")]
    UnknownAlgorithmFamily(String),
}

/// Verification failure
///
/// Messages are deliberately generic. They never contain key material and never reveal
/// whether a client exists.
#[derive(Clone, Debug, Diagnostic, Error, PartialEq, Eq)]
pub enum SignatureVerificationError {
    /// Signature algorithm doesn't match the algorithm bound to the client
    #[error("The signature algorithm does not match the algorithm of the client")]
    AlgorithmMismatch,

    /// Signature claims a timestamp in the future
    #[error("The signature was created in the future")]
    CreatedInFuture,

    /// Digest header doesn't match the request body
    #[error("The digest header does not match the request body")]
    DigestMismatch,

    /// Signature expired
    #[error("The signature has expired")]
    Expired,

    /// Signature header list includes a pseudo-header the algorithm doesn't allow
    #[error("The '{0}' header is not allowed for the signature algorithm")]
    HeaderNotAllowed(HeaderName),

    /// Missing or malformed authorization header
    #[error("The request does not contain a valid signature")]
    InvalidSignature,

    /// Header is required but absent from the signature or the request
    #[error("The '{0}' header is required but is missing")]
    MissingHeader(HeaderName),

    /// Signature doesn't carry a timestamp required for verification
    #[error("The signature does not contain a value for the {0} property, but it is required")]
    MissingTimestamp(&'static str),

    /// Nonce was already used within its lifetime
    #[error("The nonce has already been used")]
    ReplayedNonce,

    /// Signature string doesn't verify
    #[error("The signature string does not match the expected value")]
    SignatureMismatch,

    /// No client is registered under the key ID
    #[error("No client with the specified key ID is registered")]
    UnknownClient,

    /// Algorithm family of the signature is unknown
    #[error("The signature algorithm '{0}' is not supported")]
    UnsupportedAlgorithm(String),
}
