//!
//! HTTP message signing
//!
//! Signs outgoing HTTP requests with a keyed algorithm over a canonical signing string
//! and verifies incoming requests against registered clients.
//!
//! Supports RSA, HMAC, ECDSA and custom algorithms, the `(request-target)`, `(created)`
//! and `(expires)` pseudo-headers, and both the explicit (`rsa-sha256`) and the
//! `hs2019` algorithm parameter.
//!

#![forbid(rust_2018_idioms, unsafe_code)]
#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub use self::clock::{Clock, DeltaDirection, MockHandle};
pub use self::error::{Error, SignatureVerificationError, ValidationError};
pub use self::header::{Header, HeaderName, ParseHeaderError};
pub use self::key_id::KeyId;
pub use self::request::HttpRequestForSigning;
pub use self::signature::Signature;
pub use self::util::unix_seconds;
pub use ring;

pub mod algorithm;
pub mod authorization;
pub mod config;
pub mod digest;
pub mod policy;
pub mod signing;
pub mod signing_string;
pub mod verification;

mod clock;
mod error;
mod header;
mod key_id;
mod request;
mod signature;
mod util;

/// Type-erased error used at the seams to external collaborators (stores, hooks)
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type defaulting to the crate-wide error
pub type Result<T, E = Error> = std::result::Result<T, E>;
