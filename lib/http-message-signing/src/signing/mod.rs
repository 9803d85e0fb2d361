//!
//! Sending side: settings, signature creation and the request signer
//!

use crate::{
    algorithm::{HashAlgorithm, Secret, SignatureAlgorithmKind, HS2019},
    authorization::DEFAULT_SCHEME,
    digest::DigestAlgorithm,
    BoxError, HeaderName, HttpRequestForSigning, KeyId, Signature, ValidationError,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc, time::Duration};
use typed_builder::TypedBuilder;

pub use self::creator::SignatureCreator;
pub use self::signer::RequestSigner;

mod creator;
mod ensurer;
mod sanitizer;
mod signer;

/// How the `algorithm` parameter is rendered
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmParameter {
    /// `family-hash`, e.g. `rsa-sha256`
    #[default]
    Explicit,

    /// The literal `hs2019` token, the receiver derives the algorithm from the key
    Hs2019,
}

/// Lifecycle hooks around signing a request
///
/// Both hooks are awaited. An error aborts the signing operation.
#[async_trait]
pub trait SigningEvents: Send + Sync {
    /// Called before the settings are validated
    ///
    /// The settings are a per-request copy and may be modified freely
    async fn on_request_signing(
        &self,
        _request: &mut HttpRequestForSigning,
        _settings: &mut SigningSettings,
    ) -> Result<(), BoxError> {
        Ok(())
    }

    /// Called after the authorization header has been set
    async fn on_request_signed(
        &self,
        _request: &HttpRequestForSigning,
        _signature: &Signature,
        _settings: &SigningSettings,
    ) -> Result<(), BoxError> {
        Ok(())
    }
}

fn default_headers() -> Vec<HeaderName> {
    vec![HeaderName::REQUEST_TARGET]
}

/// Sender-side configuration
///
/// Cloned for every signing operation, hooks only ever see the copy.
#[derive(Clone, TypedBuilder)]
pub struct SigningSettings {
    /// Key ID the receiver resolves the client with
    #[builder(setter(into))]
    pub key_id: KeyId,

    /// HMAC secret or private key
    #[builder(setter(into))]
    pub secret: Secret,

    /// Algorithm family
    pub algorithm: SignatureAlgorithmKind,

    /// Hash algorithm bound to the signature algorithm
    #[builder(default)]
    pub hash_algorithm: HashAlgorithm,

    /// Lifetime of the signature
    #[builder(default = Duration::from_secs(300))]
    pub expires: Duration,

    /// Ordered headers to include in the signature
    ///
    /// `(request-target)` and the headers mandatory for the algorithm are added automatically
    #[builder(default = default_headers())]
    pub headers: Vec<HeaderName>,

    /// Scheme of the authorization header
    #[builder(default = DEFAULT_SCHEME.into(), setter(into))]
    pub authorization_scheme: String,

    /// Algorithm of the `Digest` header
    ///
    /// If set, the digest is included in the signature of requests with a method other than `GET` and `HEAD`
    #[builder(default, setter(strip_option))]
    pub digest_algorithm: Option<DigestAlgorithm>,

    /// Rendering of the `algorithm` parameter
    #[builder(default)]
    pub algorithm_parameter: AlgorithmParameter,

    /// Include a random nonce in the signature
    #[builder(default)]
    pub enable_nonce: bool,

    /// Lifecycle hooks
    #[builder(default, setter(strip_option))]
    pub events: Option<Arc<dyn SigningEvents>>,
}

impl SigningSettings {
    /// Validate the structural requirements of the settings
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.key_id.is_empty() {
            return Err(ValidationError::MissingKeyId("signing settings"));
        }

        if self.secret.is_empty() {
            return Err(ValidationError::MissingSecret);
        }

        if self.headers.is_empty() || self.headers.iter().any(HeaderName::is_empty) {
            return Err(ValidationError::MissingHeaders);
        }

        if self.expires.is_zero() {
            return Err(ValidationError::MissingExpiration);
        }

        if self.authorization_scheme.trim().is_empty() {
            return Err(ValidationError::MissingAuthorizationScheme);
        }

        Ok(())
    }

    /// Family token the mandatory header policy is looked up with
    #[must_use]
    pub fn policy_family(&self) -> String {
        match self.algorithm_parameter {
            AlgorithmParameter::Explicit => self.algorithm.name(),
            AlgorithmParameter::Hs2019 => HS2019.into(),
        }
    }
}

impl fmt::Debug for SigningSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSettings")
            .field("key_id", &self.key_id)
            .field("secret", &self.secret)
            .field("algorithm", &self.algorithm)
            .field("hash_algorithm", &self.hash_algorithm)
            .field("expires", &self.expires)
            .field("headers", &self.headers)
            .field("authorization_scheme", &self.authorization_scheme)
            .field("digest_algorithm", &self.digest_algorithm)
            .field("algorithm_parameter", &self.algorithm_parameter)
            .field("enable_nonce", &self.enable_nonce)
            .field("events", &self.events.is_some())
            .finish()
    }
}
