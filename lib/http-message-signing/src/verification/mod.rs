//!
//! Receiving side: clients, stores and the verification pipeline
//!

use crate::{
    algorithm::SignatureAlgorithm, authorization::DEFAULT_SCHEME, KeyId, Signature,
    SignatureVerificationError,
};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc, time::Duration};
use typed_builder::TypedBuilder;

pub use self::nonce::{InMemoryNonceStore, Nonce, NonceStore};
pub use self::store::{CachingClientStore, ClientCache, ClientStore, InMemoryClientStore};
pub use self::task::{VerificationContext, VerificationTask};
pub use self::verifier::RequestSignatureVerifier;

pub mod task;

mod nonce;
mod store;
mod verifier;

/// Claim name carrying the key ID of the verified client
pub const APP_ID_CLAIM: &str = "appid";

/// Claim name carrying the display name of the verified client
pub const NAME_CLAIM: &str = "name";

/// Additional identity information attached to a client
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct Claim {
    /// Claim type
    pub name: String,

    /// Claim value
    pub value: String,
}

impl Claim {
    /// Construct a new claim
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Registered party whose requests can be verified
///
/// Two clients are equal if their key IDs are equal
#[derive(Clone, TypedBuilder)]
pub struct Client {
    /// Key ID the client signs with
    #[builder(setter(into))]
    pub key_id: KeyId,

    /// Display name
    #[builder(setter(into))]
    pub name: String,

    /// Algorithm keyed with the client's secret or public key
    pub algorithm: Arc<dyn SignatureAlgorithm>,

    /// Lifetime of nonces, overrides the verifier default
    #[builder(default, setter(strip_option))]
    pub nonce_lifetime: Option<Duration>,

    /// Tolerated clock skew, overrides the verifier default
    #[builder(default, setter(strip_option))]
    pub clock_skew: Option<Duration>,

    /// Additional claims attached to successful verifications
    #[builder(default)]
    pub claims: Vec<Claim>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("key_id", &self.key_id)
            .field("name", &self.name)
            .field("algorithm", &self.algorithm.identifier())
            .field("nonce_lifetime", &self.nonce_lifetime)
            .field("clock_skew", &self.clock_skew)
            .field("claims", &self.claims)
            .finish()
    }
}

impl PartialEq for Client {
    fn eq(&self, other: &Self) -> bool {
        self.key_id == other.key_id
    }
}

impl Eq for Client {}

/// Defaults of the verification pipeline
#[derive(Clone, Debug, TypedBuilder)]
pub struct VerificationOptions {
    /// Scheme of the authorization header
    #[builder(default = DEFAULT_SCHEME.into(), setter(into))]
    pub authorization_scheme: String,

    /// Tolerated clock skew when checking `created` and `expires`
    #[builder(default = Duration::from_secs(60))]
    pub clock_skew: Duration,

    /// Lifetime of nonces of clients without an override
    #[builder(default = Duration::from_secs(300))]
    pub nonce_lifetime: Duration,
}

impl Default for VerificationOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Successful verification
#[derive(Clone, Debug)]
pub struct VerificationSuccess {
    /// Verified client
    pub client: Client,

    /// Verified signature
    pub signature: Signature,

    /// Identity derived from the client
    pub claims: Vec<Claim>,
}

/// Failed verification
#[derive(Clone, Debug)]
pub struct VerificationFailure {
    /// Reason of the failure
    pub error: SignatureVerificationError,

    /// Resolved client, if the failure happened after the lookup
    pub client: Option<Client>,

    /// Parsed signature, if the failure happened after parsing
    pub signature: Option<Signature>,
}

/// Outcome of verifying a request
#[derive(Clone, Debug)]
pub enum VerificationOutcome {
    /// Request is authentic
    Success(VerificationSuccess),

    /// Request was rejected
    Failure(VerificationFailure),
}

impl VerificationOutcome {
    pub(crate) fn success(client: Client, signature: Signature) -> Self {
        let claims = [
            Claim::new(APP_ID_CLAIM, client.key_id.as_str()),
            Claim::new(NAME_CLAIM, client.name.as_str()),
        ]
        .into_iter()
        .chain(client.claims.iter().cloned())
        .collect();

        Self::Success(VerificationSuccess {
            client,
            signature,
            claims,
        })
    }

    pub(crate) fn failure(
        error: SignatureVerificationError,
        client: Option<Client>,
        signature: Option<Signature>,
    ) -> Self {
        Self::Failure(VerificationFailure {
            error,
            client,
            signature,
        })
    }

    /// Whether the request is authentic
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(..))
    }

    /// Claims of a successful verification
    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        match self {
            Self::Success(success) => &success.claims,
            Self::Failure(..) => &[],
        }
    }

    /// Error of a failed verification
    #[must_use]
    pub fn error(&self) -> Option<&SignatureVerificationError> {
        match self {
            Self::Success(..) => None,
            Self::Failure(failure) => Some(&failure.error),
        }
    }
}
