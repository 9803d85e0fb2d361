//!
//! Checks run against a received request, its signature and the resolved client
//!
//! The tasks run in a fixed order and the pipeline stops at the first failure.
//! None of them touch shared state, the nonce check runs separately after them.
//!

use super::Client;
use crate::{
    policy::{HeaderRequirement, MandatoryHeaderPolicy},
    HttpRequestForSigning, Signature, SignatureVerificationError,
};
use enum_dispatch::enum_dispatch;
use std::time::{Duration, SystemTime};

pub use self::all_headers_present::AllHeadersPresent;
pub use self::digest::MatchingDigest;
pub use self::header_guard::{CreatedHeaderGuard, ExpiresHeaderGuard};
pub use self::matching_algorithm::MatchingAlgorithm;
pub use self::matching_signature_string::MatchingSignatureString;
pub use self::time::{CreationTime, ExpirationTime};

mod all_headers_present;
mod digest;
mod header_guard;
mod matching_algorithm;
mod matching_signature_string;
mod time;

/// Everything a task gets to look at
#[derive(Clone, Copy)]
pub struct VerificationContext<'a> {
    /// Received request
    pub request: &'a HttpRequestForSigning,

    /// Signature claimed by the request
    pub signature: &'a Signature,

    /// Client resolved by the key ID of the signature
    pub client: &'a Client,

    /// Mandatory header policy
    pub policy: &'a MandatoryHeaderPolicy,

    /// Time of the verification
    pub now: SystemTime,

    /// Tolerated clock skew
    pub clock_skew: Duration,
}

impl VerificationContext<'_> {
    /// Header requirement of the signature's algorithm family
    ///
    /// Unknown families are unsupported
    pub fn requirement(&self) -> Result<&HeaderRequirement, SignatureVerificationError> {
        self.policy
            .requirement_for(self.signature.algorithm.as_deref())
            .map_err(|_| {
                SignatureVerificationError::UnsupportedAlgorithm(
                    self.signature
                        .algorithm
                        .clone()
                        .unwrap_or_else(|| crate::algorithm::HS2019.into()),
                )
            })
    }
}

/// Single check of the verification pipeline
#[enum_dispatch]
pub trait VerificationTask {
    /// Run the check
    fn verify(&self, context: &VerificationContext<'_>) -> Result<(), SignatureVerificationError>;
}

/// Any of the built-in tasks
#[enum_dispatch(VerificationTask)]
#[derive(Clone, Copy, Debug)]
pub enum Task {
    /// See [`MatchingAlgorithm`]
    MatchingAlgorithm,

    /// See [`CreatedHeaderGuard`]
    CreatedHeaderGuard,

    /// See [`ExpiresHeaderGuard`]
    ExpiresHeaderGuard,

    /// See [`AllHeadersPresent`]
    AllHeadersPresent,

    /// See [`CreationTime`]
    CreationTime,

    /// See [`ExpirationTime`]
    ExpirationTime,

    /// See [`MatchingDigest`]
    MatchingDigest,

    /// See [`MatchingSignatureString`]
    MatchingSignatureString,
}

/// Built-in tasks in the order they run
#[must_use]
pub fn pipeline() -> [Task; 8] {
    [
        MatchingAlgorithm.into(),
        CreatedHeaderGuard.into(),
        ExpiresHeaderGuard.into(),
        AllHeadersPresent.into(),
        CreationTime.into(),
        ExpirationTime.into(),
        MatchingDigest.into(),
        MatchingSignatureString.into(),
    ]
}

/// Run the tasks in order, stopping at the first failure
pub fn run(
    tasks: &[Task],
    context: &VerificationContext<'_>,
) -> Result<(), SignatureVerificationError> {
    for task in tasks {
        if let Err(error) = task.verify(context) {
            debug!(?task, %error, "verification task failed");
            return Err(error);
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod fixture {
    use super::VerificationContext;
    use crate::{
        algorithm::{HashAlgorithm, HmacSignatureAlgorithm},
        policy::MandatoryHeaderPolicy,
        signing_string,
        util::UnixTimestampExt,
        verification::Client,
        HeaderName, HttpRequestForSigning, Signature,
    };
    use http::{HeaderValue, Method};
    use std::{
        sync::Arc,
        time::{Duration, SystemTime},
    };

    pub const CREATED: u64 = 1_582_543_214;
    pub const EXPIRES: u64 = CREATED + 300;

    pub fn client() -> Client {
        let algorithm = HmacSignatureAlgorithm::new(HashAlgorithm::Sha256, b"s3cr3t").unwrap();
        Client::builder()
            .key_id("client1")
            .name("Unit test app")
            .algorithm(Arc::new(algorithm))
            .build()
    }

    pub fn request() -> HttpRequestForSigning {
        let mut request = HttpRequestForSigning::new(
            Method::POST,
            "http://example.test/api/resource/1".parse().unwrap(),
        )
        .with_body("{}");
        request.headers.insert(
            "date",
            HeaderValue::from_static("Mon, 24 Feb 2020 11:20:14 GMT"),
        );
        request.headers.insert(
            "digest",
            HeaderValue::from_static("SHA-256=RBNvo1WzZ4oRRq0W9+hknpT7T8If536DEMBg9hyq/4o="),
        );
        request
    }

    /// Correctly signed signature over `(request-target) date digest`
    pub fn signature(request: &HttpRequestForSigning, client: &Client) -> Signature {
        let headers = vec![HeaderName::REQUEST_TARGET, HeaderName::DATE, HeaderName::DIGEST];
        let created = SystemTime::from_unix_timestamp(CREATED);
        let signing_string = signing_string::compose(
            request,
            &headers,
            created,
            Duration::from_secs(EXPIRES - CREATED),
            None,
        );
        let raw = client
            .algorithm
            .compute_hash(signing_string.as_bytes())
            .unwrap();

        Signature {
            key_id: client.key_id.clone(),
            algorithm: Some("hmac-sha256".into()),
            created: Some(created),
            expires: Some(SystemTime::from_unix_timestamp(EXPIRES)),
            headers,
            string: base64_simd::STANDARD.encode_to_string(raw),
            nonce: None,
        }
    }

    pub fn policy() -> MandatoryHeaderPolicy {
        MandatoryHeaderPolicy::default()
    }

    pub fn context<'a>(
        request: &'a HttpRequestForSigning,
        signature: &'a Signature,
        client: &'a Client,
        policy: &'a MandatoryHeaderPolicy,
    ) -> VerificationContext<'a> {
        VerificationContext {
            request,
            signature,
            client,
            policy,
            now: SystemTime::from_unix_timestamp(CREATED + 10),
            clock_skew: Duration::from_secs(60),
        }
    }
}
