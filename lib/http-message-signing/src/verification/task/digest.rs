use super::{VerificationContext, VerificationTask};
use crate::{digest, HeaderName, SignatureVerificationError};

/// A signed `Digest` header matches the body
///
/// A request without a body is treated as having an empty body
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchingDigest;

impl VerificationTask for MatchingDigest {
    fn verify(&self, context: &VerificationContext<'_>) -> Result<(), SignatureVerificationError> {
        if !context.signature.includes_header(&HeaderName::DIGEST) {
            return Ok(());
        }

        let Some(value) = context
            .request
            .first_header_value(HeaderName::DIGEST.as_str())
        else {
            return Err(SignatureVerificationError::MissingHeader(HeaderName::DIGEST));
        };

        let body = context.request.body.as_deref().unwrap_or_default();
        if digest::matches(&value, body) {
            Ok(())
        } else {
            Err(SignatureVerificationError::DigestMismatch)
        }
    }
}

#[cfg(test)]
mod test {
    use super::MatchingDigest;
    use crate::{
        verification::task::{fixture, VerificationTask},
        HeaderName, SignatureVerificationError,
    };

    #[test]
    fn matching_body() {
        let (request, client, policy) = (fixture::request(), fixture::client(), fixture::policy());
        let signature = fixture::signature(&request, &client);

        let context = fixture::context(&request, &signature, &client, &policy);
        assert_eq!(MatchingDigest.verify(&context), Ok(()));
    }

    #[test]
    fn tampered_body() {
        let (client, policy) = (fixture::client(), fixture::policy());
        let request = fixture::request().with_body("{\"admin\": true}");
        let signature = fixture::signature(&request, &client);

        let context = fixture::context(&request, &signature, &client, &policy);
        assert_eq!(
            MatchingDigest.verify(&context),
            Err(SignatureVerificationError::DigestMismatch)
        );
    }

    #[test]
    fn unsigned_digest_is_ignored() {
        let (client, policy) = (fixture::client(), fixture::policy());
        let request = fixture::request().with_body("tampered");
        let mut signature = fixture::signature(&request, &client);
        signature.headers.retain(|name| *name != HeaderName::DIGEST);

        let context = fixture::context(&request, &signature, &client, &policy);
        assert_eq!(MatchingDigest.verify(&context), Ok(()));
    }
}
