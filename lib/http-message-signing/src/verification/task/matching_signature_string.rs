use super::{VerificationContext, VerificationTask};
use crate::{signing_string, SignatureVerificationError};

/// The signature verifies over the recomposed signing string
///
/// Requires `created` and `expires`. Every mismatch results in the same generic error.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchingSignatureString;

impl VerificationTask for MatchingSignatureString {
    fn verify(&self, context: &VerificationContext<'_>) -> Result<(), SignatureVerificationError> {
        let signature = context.signature;
        let created = signature
            .created
            .ok_or(SignatureVerificationError::MissingTimestamp("created"))?;
        let expires = signature
            .expires
            .ok_or(SignatureVerificationError::MissingTimestamp("expires"))?;

        let signing_string = signing_string::compose(
            context.request,
            &signature.headers,
            created,
            expires.duration_since(created).unwrap_or_default(),
            signature.nonce.as_deref(),
        );
        debug!(%signing_string, "composed signing string for verification");

        let Ok(received) = base64_simd::STANDARD.decode_to_vec(&signature.string) else {
            return Err(SignatureVerificationError::SignatureMismatch);
        };

        let is_valid = context
            .client
            .algorithm
            .verify_signature(signing_string.as_bytes(), &received)
            .unwrap_or(false);
        debug!(is_valid, "verified signature string");

        if is_valid {
            Ok(())
        } else {
            Err(SignatureVerificationError::SignatureMismatch)
        }
    }
}
