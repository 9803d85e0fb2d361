use super::{VerificationContext, VerificationTask};
use crate::{HeaderName, SignatureVerificationError};

/// Every signed header is present on the request and the signature covers the mandatory headers
///
/// `(request-target)` is always mandatory, the rest depends on the algorithm family
#[derive(Clone, Copy, Debug, Default)]
pub struct AllHeadersPresent;

impl VerificationTask for AllHeadersPresent {
    fn verify(&self, context: &VerificationContext<'_>) -> Result<(), SignatureVerificationError> {
        let signature = context.signature;

        if !signature.includes_header(&HeaderName::REQUEST_TARGET) {
            return Err(SignatureVerificationError::MissingHeader(
                HeaderName::REQUEST_TARGET,
            ));
        }

        for required in &context.requirement()?.required {
            if !signature.includes_header(required) {
                return Err(SignatureVerificationError::MissingHeader(required.clone()));
            }
        }

        let missing = signature.headers.iter().find(|name| {
            !name.is_pseudo_header() && !context.request.contains_header(name.as_str())
        });
        if let Some(missing) = missing {
            return Err(SignatureVerificationError::MissingHeader(missing.clone()));
        }

        Ok(())
    }
}
