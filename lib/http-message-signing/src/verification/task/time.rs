use super::{VerificationContext, VerificationTask};
use crate::{HeaderName, SignatureVerificationError};

/// The signature wasn't created in the future, give or take the clock skew
#[derive(Clone, Copy, Debug, Default)]
pub struct CreationTime;

impl VerificationTask for CreationTime {
    fn verify(&self, context: &VerificationContext<'_>) -> Result<(), SignatureVerificationError> {
        let Some(created) = context.signature.created else {
            if context.signature.includes_header(&HeaderName::CREATED) {
                return Err(SignatureVerificationError::MissingTimestamp("created"));
            }

            return Ok(());
        };

        if let Ok(ahead) = created.duration_since(context.now) {
            if ahead > context.clock_skew {
                return Err(SignatureVerificationError::CreatedInFuture);
            }
        }

        Ok(())
    }
}

/// The signature hasn't expired, give or take the clock skew
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpirationTime;

impl VerificationTask for ExpirationTime {
    fn verify(&self, context: &VerificationContext<'_>) -> Result<(), SignatureVerificationError> {
        let Some(expires) = context.signature.expires else {
            if context.signature.includes_header(&HeaderName::EXPIRES) {
                return Err(SignatureVerificationError::MissingTimestamp("expires"));
            }

            return Ok(());
        };

        if let Ok(behind) = context.now.duration_since(expires) {
            if behind > context.clock_skew {
                return Err(SignatureVerificationError::Expired);
            }
        }

        Ok(())
    }
}
