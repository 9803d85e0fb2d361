use super::{VerificationContext, VerificationTask};
use crate::{algorithm::HS2019, SignatureVerificationError};

/// The algorithm of the signature matches the algorithm bound to the client
///
/// Signatures without an algorithm or with `hs2019` leave the choice to the client's key
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchingAlgorithm;

impl VerificationTask for MatchingAlgorithm {
    fn verify(&self, context: &VerificationContext<'_>) -> Result<(), SignatureVerificationError> {
        let Some(algorithm) = context.signature.algorithm.as_deref() else {
            return Ok(());
        };

        if algorithm.eq_ignore_ascii_case(HS2019) {
            return Ok(());
        }

        context.requirement()?;

        if algorithm.eq_ignore_ascii_case(&context.client.algorithm.identifier()) {
            Ok(())
        } else {
            Err(SignatureVerificationError::AlgorithmMismatch)
        }
    }
}
