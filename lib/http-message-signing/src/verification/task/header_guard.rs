use super::{VerificationContext, VerificationTask};
use crate::{HeaderName, SignatureVerificationError};

fn guard(
    context: &VerificationContext<'_>,
    header: &HeaderName,
) -> Result<(), SignatureVerificationError> {
    if !context.signature.includes_header(header) {
        return Ok(());
    }

    if context.requirement()?.forbidden.contains(header) {
        return Err(SignatureVerificationError::HeaderNotAllowed(header.clone()));
    }

    Ok(())
}

/// `(created)` is only signed by algorithm families that allow it
#[derive(Clone, Copy, Debug, Default)]
pub struct CreatedHeaderGuard;

impl VerificationTask for CreatedHeaderGuard {
    fn verify(&self, context: &VerificationContext<'_>) -> Result<(), SignatureVerificationError> {
        guard(context, &HeaderName::CREATED)
    }
}

/// `(expires)` is only signed by algorithm families that allow it
#[derive(Clone, Copy, Debug, Default)]
pub struct ExpiresHeaderGuard;

impl VerificationTask for ExpiresHeaderGuard {
    fn verify(&self, context: &VerificationContext<'_>) -> Result<(), SignatureVerificationError> {
        guard(context, &HeaderName::EXPIRES)
    }
}

#[cfg(test)]
mod test {
    use super::{CreatedHeaderGuard, ExpiresHeaderGuard};
    use crate::{
        verification::task::{fixture, VerificationTask},
        HeaderName, SignatureVerificationError,
    };

    #[test]
    fn legacy_families_forbid_timestamps() {
        let (request, client, policy) = (fixture::request(), fixture::client(), fixture::policy());
        let mut signature = fixture::signature(&request, &client);
        signature.headers.push(HeaderName::CREATED);
        signature.headers.push(HeaderName::EXPIRES);

        let context = fixture::context(&request, &signature, &client, &policy);
        assert_eq!(
            CreatedHeaderGuard.verify(&context),
            Err(SignatureVerificationError::HeaderNotAllowed(
                HeaderName::CREATED
            ))
        );
        assert_eq!(
            ExpiresHeaderGuard.verify(&context),
            Err(SignatureVerificationError::HeaderNotAllowed(
                HeaderName::EXPIRES
            ))
        );
    }

    #[test]
    fn hs2019_allows_timestamps() {
        let (request, client, policy) = (fixture::request(), fixture::client(), fixture::policy());
        let mut signature = fixture::signature(&request, &client);
        signature.algorithm = Some("hs2019".into());
        signature.headers.push(HeaderName::CREATED);
        signature.headers.push(HeaderName::EXPIRES);

        let context = fixture::context(&request, &signature, &client, &policy);
        assert_eq!(CreatedHeaderGuard.verify(&context), Ok(()));
        assert_eq!(ExpiresHeaderGuard.verify(&context), Ok(()));
    }

    #[test]
    fn absent_timestamps_pass() {
        let (request, client, policy) = (fixture::request(), fixture::client(), fixture::policy());
        let signature = fixture::signature(&request, &client);

        let context = fixture::context(&request, &signature, &client, &policy);
        assert_eq!(CreatedHeaderGuard.verify(&context), Ok(()));
        assert_eq!(ExpiresHeaderGuard.verify(&context), Ok(()));
    }
}
