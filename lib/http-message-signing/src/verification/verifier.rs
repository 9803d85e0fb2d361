use super::{
    nonce::{InMemoryNonceStore, Nonce, NonceStore},
    task, ClientStore, VerificationContext, VerificationOptions, VerificationOutcome,
};
use crate::{
    authorization, policy::MandatoryHeaderPolicy, Clock, Error, HttpRequestForSigning, Result,
    SignatureVerificationError,
};
use http::header;

/// Receiving-side entry point
///
/// Resolves the client of a signed request and runs the verification pipeline against it.
/// Verification failures are reported through [`VerificationOutcome::Failure`], only failures
/// of the stores are returned as errors.
pub struct RequestSignatureVerifier<S, N = InMemoryNonceStore> {
    client_store: S,
    nonce_store: N,
    options: VerificationOptions,
    policy: MandatoryHeaderPolicy,
    clock: Clock,
}

impl<S, N> RequestSignatureVerifier<S, N>
where
    S: ClientStore,
    N: NonceStore,
{
    /// Construct a new verifier with the default policy and the system clock
    #[must_use]
    pub fn new(client_store: S, nonce_store: N, options: VerificationOptions) -> Self {
        Self {
            client_store,
            nonce_store,
            options,
            policy: MandatoryHeaderPolicy::default(),
            clock: Clock::new(),
        }
    }

    /// Replace the clock
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the mandatory header policy
    #[must_use]
    pub fn with_policy(mut self, policy: MandatoryHeaderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Store the clients are resolved from
    pub fn client_store(&self) -> &S {
        &self.client_store
    }

    /// Verification defaults
    pub fn options(&self) -> &VerificationOptions {
        &self.options
    }

    /// Verify the signature of the request
    #[instrument(skip_all, fields(method = %request.method, uri = %request.uri))]
    pub async fn verify(&self, request: &HttpRequestForSigning) -> Result<VerificationOutcome> {
        let Some(header_value) = request.first_header_value(header::AUTHORIZATION.as_str()) else {
            debug!("missing authorization header");
            return Ok(invalid_signature());
        };

        let Some(parameters) =
            authorization::strip_scheme(&header_value, &self.options.authorization_scheme)
        else {
            debug!("unexpected authorization scheme");
            return Ok(invalid_signature());
        };

        let signature = match authorization::parse(parameters) {
            Ok(signature) => signature,
            Err(error) => {
                debug!(?error, "malformed signature parameters");
                return Ok(invalid_signature());
            }
        };

        if let Err(error) = signature.validate() {
            debug!(?error, "invalid signature");
            return Ok(VerificationOutcome::failure(
                SignatureVerificationError::InvalidSignature,
                None,
                Some(signature),
            ));
        }

        let client = match self.client_store.get(&signature.key_id).await {
            Ok(client) => client,
            Err(Error::Verification(error)) => {
                debug!(key_id = %signature.key_id, "failed to resolve client");
                return Ok(VerificationOutcome::failure(error, None, Some(signature)));
            }
            Err(error) => return Err(error),
        };

        let now = self.clock.now();
        let context = VerificationContext {
            request,
            signature: &signature,
            client: &client,
            policy: &self.policy,
            now,
            clock_skew: client.clock_skew.unwrap_or(self.options.clock_skew),
        };

        if let Err(error) = task::run(&task::pipeline(), &context) {
            return Ok(VerificationOutcome::failure(
                error,
                Some(client),
                Some(signature),
            ));
        }

        if let Some(ref value) = signature.nonce {
            let lifetime = client.nonce_lifetime.unwrap_or(self.options.nonce_lifetime);
            let nonce = Nonce {
                key_id: client.key_id.clone(),
                value: value.clone(),
                expiration: now
                    .checked_add(lifetime)
                    .ok_or(Error::InvalidArgument("nonce_lifetime"))?,
            };

            if !self.nonce_store.register_if_unused(nonce, now).await? {
                debug!(key_id = %client.key_id, "replayed nonce");
                return Ok(VerificationOutcome::failure(
                    SignatureVerificationError::ReplayedNonce,
                    Some(client),
                    Some(signature),
                ));
            }
        }

        debug!(key_id = %client.key_id, "verified request");
        Ok(VerificationOutcome::success(client, signature))
    }
}

fn invalid_signature() -> VerificationOutcome {
    VerificationOutcome::failure(SignatureVerificationError::InvalidSignature, None, None)
}
