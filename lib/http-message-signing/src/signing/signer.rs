use super::{creator::SignatureCreator, ensurer, sanitizer, SigningSettings};
use crate::{
    algorithm::SignatureAlgorithmRegistry, authorization, policy::MandatoryHeaderPolicy,
    util::UnixTimestampExt, Clock, Error, HttpRequestForSigning, Result, Signature,
};
use http::{header, HeaderValue, Request};

/// Sending-side entry point
///
/// Signs requests with a private copy of the configured settings, injects the mandatory headers
/// and sets the authorization header.
#[derive(Debug)]
pub struct RequestSigner {
    settings: SigningSettings,
    creator: SignatureCreator,
    policy: MandatoryHeaderPolicy,
    clock: Clock,
}

impl RequestSigner {
    /// Construct a new signer with the default algorithms, policy and system clock
    #[must_use]
    pub fn new(settings: SigningSettings) -> Self {
        Self {
            settings,
            creator: SignatureCreator::default(),
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

    /// Replace the algorithm registry
    #[must_use]
    pub fn with_registry(mut self, registry: SignatureAlgorithmRegistry) -> Self {
        self.creator = SignatureCreator::new(registry);
        self
    }

    /// Settings every signing operation starts from
    #[must_use]
    pub fn settings(&self) -> &SigningSettings {
        &self.settings
    }

    /// Sign the request
    ///
    /// Failures are logged and returned unchanged. Headers injected before the failure (`Date`, `Digest`)
    /// stay on the request. The authorization header is set once the signature is created, so it is
    /// present when only the `on_request_signed` hook fails.
    #[instrument(skip_all, fields(key_id = %self.settings.key_id))]
    pub async fn sign(&self, request: &mut HttpRequestForSigning) -> Result<Signature> {
        match self.try_sign(request).await {
            Ok(signature) => Ok(signature),
            Err(error) => {
                error!(?error, "failed to sign request");
                Err(error)
            }
        }
    }

    async fn try_sign(&self, request: &mut HttpRequestForSigning) -> Result<Signature> {
        let mut settings = self.settings.clone();

        if let Some(events) = settings.events.clone() {
            events
                .on_request_signing(request, &mut settings)
                .await
                .map_err(Error::Hook)?;
        }

        settings.validate()?;

        let requirement = self.policy.requirement(&settings.policy_family())?;
        sanitizer::sanitize(&mut settings, request, requirement);

        let time_of_signing = self.clock.now().truncate_to_secs()?;
        ensurer::ensure_headers(
            request,
            &settings.headers,
            time_of_signing,
            settings.digest_algorithm.unwrap_or_default(),
        )?;

        let signature = self
            .creator
            .create_signature(request, &settings, time_of_signing)?;

        let authorization =
            authorization::header_value(&settings.authorization_scheme, &signature);
        request
            .headers
            .insert(header::AUTHORIZATION, HeaderValue::from_str(&authorization)?);

        if let Some(ref events) = settings.events {
            events
                .on_request_signed(request, &signature, &settings)
                .await
                .map_err(Error::Hook)?;
        }

        debug!(headers = ?signature.headers, "signed request");

        Ok(signature)
    }

    /// Sign an `http` request in place
    ///
    /// The body is included for the `Digest` header. Injected headers are written back onto the request.
    pub async fn sign_http_request<B>(&self, request: &mut Request<B>) -> Result<Signature>
    where
        B: AsRef<[u8]>,
    {
        let mut request_for_signing = HttpRequestForSigning::from_request(request);
        let signature = self.sign(&mut request_for_signing).await?;
        request_for_signing.apply_headers(request.headers_mut());

        Ok(signature)
    }
}
