use super::{AlgorithmParameter, SigningSettings};
use crate::{
    algorithm::{SignatureAlgorithmRegistry, HS2019},
    signing_string, Error, HttpRequestForSigning, Result, Signature,
};
use ring::rand::{SecureRandom, SystemRandom};

/// Length of generated nonces in bytes
const NONCE_LENGTH: usize = 16;

fn generate_nonce() -> Result<String> {
    let mut nonce = [0; NONCE_LENGTH];
    SystemRandom::new().fill(&mut nonce)?;
    Ok(base64_simd::STANDARD.encode_to_string(nonce))
}

/// Creates signatures from validated settings
///
/// Deterministic for identical inputs unless nonces are enabled
#[derive(Clone, Debug, Default)]
pub struct SignatureCreator {
    registry: SignatureAlgorithmRegistry,
}

impl SignatureCreator {
    /// Construct a new creator using the algorithms of the registry
    #[must_use]
    pub fn new(registry: SignatureAlgorithmRegistry) -> Self {
        Self { registry }
    }

    /// Registry the algorithm instances are constructed from
    #[must_use]
    pub fn registry(&self) -> &SignatureAlgorithmRegistry {
        &self.registry
    }

    /// Sign the request with the settings at the specified point in time
    ///
    /// The header list is used as-is, the request isn't modified
    pub fn create_signature(
        &self,
        request: &HttpRequestForSigning,
        settings: &SigningSettings,
        time_of_signing: std::time::SystemTime,
    ) -> Result<Signature> {
        settings.validate()?;
        let expires = time_of_signing
            .checked_add(settings.expires)
            .ok_or(Error::InvalidArgument("expires"))?;

        let nonce = if settings.enable_nonce {
            Some(generate_nonce()?)
        } else {
            None
        };

        let signing_string = signing_string::compose(
            request,
            &settings.headers,
            time_of_signing,
            settings.expires,
            nonce.as_deref(),
        );
        debug!(%signing_string, "composed signing string");

        let algorithm = self.registry.create(
            &settings.algorithm,
            settings.hash_algorithm,
            settings.secret.as_bytes(),
        )?;
        let raw_signature = algorithm.compute_hash(signing_string.as_bytes())?;

        let algorithm_identifier = match settings.algorithm_parameter {
            AlgorithmParameter::Explicit => algorithm.identifier(),
            AlgorithmParameter::Hs2019 => HS2019.into(),
        };

        Ok(Signature {
            key_id: settings.key_id.clone(),
            algorithm: Some(algorithm_identifier),
            created: Some(time_of_signing),
            expires: Some(expires),
            headers: settings.headers.clone(),
            string: base64_simd::STANDARD.encode_to_string(raw_signature),
            nonce,
        })
    }
}
