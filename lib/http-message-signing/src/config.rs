//!
//! Serde representations of the signing and verification configuration
//!
//! Meant to be loaded from TOML files. Durations are expressed in whole seconds.
//!

use crate::{
    algorithm::{
        HashAlgorithm, Secret, SignatureAlgorithm, SignatureAlgorithmKind,
        SignatureAlgorithmRegistry,
    },
    authorization::DEFAULT_SCHEME,
    digest::DigestAlgorithm,
    signing::{AlgorithmParameter, SigningSettings},
    verification::{Claim, Client, VerificationOptions},
    Error, HeaderName, KeyId, Result,
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};

fn default_authorization_scheme() -> String {
    DEFAULT_SCHEME.into()
}

fn default_expires_secs() -> u64 {
    300
}

fn default_headers() -> Vec<HeaderName> {
    vec![HeaderName::REQUEST_TARGET]
}

fn default_clock_skew_secs() -> u64 {
    60
}

fn default_nonce_lifetime_secs() -> u64 {
    300
}

/// Configuration of the sending side, see [`SigningSettings`]
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SigningConfiguration {
    /// Key ID the receiver resolves the client with
    pub key_id: KeyId,
    /// HMAC secret or PEM-encoded private key
    pub secret: Secret,
    /// Algorithm family
    pub algorithm: SignatureAlgorithmKind,
    /// Hash algorithm bound to the signature algorithm
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,
    /// Lifetime of the signature
    #[serde(default = "default_expires_secs")]
    pub expires_secs: u64,
    /// Headers to include in the signature
    #[serde(default = "default_headers")]
    pub headers: Vec<HeaderName>,
    /// Scheme of the authorization header
    #[serde(default = "default_authorization_scheme")]
    pub authorization_scheme: String,
    /// Algorithm of the `Digest` header
    #[serde(default)]
    pub digest_algorithm: Option<DigestAlgorithm>,
    /// Rendering of the `algorithm` parameter
    #[serde(default)]
    pub algorithm_parameter: AlgorithmParameter,
    /// Include a random nonce in the signature
    #[serde(default)]
    pub enable_nonce: bool,
}

impl TryFrom<SigningConfiguration> for SigningSettings {
    type Error = Error;

    fn try_from(config: SigningConfiguration) -> Result<Self, Self::Error> {
        let settings = SigningSettings {
            key_id: config.key_id,
            secret: config.secret,
            algorithm: config.algorithm,
            hash_algorithm: config.hash_algorithm,
            expires: Duration::from_secs(config.expires_secs),
            headers: config.headers,
            authorization_scheme: config.authorization_scheme,
            digest_algorithm: config.digest_algorithm,
            algorithm_parameter: config.algorithm_parameter,
            enable_nonce: config.enable_nonce,
            events: None,
        };
        settings.validate()?;

        Ok(settings)
    }
}

/// Client known to the receiving side, see [`Client`]
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfiguration {
    /// Key ID the client signs with
    pub key_id: KeyId,
    /// Display name
    pub name: String,
    /// Algorithm family
    pub algorithm: SignatureAlgorithmKind,
    /// Hash algorithm bound to the signature algorithm
    #[serde(default)]
    pub hash_algorithm: HashAlgorithm,
    /// HMAC secret
    #[serde(default)]
    pub secret: Option<Secret>,
    /// PEM-encoded public key of RSA and ECDSA clients
    #[serde(default)]
    pub public_key: Option<String>,
    /// Lifetime of nonces, overrides the verifier default
    #[serde(default)]
    pub nonce_lifetime_secs: Option<u64>,
    /// Tolerated clock skew, overrides the verifier default
    #[serde(default)]
    pub clock_skew_secs: Option<u64>,
    /// Additional claims attached to successful verifications
    #[serde(default)]
    pub claims: Vec<Claim>,
}

impl ClientConfiguration {
    /// Construct the client, keying its algorithm through the registry
    pub fn into_client(self, registry: &SignatureAlgorithmRegistry) -> Result<Client> {
        if self.key_id.is_empty() {
            return Err(Error::InvalidArgument("key-id"));
        }

        let algorithm: Arc<dyn SignatureAlgorithm> = match (self.secret, self.public_key) {
            (Some(secret), None) => registry
                .create(&self.algorithm, self.hash_algorithm, secret.as_bytes())?
                .into(),
            (None, Some(public_key)) => registry
                .create(&self.algorithm, self.hash_algorithm, public_key.as_bytes())?
                .into(),
            _ => return Err(Error::InvalidArgument("secret or public-key")),
        };

        Ok(Client {
            key_id: self.key_id,
            name: self.name,
            algorithm,
            nonce_lifetime: self.nonce_lifetime_secs.map(Duration::from_secs),
            clock_skew: self.clock_skew_secs.map(Duration::from_secs),
            claims: self.claims,
        })
    }
}

/// Configuration of the receiving side
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct VerificationConfiguration {
    /// Scheme of the authorization header
    #[serde(default = "default_authorization_scheme")]
    pub authorization_scheme: String,
    /// Tolerated clock skew
    #[serde(default = "default_clock_skew_secs")]
    pub clock_skew_secs: u64,
    /// Default lifetime of nonces
    #[serde(default = "default_nonce_lifetime_secs")]
    pub nonce_lifetime_secs: u64,
    /// Zero or negative values disable the client cache
    #[serde(default)]
    pub client_cache_ttl_secs: i64,
    /// Registered clients
    #[serde(default)]
    pub clients: Vec<ClientConfiguration>,
}

impl VerificationConfiguration {
    /// Time-to-live of cached clients
    #[must_use]
    pub fn client_cache_ttl(&self) -> Duration {
        u64::try_from(self.client_cache_ttl_secs)
            .map(Duration::from_secs)
            .unwrap_or(Duration::ZERO)
    }

    /// Verification defaults
    #[must_use]
    pub fn options(&self) -> VerificationOptions {
        VerificationOptions {
            authorization_scheme: self.authorization_scheme.clone(),
            clock_skew: Duration::from_secs(self.clock_skew_secs),
            nonce_lifetime: Duration::from_secs(self.nonce_lifetime_secs),
        }
    }

    /// Construct every configured client
    pub fn clients(&self, registry: &SignatureAlgorithmRegistry) -> Result<Vec<Client>> {
        self.clients
            .iter()
            .cloned()
            .map(|client| client.into_client(registry))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::{SigningConfiguration, VerificationConfiguration};
    use crate::{
        algorithm::{HashAlgorithm, SignatureAlgorithmKind, SignatureAlgorithmRegistry},
        digest::DigestAlgorithm,
        signing::{AlgorithmParameter, SigningSettings},
        Error, HeaderName, ValidationError,
    };
    use std::time::Duration;

    const SIGNING: &str = r#"
        key-id = "client1"
        secret = "s3cr3t"
        algorithm = "hmac"
        hash-algorithm = "sha512"
        headers = ["date", "digest"]
        digest-algorithm = "sha-256"
        algorithm-parameter = "hs2019"
    "#;

    const VERIFICATION: &str = r#"
        client-cache-ttl-secs = -5

        [[clients]]
        key-id = "client1"
        name = "Unit test app"
        algorithm = "hmac"
        secret = "s3cr3t"
        clock-skew-secs = 10
        claims = [{ name = "role", value = "admin" }]
    "#;

    #[test]
    fn signing_settings() {
        let config: SigningConfiguration = toml::from_str(SIGNING).unwrap();
        let settings = SigningSettings::try_from(config).unwrap();

        assert_eq!(settings.key_id.as_str(), "client1");
        assert_eq!(settings.algorithm, SignatureAlgorithmKind::Hmac);
        assert_eq!(settings.hash_algorithm, HashAlgorithm::Sha512);
        assert_eq!(settings.expires, Duration::from_secs(300));
        assert_eq!(settings.headers, [HeaderName::DATE, HeaderName::DIGEST]);
        assert_eq!(settings.authorization_scheme, "Signature");
        assert_eq!(settings.digest_algorithm, Some(DigestAlgorithm::Sha256));
        assert_eq!(settings.algorithm_parameter, AlgorithmParameter::Hs2019);
        assert!(!settings.enable_nonce);
    }

    #[test]
    fn invalid_signing_settings() {
        let mut config: SigningConfiguration = toml::from_str(SIGNING).unwrap();
        config.headers.clear();

        assert!(matches!(
            SigningSettings::try_from(config),
            Err(Error::Validation(ValidationError::MissingHeaders))
        ));
    }

    #[test]
    fn verification_options() {
        let config: VerificationConfiguration = toml::from_str(VERIFICATION).unwrap();
        let options = config.options();

        assert_eq!(options.authorization_scheme, "Signature");
        assert_eq!(options.clock_skew, Duration::from_secs(60));
        assert_eq!(options.nonce_lifetime, Duration::from_secs(300));
        assert_eq!(config.client_cache_ttl(), Duration::ZERO);
    }

    #[test]
    fn clients() {
        let config: VerificationConfiguration = toml::from_str(VERIFICATION).unwrap();
        let clients = config.clients(&SignatureAlgorithmRegistry::default()).unwrap();

        assert_eq!(clients.len(), 1);
        let client = &clients[0];
        assert_eq!(client.key_id.as_str(), "client1");
        assert_eq!(client.algorithm.identifier(), "hmac-sha256");
        assert_eq!(client.clock_skew, Some(Duration::from_secs(10)));
        assert_eq!(client.nonce_lifetime, None);
        assert_eq!(client.claims[0].value, "admin");
    }

    #[test]
    fn client_without_key_material() {
        let mut config: VerificationConfiguration = toml::from_str(VERIFICATION).unwrap();
        config.clients[0].secret = None;

        assert!(matches!(
            config.clients(&SignatureAlgorithmRegistry::default()),
            Err(Error::InvalidArgument(..))
        ));
    }
}
