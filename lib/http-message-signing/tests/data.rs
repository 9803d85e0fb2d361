#![allow(dead_code)]

use http::{HeaderValue, Method};
use http_message_signing::{
    algorithm::{
        EcdsaSignatureAlgorithm, HashAlgorithm, HmacSignatureAlgorithm, RsaSignatureAlgorithm,
        SignatureAlgorithm, SignatureAlgorithmKind,
    },
    ring::{
        rand::SystemRandom,
        signature::{EcdsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING},
    },
    signing::{RequestSigner, SigningSettings},
    verification::{
        Client, InMemoryClientStore, InMemoryNonceStore, RequestSignatureVerifier,
        VerificationOptions,
    },
    Clock, HeaderName, HttpRequestForSigning, MockHandle,
};
use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

pub const RSA_PRIVATE_KEY: &str = include_str!("data/rsa_private_key.pem");

pub const HMAC_SECRET: &str = "s3cr3t";

/// 2020-02-24T11:20:14Z
pub const TIME_OF_SIGNING: u64 = 1_582_543_214;

/// `SHA-256` digest of an empty body
pub const EMPTY_BODY_DIGEST: &str = "SHA-256=47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=";

pub fn time_of_signing() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(TIME_OF_SIGNING)
}

pub fn clock() -> (Clock, MockHandle) {
    Clock::frozen(time_of_signing())
}

pub fn post_request() -> HttpRequestForSigning {
    HttpRequestForSigning::new(
        Method::POST,
        "http://example.test/api/resource/1".parse().unwrap(),
    )
    .with_body("")
}

pub fn get_request() -> HttpRequestForSigning {
    let mut request = HttpRequestForSigning::new(
        Method::GET,
        "http://example.test/api/resource/1?expand=true".parse().unwrap(),
    );
    request
        .headers
        .insert("host", HeaderValue::from_static("example.test"));
    request
        .headers
        .insert("x-app-id", HeaderValue::from_static("app-1"));
    request
}

pub fn default_headers() -> Vec<HeaderName> {
    vec![HeaderName::REQUEST_TARGET, HeaderName::DATE, HeaderName::DIGEST]
}

pub fn hmac_settings() -> SigningSettings {
    SigningSettings::builder()
        .key_id("client1")
        .secret(HMAC_SECRET)
        .algorithm(SignatureAlgorithmKind::Hmac)
        .headers(default_headers())
        .build()
}

pub fn hmac_client() -> Client {
    let algorithm = HmacSignatureAlgorithm::new(HashAlgorithm::Sha256, HMAC_SECRET.as_bytes()).unwrap();
    client("client1", Arc::new(algorithm))
}

pub fn rsa_settings() -> SigningSettings {
    SigningSettings::builder()
        .key_id("rsa-client")
        .secret(RSA_PRIVATE_KEY)
        .algorithm(SignatureAlgorithmKind::Rsa)
        .hash_algorithm(HashAlgorithm::Sha512)
        .headers(default_headers())
        .build()
}

pub fn rsa_client() -> Client {
    let private_key =
        RsaSignatureAlgorithm::from_private_key_pem(HashAlgorithm::Sha512, RSA_PRIVATE_KEY)
            .unwrap();
    let algorithm =
        RsaSignatureAlgorithm::from_public_key_der(HashAlgorithm::Sha512, private_key.public_key());
    client("rsa-client", Arc::new(algorithm))
}

/// Fresh P-256 key, returned as signing settings and the matching verification-only client
pub fn ecdsa_pair() -> (SigningSettings, Client) {
    let pkcs8 =
        EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, &SystemRandom::new())
            .unwrap();

    let private_key =
        EcdsaSignatureAlgorithm::from_pkcs8(HashAlgorithm::Sha256, pkcs8.as_ref()).unwrap();
    let algorithm =
        EcdsaSignatureAlgorithm::from_public_key_bytes(HashAlgorithm::Sha256, private_key.public_key())
            .unwrap();

    let settings = SigningSettings::builder()
        .key_id("ecdsa-client")
        .secret(pkcs8.as_ref().to_vec())
        .algorithm(SignatureAlgorithmKind::Ecdsa)
        .headers(default_headers())
        .build();

    (settings, client("ecdsa-client", Arc::new(algorithm)))
}

pub fn client(key_id: &str, algorithm: Arc<dyn SignatureAlgorithm>) -> Client {
    Client::builder()
        .key_id(key_id)
        .name("Integration test app")
        .algorithm(algorithm)
        .build()
}

pub fn signer(settings: SigningSettings, clock: &Clock) -> RequestSigner {
    RequestSigner::new(settings).with_clock(clock.clone())
}

pub fn verifier(
    clients: impl IntoIterator<Item = Client>,
    clock: &Clock,
) -> RequestSignatureVerifier<InMemoryClientStore> {
    let store = InMemoryClientStore::with_clients(clients).unwrap();
    RequestSignatureVerifier::new(store, InMemoryNonceStore::default(), VerificationOptions::default())
        .with_clock(clock.clone())
}
