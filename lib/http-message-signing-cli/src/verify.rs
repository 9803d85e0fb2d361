use crate::{
    args::VerifyArgs,
    util::{build_request, error_kaomoji, load_config, success_kaomoji},
};
use http_message_signing::{
    algorithm::SignatureAlgorithmRegistry,
    config::VerificationConfiguration,
    verification::{
        CachingClientStore, ClientCache, InMemoryClientStore, InMemoryNonceStore,
        RequestSignatureVerifier, VerificationOutcome,
    },
};
use miette::Result;

pub async fn do_it(args: VerifyArgs) -> Result<()> {
    let config: VerificationConfiguration = load_config(&args.config).await?;
    let clients = config.clients(&SignatureAlgorithmRegistry::default())?;
    let client_store = CachingClientStore::new(
        InMemoryClientStore::with_clients(clients)?,
        ClientCache::default(),
        config.client_cache_ttl(),
    );
    let verifier = RequestSignatureVerifier::new(
        client_store,
        InMemoryNonceStore::default(),
        config.options(),
    );

    let request = build_request(args.request).await?;
    match verifier.verify(&request).await? {
        VerificationOutcome::Success(success) => {
            println!("✅ Signature is valid! {}", success_kaomoji());
            for claim in success.claims {
                println!("{}: {}", claim.name, claim.value);
            }
        }
        VerificationOutcome::Failure(failure) => {
            println!("❌ Signature is invalid {}", error_kaomoji());
            println!("{}", failure.error);
        }
    }

    Ok(())
}
