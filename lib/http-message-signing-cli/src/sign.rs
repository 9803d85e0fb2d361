use crate::{
    args::SignArgs,
    util::{build_request, load_config, success_kaomoji},
};
use http_message_signing::{
    config::SigningConfiguration,
    signing::{RequestSigner, SigningSettings},
};
use miette::Result;

pub async fn do_it(args: SignArgs) -> Result<()> {
    let config: SigningConfiguration = load_config(&args.config).await?;
    let settings = SigningSettings::try_from(config)?;
    let signer = RequestSigner::new(settings);

    let mut request = build_request(args.request).await?;
    let before = request.headers.clone();
    let signature = signer.sign(&mut request).await?;

    println!("✅ Request signed! {}", success_kaomoji());
    for (name, value) in &request.headers {
        if before.get(name) == Some(value) {
            continue;
        }

        println!("{name}: {}", String::from_utf8_lossy(value.as_bytes()));
    }
    debug!(?signature, "created signature");

    Ok(())
}
