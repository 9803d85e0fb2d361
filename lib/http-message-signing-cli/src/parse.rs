use crate::util::{error_kaomoji, success_kaomoji};
use http_message_signing::{authorization, unix_seconds};
use itertools::Itertools;

pub fn do_it(parameters: &str) -> miette::Result<()> {
    let signature = match authorization::parse(parameters) {
        Ok(signature) => signature,
        Err(error) => {
            eprintln!("Parameters are invalid {}", error_kaomoji());
            return Err(error.into());
        }
    };

    println!("✅ Parameters are valid! {}", success_kaomoji());
    println!("key id:    {}", signature.key_id);
    if let Some(ref algorithm) = signature.algorithm {
        println!("algorithm: {algorithm}");
    }
    if let Some(created) = signature.created {
        println!("created:   {}", unix_seconds(created));
    }
    if let Some(expires) = signature.expires {
        println!("expires:   {}", unix_seconds(expires));
    }
    println!("headers:   {}", signature.headers.iter().join(" "));
    if let Some(ref nonce) = signature.nonce {
        println!("nonce:     {nonce}");
    }

    Ok(())
}
