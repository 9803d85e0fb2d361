use crate::args::RequestArgs;
use http_message_signing::{Header, HttpRequestForSigning};
use miette::{IntoDiagnostic, Result};
use owo_colors::{OwoColorize, Stream};
use serde::de::DeserializeOwned;
use std::{fmt::Display, path::Path};
use tokio::fs;

#[inline]
pub fn error_kaomoji() -> impl Display {
    "(┬┬﹏┬┬)".if_supports_color(Stream::Stdout, |text| text.red())
}

#[inline]
pub fn success_kaomoji() -> impl Display {
    "(^///^)".if_supports_color(Stream::Stdout, |text| text.green())
}

pub async fn load_config<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let content = fs::read_to_string(path).await.into_diagnostic()?;
    toml::from_str(&content).into_diagnostic()
}

pub async fn build_request(args: RequestArgs) -> Result<HttpRequestForSigning> {
    let method = args.method.parse().into_diagnostic()?;
    let uri = args.url.parse().into_diagnostic()?;
    let mut request = HttpRequestForSigning::new(method, uri);

    for header in args.headers {
        let header: Header = header.parse().into_diagnostic()?;
        let name = http::HeaderName::try_from(header.name().as_str()).into_diagnostic()?;
        for value in header.values() {
            let value = http::HeaderValue::from_str(value).into_diagnostic()?;
            request.headers.append(name.clone(), value);
        }
    }

    if let Some(path) = args.body {
        let body = fs::read(path).await.into_diagnostic()?;
        request = request.with_body(body);
    }

    Ok(request)
}

