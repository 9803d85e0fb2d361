use crate::{digest::DigestAlgorithm, HeaderName, HttpRequestForSigning, Result};
use http::{header, HeaderValue};
use std::time::SystemTime;

/// Inject the `Date` and `Digest` headers if they are signed but missing from the request
///
/// The digest is only injected if the request carries a body
pub fn ensure_headers(
    request: &mut HttpRequestForSigning,
    headers: &[HeaderName],
    time_of_signing: SystemTime,
    digest_algorithm: DigestAlgorithm,
) -> Result<()> {
    if headers.contains(&HeaderName::DATE) && !request.headers.contains_key(header::DATE) {
        let date = httpdate::fmt_http_date(time_of_signing);
        request
            .headers
            .insert(header::DATE, HeaderValue::from_str(&date)?);
    }

    if headers.contains(&HeaderName::DIGEST) && !request.contains_header(HeaderName::DIGEST.as_str())
    {
        if let Some(ref body) = request.body {
            let digest = digest_algorithm.header_value(body);
            request.headers.insert(
                http::HeaderName::from_static("digest"),
                HeaderValue::from_str(&digest)?,
            );
        }
    }

    Ok(())
}
