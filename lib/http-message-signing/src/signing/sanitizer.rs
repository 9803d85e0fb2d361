use super::SigningSettings;
use crate::{policy::HeaderRequirement, HeaderName, HttpRequestForSigning};
use http::Method;
use itertools::Itertools;

/// Adjust the configured header list to what the request can actually provide
///
/// - `(request-target)` leads the list
/// - headers required by the policy are appended, forbidden ones removed
/// - `digest` is appended for methods other than `GET` and `HEAD` if a digest algorithm is configured,
///   and removed if the request has neither a body nor a `Digest` header
/// - other headers missing from the request are dropped
pub fn sanitize(
    settings: &mut SigningSettings,
    request: &HttpRequestForSigning,
    requirement: &HeaderRequirement,
) {
    let mut headers: Vec<HeaderName> = settings.headers.drain(..).unique().collect();

    if !headers.contains(&HeaderName::REQUEST_TARGET) {
        headers.insert(0, HeaderName::REQUEST_TARGET);
    }

    for required in &requirement.required {
        if !headers.contains(required) {
            headers.push(required.clone());
        }
    }

    headers.retain(|name| !requirement.forbidden.contains(name));

    let signs_body = request.method != Method::GET && request.method != Method::HEAD;
    if settings.digest_algorithm.is_some() && signs_body && !headers.contains(&HeaderName::DIGEST)
    {
        headers.push(HeaderName::DIGEST);
    }

    let has_digest =
        request.body.is_some() || request.contains_header(HeaderName::DIGEST.as_str());

    headers.retain(|name| {
        if *name == HeaderName::DIGEST {
            return has_digest;
        }

        name.is_pseudo_header() || *name == HeaderName::DATE || request.contains_header(name.as_str())
    });

    settings.headers = headers;
}

#[cfg(test)]
mod test {
    use super::sanitize;
    use crate::{
        algorithm::SignatureAlgorithmKind, digest::DigestAlgorithm,
        policy::MandatoryHeaderPolicy, signing::SigningSettings, HeaderName,
        HttpRequestForSigning,
    };
    use http::{HeaderValue, Method};

    fn settings(headers: Vec<HeaderName>) -> SigningSettings {
        SigningSettings::builder()
            .key_id("client1")
            .secret("s3cr3t")
            .algorithm(SignatureAlgorithmKind::Hmac)
            .headers(headers)
            .build()
    }

    #[test]
    fn legacy_policy() {
        let policy = MandatoryHeaderPolicy::default();
        let mut request = HttpRequestForSigning::new(Method::GET, "/".parse().unwrap());
        request
            .headers
            .insert("host", HeaderValue::from_static("example.test"));

        let mut settings = settings(vec![
            HeaderName::HOST,
            HeaderName::CREATED,
            "x-missing".into(),
            "Host".into(),
        ]);
        sanitize(
            &mut settings,
            &request,
            policy.requirement("hmac").unwrap(),
        );

        assert_eq!(
            settings.headers,
            [HeaderName::REQUEST_TARGET, HeaderName::HOST, HeaderName::DATE]
        );
    }

    #[test]
    fn hs2019_policy() {
        let policy = MandatoryHeaderPolicy::default();
        let request = HttpRequestForSigning::new(Method::GET, "/".parse().unwrap());

        let mut settings = settings(vec![HeaderName::REQUEST_TARGET]);
        sanitize(
            &mut settings,
            &request,
            policy.requirement("hs2019").unwrap(),
        );

        assert_eq!(
            settings.headers,
            [
                HeaderName::REQUEST_TARGET,
                HeaderName::CREATED,
                HeaderName::EXPIRES
            ]
        );
    }

    #[test]
    fn digest_handling() {
        let policy = MandatoryHeaderPolicy::default();
        let requirement = policy.requirement("hmac").unwrap();

        let mut settings = settings(vec![HeaderName::REQUEST_TARGET]);
        settings.digest_algorithm = Some(DigestAlgorithm::Sha256);

        let request =
            HttpRequestForSigning::new(Method::POST, "/".parse().unwrap()).with_body("{}");
        let mut with_body = settings.clone();
        sanitize(&mut with_body, &request, requirement);
        assert!(with_body.headers.contains(&HeaderName::DIGEST));

        let request = HttpRequestForSigning::new(Method::POST, "/".parse().unwrap());
        let mut without_body = settings.clone();
        sanitize(&mut without_body, &request, requirement);
        assert!(!without_body.headers.contains(&HeaderName::DIGEST));

        let request =
            HttpRequestForSigning::new(Method::GET, "/".parse().unwrap()).with_body("{}");
        let mut get = settings;
        sanitize(&mut get, &request, requirement);
        assert!(!get.headers.contains(&HeaderName::DIGEST));
    }
}
