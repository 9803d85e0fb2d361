//!
//! Canonical signing string composition
//!
//! The same composition runs on the sending and the receiving side. Headers are processed in
//! the given order, each line rendered as `lower(name): value`, joined with `\n`.
//!

use self::appender::{AppendContext, HeaderAppender};
use crate::{Header, HeaderName, HttpRequestForSigning};
use std::time::{Duration, SystemTime};

mod appender;

/// Name of the line carrying the nonce
pub const NONCE_LINE: &str = "nonce";

/// Compose the canonical signing string
///
/// - `(request-target)` renders the lowercased method and the decoded path and query
/// - `(created)` renders `time_of_signing` in unix seconds
/// - `(expires)` renders `time_of_signing + expires` in unix seconds
/// - every other header renders its values from the request, joined with `", "`
///
/// Headers absent from the request contribute nothing. The nonce, if any, is appended as the final line.
#[must_use]
pub fn compose(
    request: &HttpRequestForSigning,
    headers: &[HeaderName],
    time_of_signing: SystemTime,
    expires: Duration,
    nonce: Option<&str>,
) -> String {
    let context = AppendContext {
        request,
        time_of_signing,
        expires,
    };

    let mut lines: Vec<String> = headers
        .iter()
        .filter_map(|name| HeaderAppender::for_header(name).build(name, &context))
        .collect();

    if let Some(nonce) = nonce.filter(|nonce| !nonce.is_empty()) {
        lines.push(Header::new(NONCE_LINE, [nonce]).to_string());
    }

    lines.join("\n")
}

#[cfg(test)]
mod test {
    use super::compose;
    use crate::{HeaderName, HttpRequestForSigning};
    use http::{HeaderValue, Method};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::time::{Duration, SystemTime};

    const TIME_OF_SIGNING: u64 = 1_582_543_214;

    fn request() -> HttpRequestForSigning {
        let mut request = HttpRequestForSigning::new(
            Method::POST,
            "http://example.test/api/resource/1?x=y".parse().unwrap(),
        );
        request.headers.insert(
            "date",
            HeaderValue::from_static("Mon, 24 Feb 2020 11:20:14 GMT"),
        );
        request
            .headers
            .insert("host", HeaderValue::from_static("example.test"));
        request
    }

    fn time_of_signing() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(TIME_OF_SIGNING)
    }

    #[test]
    fn composes_in_given_order() {
        let headers = [
            HeaderName::REQUEST_TARGET,
            HeaderName::HOST,
            HeaderName::CREATED,
            HeaderName::EXPIRES,
            HeaderName::DATE,
        ];
        let signing_string = compose(
            &request(),
            &headers,
            time_of_signing(),
            Duration::from_secs(300),
            None,
        );

        assert_eq!(
            signing_string,
            "(request-target): post /api/resource/1?x=y\n\
             host: example.test\n\
             (created): 1582543214\n\
             (expires): 1582543514\n\
             date: Mon, 24 Feb 2020 11:20:14 GMT"
        );
    }

    #[test]
    fn absent_headers_are_skipped() {
        let headers = [
            HeaderName::REQUEST_TARGET,
            HeaderName::from("x-missing"),
            HeaderName::DIGEST,
        ];
        let signing_string = compose(
            &request(),
            &headers,
            time_of_signing(),
            Duration::ZERO,
            None,
        );

        assert_eq!(signing_string, "(request-target): post /api/resource/1?x=y");
    }

    #[test]
    fn nonce_is_the_final_line() {
        let signing_string = compose(
            &request(),
            &[HeaderName::DATE],
            time_of_signing(),
            Duration::ZERO,
            Some("abc123"),
        );

        assert_eq!(
            signing_string,
            "date: Mon, 24 Feb 2020 11:20:14 GMT\nnonce: abc123"
        );
    }

    #[test]
    fn empty_header_list() {
        let signing_string = compose(
            &request(),
            &[],
            time_of_signing(),
            Duration::ZERO,
            None,
        );
        assert!(signing_string.is_empty());
    }

    proptest! {
        #[test]
        fn deterministic_and_order_preserving(
            names in proptest::collection::vec("x-[a-z]{1,8}", 1..6),
            values in proptest::collection::vec("[a-zA-Z0-9 ]{1,16}", 6),
        ) {
            let mut request = request();
            for (name, value) in names.iter().zip(&values) {
                let value = HeaderValue::from_str(value).unwrap();
                request.headers.append(http::HeaderName::from_bytes(name.as_bytes()).unwrap(), value);
            }
            let headers: Vec<HeaderName> = names.iter().map(|name| name.as_str().into()).collect();

            let first = compose(&request, &headers, time_of_signing(), Duration::ZERO, None);
            let second = compose(&request, &headers, time_of_signing(), Duration::ZERO, None);
            prop_assert_eq!(&first, &second);

            for (line, name) in first.lines().zip(&names) {
                let prefix = format!("{name}: ");
                prop_assert!(line.starts_with(&prefix));
            }
            prop_assert!(!first.starts_with('\n'));
            prop_assert!(!first.ends_with('\n'));
        }
    }
}
