use crate::{util::unix_seconds, Header, HeaderName, HttpRequestForSigning};
use itertools::Itertools;
use percent_encoding::percent_decode_str;
use std::time::{Duration, SystemTime};

/// Inputs shared by all appenders of one composition
pub struct AppendContext<'a> {
    pub request: &'a HttpRequestForSigning,
    pub time_of_signing: SystemTime,
    pub expires: Duration,
}

/// Strategy rendering a single line of the signing string
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderAppender {
    RequestTarget,
    Created,
    Expires,
    Date,
    Default,
}

impl HeaderAppender {
    pub fn for_header(name: &HeaderName) -> Self {
        if *name == HeaderName::REQUEST_TARGET {
            Self::RequestTarget
        } else if *name == HeaderName::CREATED {
            Self::Created
        } else if *name == HeaderName::EXPIRES {
            Self::Expires
        } else if *name == HeaderName::DATE {
            Self::Date
        } else {
            Self::Default
        }
    }

    /// Render the line, `None` if the header doesn't contribute
    pub fn build(self, name: &HeaderName, context: &AppendContext<'_>) -> Option<String> {
        let value = match self {
            Self::RequestTarget => request_target(context.request),
            Self::Created => unix_seconds(context.time_of_signing).to_string(),
            Self::Expires => unix_seconds(context.time_of_signing)
                .saturating_add(context.expires.as_secs())
                .to_string(),
            Self::Date => context.request.first_header_value(HeaderName::DATE.as_str())?,
            Self::Default => {
                if !context.request.contains_header(name.as_str()) {
                    return None;
                }

                let values = context
                    .request
                    .header_values(name.as_str())
                    .map(|value| sanitize_value(&value));

                return Some(Header::new(name.clone(), values).to_string());
            }
        };

        Some(format!("{}: {value}", name.to_lowercase()))
    }
}

fn request_target(request: &HttpRequestForSigning) -> String {
    let method = request.method.as_str().to_lowercase();
    let path_and_query = request
        .uri
        .path_and_query()
        .map_or("/", |path_and_query| path_and_query.as_str());
    let path_and_query = percent_decode_str(path_and_query).decode_utf8_lossy();

    format!("{method} {path_and_query}")
}

/// Remove line breaks and fold whitespace runs into single spaces
pub fn sanitize_value(value: &str) -> String {
    value.split_whitespace().join(" ")
}

#[cfg(test)]
mod test {
    use super::{sanitize_value, AppendContext, HeaderAppender};
    use crate::{HeaderName, HttpRequestForSigning};
    use http::{HeaderValue, Method};
    use std::time::{Duration, SystemTime};

    fn context(request: &HttpRequestForSigning) -> AppendContext<'_> {
        AppendContext {
            request,
            time_of_signing: SystemTime::UNIX_EPOCH + Duration::from_secs(1_582_543_214),
            expires: Duration::from_secs(300),
        }
    }

    #[test]
    fn request_target_is_decoded() {
        let request = HttpRequestForSigning::new(
            Method::GET,
            "http://example.test/api/%7Buser%7D?filter=a%20b".parse().unwrap(),
        );
        let line = HeaderAppender::RequestTarget
            .build(&HeaderName::REQUEST_TARGET, &context(&request))
            .unwrap();

        assert_eq!(line, "(request-target): get /api/{user}?filter=a b");
    }

    #[test]
    fn timestamps() {
        let request = HttpRequestForSigning::new(Method::GET, "/".parse().unwrap());
        let context = context(&request);

        assert_eq!(
            HeaderAppender::Created.build(&HeaderName::CREATED, &context),
            Some("(created): 1582543214".into())
        );
        assert_eq!(
            HeaderAppender::Expires.build(&HeaderName::EXPIRES, &context),
            Some("(expires): 1582543514".into())
        );
    }

    #[test]
    fn expires_saturates() {
        let request = HttpRequestForSigning::new(Method::GET, "/".parse().unwrap());
        let context = AppendContext {
            expires: Duration::MAX,
            ..context(&request)
        };

        assert_eq!(
            HeaderAppender::Expires.build(&HeaderName::EXPIRES, &context),
            Some(format!("(expires): {}", u64::MAX))
        );
    }

    #[test]
    fn absent_headers_contribute_nothing() {
        let request = HttpRequestForSigning::new(Method::GET, "/".parse().unwrap());
        let context = context(&request);

        assert_eq!(HeaderAppender::Date.build(&HeaderName::DATE, &context), None);
        assert_eq!(
            HeaderAppender::Default.build(&"x-custom".into(), &context),
            None
        );
    }

    #[test]
    fn multiple_values_are_joined() {
        let mut request = HttpRequestForSigning::new(Method::GET, "/".parse().unwrap());
        request
            .headers
            .append("x-custom", HeaderValue::from_static("one"));
        request
            .headers
            .append("x-custom", HeaderValue::from_static("  two\t and   three "));

        let line = HeaderAppender::for_header(&"X-Custom".into())
            .build(&"X-Custom".into(), &context(&request))
            .unwrap();
        assert_eq!(line, "x-custom: one, two and three");
    }

    #[test]
    fn folding() {
        assert_eq!(sanitize_value("a\n b\r\n\tc"), "a b c");
        assert_eq!(sanitize_value("   "), "");
    }
}
