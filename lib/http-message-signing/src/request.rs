use bytes::Bytes;
use http::{request::Parts, HeaderMap, HeaderValue, Method, Request, Uri};

/// Transport-agnostic view of an HTTP request
///
/// Header lookup is case-insensitive and multiple values of one header keep their insertion order.
/// Only the request signer mutates it (to inject missing mandatory headers).
#[derive(Clone, Debug)]
pub struct HttpRequestForSigning {
    /// HTTP method
    pub method: Method,

    /// Request URI, ideally absolute
    pub uri: Uri,

    /// Request headers
    pub headers: HeaderMap,

    /// Raw body bytes, if the adapter buffered them
    pub body: Option<Bytes>,
}

impl HttpRequestForSigning {
    /// Construct a new request without headers or body
    #[must_use]
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attach a body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Build the view from request parts and an optionally buffered body
    #[must_use]
    pub fn from_parts(parts: &Parts, body: Option<Bytes>) -> Self {
        Self {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            body,
        }
    }

    /// Build the view from an `http` request, copying its body
    ///
    /// Empty bodies of `GET` and `HEAD` requests are treated as absent
    pub fn from_request<B>(request: &Request<B>) -> Self
    where
        B: AsRef<[u8]>,
    {
        let method = request.method();
        let body = request.body().as_ref();
        let bodyless = body.is_empty() && matches!(*method, Method::GET | Method::HEAD);

        Self {
            method: method.clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
            body: (!bodyless).then(|| Bytes::copy_from_slice(body)),
        }
    }

    /// Whether the request carries the header
    ///
    /// Names that aren't valid HTTP header names are never present
    #[must_use]
    pub fn contains_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    /// All values of a header, in insertion order
    ///
    /// Values that aren't valid UTF-8 are converted lossily
    pub fn header_values<'a>(&'a self, name: &str) -> impl Iterator<Item = String> + 'a {
        self.headers
            .get_all(name)
            .into_iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
    }

    /// First value of a header
    #[must_use]
    pub fn first_header_value(&self, name: &str) -> Option<String> {
        self.header_values(name).next()
    }

    /// Copy every header of this request over to another header map, replacing existing values
    ///
    /// Used to transfer the headers injected during signing back onto the transport's request
    pub fn apply_headers(&self, target: &mut HeaderMap) {
        for name in self.headers.keys() {
            let values: Vec<HeaderValue> = self.headers.get_all(name).iter().cloned().collect();
            target.remove(name);
            for value in values {
                target.append(name.clone(), value);
            }
        }
    }
}
