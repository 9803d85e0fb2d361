use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};
use thiserror::Error;

/// Name of an HTTP header or a pseudo-header
///
/// Equality and hashing are case-insensitive
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct HeaderName(Cow<'static, str>);

impl HeaderName {
    /// `(request-target)` pseudo-header
    pub const REQUEST_TARGET: Self = Self::from_static("(request-target)");

    /// `(created)` pseudo-header
    pub const CREATED: Self = Self::from_static("(created)");

    /// `(expires)` pseudo-header
    pub const EXPIRES: Self = Self::from_static("(expires)");

    /// `Date` header
    pub const DATE: Self = Self::from_static("date");

    /// `Digest` header
    pub const DIGEST: Self = Self::from_static("digest");

    /// `Host` header
    pub const HOST: Self = Self::from_static("host");

    /// Construct a header name from a static string
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Construct a new header name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Name as it was provided
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Whether this is one of the parenthesised pseudo-headers
    #[must_use]
    pub fn is_pseudo_header(&self) -> bool {
        self.0.starts_with('(') && self.0.ends_with(')')
    }

    /// Lowercased name, as it appears in signing strings and the `headers` parameter
    #[must_use]
    pub fn to_lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for HeaderName {}

impl Hash for HeaderName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
        state.write_u8(0xff);
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HeaderName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for HeaderName {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&http::HeaderName> for HeaderName {
    fn from(value: &http::HeaderName) -> Self {
        Self::new(value.as_str())
    }
}

/// Malformed string representation of a header
#[derive(Debug, Error)]
#[error("'{0}' is not a valid string representation of a header")]
pub struct ParseHeaderError(String);

/// A single header with one or more values
///
/// Values are trimmed and empty values are dropped upon construction.
/// Two headers are equal if their names are equal.
#[derive(Clone, Debug)]
pub struct Header {
    name: HeaderName,
    values: Vec<String>,
}

impl Header {
    /// Construct a new header
    pub fn new<N, I, V>(name: N, values: I) -> Self
    where
        N: Into<HeaderName>,
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let values = values
            .into_iter()
            .map(|value| value.as_ref().trim().to_string())
            .filter(|value| !value.is_empty())
            .collect();

        Self {
            name: name.into(),
            values,
        }
    }

    /// Name of the header
    #[must_use]
    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    /// Values in their original order
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Header {}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.name.to_lowercase(),
            self.values.iter().join(", ")
        )
    }
}

impl FromStr for Header {
    type Err = ParseHeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut split = s.split(": ");
        let (Some(name), Some(values), None) = (split.next(), split.next(), split.next()) else {
            return Err(ParseHeaderError(s.to_string()));
        };

        if name.trim().is_empty() {
            return Err(ParseHeaderError(s.to_string()));
        }

        Ok(Self::new(name, values.split(", ")))
    }
}

#[cfg(test)]
mod test {
    use super::{Header, HeaderName};
    use std::collections::HashSet;

    #[test]
    fn names_compare_case_insensitive() {
        assert_eq!(HeaderName::from("Digest"), HeaderName::DIGEST);
        assert_eq!(HeaderName::from("(Request-Target)"), HeaderName::REQUEST_TARGET);
        assert_ne!(HeaderName::from("x-app-id"), HeaderName::from("x_app_id"));

        let set: HashSet<_> = [HeaderName::from("DATE"), HeaderName::DATE].into();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn pseudo_headers() {
        assert!(HeaderName::CREATED.is_pseudo_header());
        assert!(HeaderName::REQUEST_TARGET.is_pseudo_header());
        assert!(!HeaderName::DATE.is_pseudo_header());
    }

    #[test]
    fn values_are_trimmed_and_empty_ones_dropped() {
        let header = Header::new("Accept", [" text/html ", "", "  ", "application/json"]);
        assert_eq!(header.values(), ["text/html", "application/json"]);
        assert_eq!(header.to_string(), "accept: text/html, application/json");
    }

    #[test]
    fn equality_only_compares_names() {
        assert_eq!(Header::new("A", ["1"]), Header::new("a", ["2"]));
    }

    #[test]
    fn parse() {
        let header: Header = "Content-Type: text/plain, charset=utf-8".parse().unwrap();
        assert_eq!(header.name(), &HeaderName::from("content-type"));
        assert_eq!(header.values(), ["text/plain", "charset=utf-8"]);

        assert!("no separator".parse::<Header>().is_err());
        assert!(": value".parse::<Header>().is_err());
        assert!("a: b: c".parse::<Header>().is_err());
    }
}
