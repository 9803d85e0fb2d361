use crate::{util::UnixTimestampExt, HeaderName, KeyId, Signature};
use logos::{Lexer, Logos, Span};
use miette::{Diagnostic, SourceSpan};
use std::{collections::HashSet, time::SystemTime};
use thiserror::Error;

#[derive(Debug, Logos, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
enum TokenTy {
    #[regex(r"[a-zA-Z][a-zA-Z0-9]*")]
    Key,

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#)]
    Value,

    #[regex(r"[0-9]+")]
    Number,

    #[token(",")]
    Comma,
}

#[derive(Debug)]
struct Token {
    pub ty: TokenTy,
    pub span: Span,
}

impl Token {
    pub fn parse(input: &str) -> impl Iterator<Item = (Result<Token, ()>, Span)> + '_ {
        Lexer::<'_, TokenTy>::new(input)
            .spanned()
            .map(|(ty, span)| (ty.map(|ty| Token { ty, span: span.clone() }), span))
    }
}

/// Reason the parameter string was rejected
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Parameter was specified twice
    #[error("duplicate parameter")]
    DuplicateParameter,

    /// Timestamp isn't a whole number of seconds
    #[error("invalid timestamp")]
    InvalidTimestamp,

    /// Mandatory parameter is missing
    #[error("missing parameter `{0}`")]
    MissingParameter(&'static str),

    /// Token at this position isn't allowed
    #[error("unexpected token")]
    UnexpectedToken,
}

/// Malformed authorization parameter string
#[derive(Debug, Diagnostic, Error)]
#[error("Malformed signature parameters: {kind}")]
#[diagnostic(code(http_message_signing::authorization::parse))]
pub struct ParseError {
    /// Reason of the failure
    pub kind: ParseErrorKind,

    #[source_code]
    input: String,

    #[label("{kind}")]
    span: SourceSpan,
}

impl ParseError {
    fn new(kind: ParseErrorKind, input: &str, span: Span) -> Self {
        Self {
            kind,
            input: input.to_string(),
            span: span.into(),
        }
    }
}

macro_rules! ensure {
    ($self:expr, $value:expr, $pattern:pat) => {{
        let (token, span) = $value;
        let Ok(token) = token else {
            $self.is_broken = true;
            return Some(Err(span));
        };

        if !matches!(token.ty, $pattern) {
            $self.is_broken = true;
            return Some(Err(span));
        }

        token
    }};
}

struct ParseIter<'a, I> {
    /// Stream of tokens wrapped into a result
    inner: I,

    /// Reference to the original input that was fed to the lexer
    input: &'a str,

    /// Marker whether we encountered any error or illegal token
    ///
    /// If we did, the iterator will stop yielding any results
    is_broken: bool,
}

impl<'a, I> ParseIter<'a, I>
where
    I: Iterator<Item = (Result<Token, ()>, Span)>,
{
    fn next_or_end(&mut self) -> (Result<Token, ()>, Span) {
        let end = self.input.len();
        self.inner.next().unwrap_or((Err(()), end..end))
    }
}

impl<'a, I> Iterator for ParseIter<'a, I>
where
    I: Iterator<Item = (Result<Token, ()>, Span)>,
{
    /// Key span, value span
    type Item = Result<(Span, Span), Span>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_broken {
            return None;
        }

        let key = ensure!(self, self.inner.next()?, TokenTy::Key);
        ensure!(self, self.next_or_end(), TokenTy::Equals);
        let value = ensure!(self, self.next_or_end(), TokenTy::Value | TokenTy::Number);

        if let Some(next) = self.inner.next() {
            ensure!(self, next, TokenTy::Comma);
        }

        Some(Ok((key.span, value.span)))
    }
}

fn timestamp(value: &str) -> Option<SystemTime> {
    value
        .parse::<u64>()
        .ok()
        .and_then(SystemTime::checked_from_unix_timestamp)
}

/// Parse an authorization parameter string into a signature
///
/// Values may be quoted or bare and whitespace between the tokens is ignored.
/// Unknown parameters are skipped.
pub fn parse(input: &str) -> Result<Signature, ParseError> {
    let kv_iter = ParseIter {
        inner: Token::parse(input),
        input,
        is_broken: false,
    };

    let mut seen = HashSet::new();
    let mut key_id = None;
    let mut signature = None;
    let mut algorithm = None;
    let mut headers = None;
    let mut created = None;
    let mut expires = None;
    let mut nonce = None;

    for kv in kv_iter {
        let (key_span, value_span) =
            kv.map_err(|span| ParseError::new(ParseErrorKind::UnexpectedToken, input, span))?;

        let key = &input[key_span.clone()];
        let value = input[value_span.clone()].trim_matches('"');

        if !seen.insert(key) {
            return Err(ParseError::new(
                ParseErrorKind::DuplicateParameter,
                input,
                key_span,
            ));
        }

        let invalid_timestamp =
            || ParseError::new(ParseErrorKind::InvalidTimestamp, input, value_span.clone());

        match key {
            "keyId" => key_id = Some(value),
            "signature" => signature = Some(value),
            "algorithm" => algorithm = Some(value),
            "headers" => headers = Some(value),
            "created" => created = Some(timestamp(value).ok_or_else(invalid_timestamp)?),
            "expires" => expires = Some(timestamp(value).ok_or_else(invalid_timestamp)?),
            "nonce" => nonce = Some(value),
            unknown => debug!(parameter = unknown, "skipping unknown signature parameter"),
        }
    }

    let end = input.len()..input.len();
    let missing = |name| ParseError::new(ParseErrorKind::MissingParameter(name), input, end.clone());

    Ok(Signature {
        key_id: KeyId::from(key_id.ok_or_else(|| missing("keyId"))?),
        algorithm: algorithm
            .filter(|algorithm| !algorithm.is_empty())
            .map(str::to_string),
        created,
        expires,
        headers: headers
            .map(|headers| headers.split_whitespace().map(HeaderName::from).collect())
            .unwrap_or_default(),
        string: signature.ok_or_else(|| missing("signature"))?.to_string(),
        nonce: nonce.filter(|nonce| !nonce.is_empty()).map(str::to_string),
    })
}

#[cfg(test)]
mod test {
    use super::{parse, ParseErrorKind};
    use crate::{util::UnixTimestampExt, HeaderName};
    use std::time::SystemTime;

    const HEADER: &str = r#"keyId="Test",algorithm="rsa-sha256",headers="(request-target) host date",signature="qdx+H7PHHDZgy4y/Ahn9Tny9V3GP6YgBPyUXMmoxWtLbHpUnXS2mg2+SbrQDMCJypxBLSPQR2aAjn7ndmw2iicw3HMbe8VfEdKFYRqzic+efkb3nndiv/x1xSHDJWeSWkx3ButlYSuBskLu6kd9Fswtemr3lgdDEmn04swr2Os0=""#;

    #[test]
    fn parse_header() {
        let signature = parse(HEADER).unwrap();

        assert_eq!(signature.created, None);
        assert_eq!(signature.expires, None);
        assert_eq!(signature.key_id.as_str(), "Test");
        assert_eq!(signature.algorithm.as_deref(), Some("rsa-sha256"));
        assert!(signature.string.starts_with("qdx+H7PHHDZgy4y"));
        assert_eq!(
            signature.headers,
            [
                HeaderName::REQUEST_TARGET,
                HeaderName::HOST,
                HeaderName::DATE
            ]
        );
    }

    #[test]
    fn bare_timestamps_and_whitespace() {
        let signature = parse(
            r#"keyId="app", created=1402170695, expires="1402170699", nonce="abc", signature="c2ln""#,
        )
        .unwrap();

        assert_eq!(
            signature.created,
            Some(SystemTime::from_unix_timestamp(1_402_170_695))
        );
        assert_eq!(
            signature.expires,
            Some(SystemTime::from_unix_timestamp(1_402_170_699))
        );
        assert_eq!(signature.nonce.as_deref(), Some("abc"));
        assert!(signature.headers.is_empty());
        assert_eq!(signature.algorithm, None);
    }

    #[test]
    fn unknown_parameters_are_skipped() {
        let signature = parse(r#"keyId="app",foo="bar",signature="c2ln""#).unwrap();
        assert_eq!(signature.string, "c2ln");
    }

    #[test]
    fn rejects_malformed_input() {
        let error = parse(r#"keyId="app",signature"#).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnexpectedToken);

        let error = parse(r#"keyId="app" signature="c2ln""#).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::UnexpectedToken);

        let error = parse(r#"keyId="app",created="soon",signature="c2ln""#).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::InvalidTimestamp);

        let error = parse(r#"keyId="a",keyId="b",signature="c2ln""#).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::DuplicateParameter);

        let error = parse(r#"keyId="app""#).unwrap_err();
        assert_eq!(error.kind, ParseErrorKind::MissingParameter("signature"));
    }

    #[test]
    fn rejects_unrepresentable_timestamps() {
        for input in [
            r#"keyId="client1",created=18446744073709551615,signature="c2ln""#,
            r#"keyId="client1",expires="18446744073709551615",signature="c2ln""#,
            r#"keyId="client1",created=18446744073709551616,signature="c2ln""#,
        ] {
            let error = parse(input).unwrap_err();
            assert_eq!(error.kind, ParseErrorKind::InvalidTimestamp);
        }
    }
}
