use std::io::BufRead;

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{CR, HT, LF, Lexer, QUOTE, SP, is_ctl_token, is_tspecial_token};

pub const KNOWN_STATUS_CODES: [u16; 32] = [
    100, 101, 200, 201, 203, 204, 205, 206, 300, 301, 302, 303, 304, 305, 400, 401, 402, 403,
    404, 405, 406, 407, 408, 409, 410, 411, 412, 500, 501, 502, 503, 504,
];

pub const KNOWN_METHODS: [&str; 7] = ["GET", "HEAD", "POST", "PUT", "DELETE", "LINK", "UNLINK"];

pub(crate) const HTTP: &[u8] = b"HTTP";

/// A grammar rule that can be read from a [`Lexer`] and written back byte for byte.
pub trait Production: Sized {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError>;

    fn emit(&self, out: &mut Vec<u8>);

    fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.emit(&mut out);
        out
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// `token := 1*<any CHAR except CTLs or tspecials>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(Vec<u8>);

impl Token {
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        Self(text.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Production for Token {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        let offset = lexer.offset();
        let mut text = Vec::new();
        while !lexer.at_eof() && !is_ctl_token(lexer.peek()) && !is_tspecial_token(lexer.peek()) {
            text.extend(lexer.advance()?);
        }

        if text.is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptyProduction, offset));
        }
        Ok(Self(text))
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

/// Interior of a `"`-delimited string, folds included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedString(Vec<u8>);

impl QuotedString {
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        Self(text.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Production for QuotedString {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        lexer.expect(QUOTE)?;

        let mut text = Vec::new();
        while !lexer.at_eof() && !lexer.peek_is(QUOTE) {
            if lexer.peek_is(CR) {
                // only legal as the start of CRLF 1*( SP | HT )
                text.extend(lexer.advance()?);
                if !lexer.peek_is(LF) {
                    return Err(lexer.error(ParseErrorKind::InvalidQdtext));
                }
                text.extend(lexer.advance()?);
                if !lexer.peek_is(SP) && !lexer.peek_is(HT) {
                    return Err(lexer.error(ParseErrorKind::InvalidQdtext));
                }
            } else if is_ctl_token(lexer.peek()) && !lexer.peek_is(HT) {
                return Err(lexer.error(ParseErrorKind::InvalidQdtext));
            }
            text.extend(lexer.advance()?);
        }

        lexer.expect(QUOTE)?;
        Ok(Self(text))
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(QUOTE);
        out.extend_from_slice(&self.0);
        out.extend_from_slice(QUOTE);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Bare(Token),
    Quoted(QuotedString),
}

impl Method {
    pub fn name(&self) -> &[u8] {
        match self {
            Self::Bare(token) => token.as_bytes(),
            Self::Quoted(quoted) => quoted.as_bytes(),
        }
    }

    pub fn is_get(&self) -> bool {
        self.name() == b"GET"
    }

    pub fn is_known(&self) -> bool {
        KNOWN_METHODS
            .iter()
            .any(|known| known.as_bytes() == self.name())
    }
}

impl Production for Method {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        if lexer.peek_is(QUOTE) {
            QuotedString::parse(lexer).map(Self::Quoted)
        } else {
            Token::parse(lexer).map(Self::Bare)
        }
    }

    fn emit(&self, out: &mut Vec<u8>) {
        match self {
            Self::Bare(token) => token.emit(out),
            Self::Quoted(quoted) => quoted.emit(out),
        }
    }
}

/// Opaque target text, read up to the next whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUri(Vec<u8>);

impl RequestUri {
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        Self(text.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Production for RequestUri {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        let offset = lexer.offset();
        let mut text = Vec::new();
        while !lexer.at_eof() && ![SP, HT, CR, LF].contains(&lexer.peek()) {
            text.extend(lexer.advance()?);
        }

        if text.is_empty() {
            return Err(ParseError::new(ParseErrorKind::EmptyProduction, offset));
        }
        Ok(Self(text))
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

/// A digit run together with its value; the text keeps leading zeros intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digits {
    text: Vec<u8>,
    value: u32,
}

impl Digits {
    pub fn new(value: u32) -> Self {
        Self {
            text: value.to_string().into_bytes(),
            value,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }
}

impl Production for Digits {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        let invalid = || ParseErrorKind::InvalidNumber {
            value: lossy(lexer.peek()),
        };
        if lexer.at_eof() || !lexer.peek().iter().all(u8::is_ascii_digit) {
            return Err(lexer.error(invalid()));
        }
        let value = std::str::from_utf8(lexer.peek())
            .ok()
            .and_then(|text| text.parse::<u32>().ok())
            .ok_or_else(|| lexer.error(invalid()))?;

        let text = lexer.advance()?;
        Ok(Self { text, value })
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.text);
    }
}

/// `HTTP-Version := "HTTP" "/" 1*DIGIT "." 1*DIGIT`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpVersion {
    major: Digits,
    minor: Digits,
}

impl HttpVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major: Digits::new(major),
            minor: Digits::new(minor),
        }
    }

    pub fn major(&self) -> u32 {
        self.major.value()
    }

    pub fn minor(&self) -> u32 {
        self.minor.value()
    }
}

impl Production for HttpVersion {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        lexer.expect(HTTP)?;
        lexer.expect(b"/")?;
        let major = Digits::parse(lexer)?;
        lexer.expect(b".")?;
        let minor = Digits::parse(lexer)?;
        Ok(Self { major, minor })
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(HTTP);
        out.push(b'/');
        self.major.emit(out);
        out.push(b'.');
        self.minor.emit(out);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCode(u16);

impl StatusCode {
    pub fn new(value: u16) -> Option<Self> {
        KNOWN_STATUS_CODES.contains(&value).then_some(Self(value))
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl Production for StatusCode {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        let offset = lexer.offset();
        let text = lossy(lexer.peek());
        let digits = Digits::parse(lexer)?;

        let code = u16::try_from(digits.value())
            .ok()
            .filter(|_| digits.as_bytes().len() == 3)
            .and_then(Self::new);
        code.ok_or(ParseError::new(
            ParseErrorKind::InvalidStatusCode { value: text },
            offset,
        ))
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(format!("{:03}", self.0).as_bytes());
    }
}

/// `Reason-Phrase := *<TEXT, excluding CR, LF>`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReasonPhrase(Vec<u8>);

impl ReasonPhrase {
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        Self(text.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Production for ReasonPhrase {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        let mut text = Vec::new();
        while !lexer.at_eof() && !lexer.peek_is(CR) && !lexer.peek_is(LF) {
            text.extend(lexer.advance()?);
        }
        Ok(Self(text))
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

/// Every remaining byte of the source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityBody(Vec<u8>);

impl EntityBody {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub(crate) fn parse_limited<R: BufRead>(
        lexer: &mut Lexer<R>,
        max_bytes: Option<usize>,
    ) -> Result<Self, ParseError> {
        let offset = lexer.offset();
        let mut body = Vec::new();
        while !lexer.at_eof() {
            body.extend(lexer.advance()?);
            if let Some(limit) = max_bytes {
                if body.len() > limit {
                    return Err(ParseError::new(
                        ParseErrorKind::BodyTooLarge { limit },
                        offset,
                    ));
                }
            }
        }
        Ok(Self(body))
    }
}

impl Production for EntityBody {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        Self::parse_limited(lexer, None)
    }

    fn emit(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::{
        Digits, EntityBody, HttpVersion, Method, Production, QuotedString, ReasonPhrase,
        RequestUri, StatusCode, Token,
    };
    use crate::error::ParseErrorKind;
    use crate::lexer::Lexer;

    fn parse<P: Production>(input: &[u8]) -> Result<P, crate::ParseError> {
        let mut lexer = Lexer::new(input)?;
        P::parse(&mut lexer)
    }

    #[test]
    fn token_joins_runs_until_delimiter() {
        let token: Token = parse(b"Content-Length:5").unwrap();
        assert_eq!(token.as_bytes(), b"Content-Length");
    }

    #[test]
    fn token_rejects_leading_delimiter() {
        let err = parse::<Token>(b":value").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyProduction);
        assert_eq!(err.offset, 0);

        let err = parse::<Token>(b"\r\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyProduction);
    }

    #[test]
    fn token_stops_at_end_of_input() {
        let token: Token = parse(b"GET").unwrap();
        assert_eq!(token.as_bytes(), b"GET");
        assert_matches!(parse::<Token>(b""), Err(err) if err.kind == ParseErrorKind::EmptyProduction);
    }

    #[test]
    fn quoted_string_accepts_linear_whitespace() {
        let quoted: QuotedString = parse(b"\"a b\r\n\tc\"").unwrap();
        assert_eq!(quoted.as_bytes(), b"a b\r\n\tc");
        assert_eq!(quoted.to_bytes(), b"\"a b\r\n\tc\"");
    }

    #[test]
    fn quoted_string_rejects_control_characters() {
        let err = parse::<QuotedString>(b"\"a\nb\"").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidQdtext);
        assert_eq!(err.offset, 2);

        let err = parse::<QuotedString>(b"\"a\x01\"").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidQdtext);
    }

    #[test]
    fn quoted_string_rejects_unfolded_line_break() {
        let err = parse::<QuotedString>(b"\"a\r\nb\"").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidQdtext);
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn quoted_string_requires_closing_quote() {
        let err = parse::<QuotedString>(b"\"abc").unwrap_err();
        assert_matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken { ref expected, ref actual } if expected == "\"" && actual.is_empty()
        );
    }

    #[test]
    fn method_keeps_its_form() {
        let bare: Method = parse(b"GET /").unwrap();
        assert_matches!(bare, Method::Bare(_));
        assert!(bare.is_get());
        assert!(bare.is_known());

        let quoted: Method = parse(b"\"GET\" /").unwrap();
        assert_matches!(quoted, Method::Quoted(_));
        assert!(quoted.is_get());
        assert_eq!(quoted.to_bytes(), b"\"GET\"");

        let custom: Method = parse(b"PURGE /").unwrap();
        assert!(!custom.is_known());
    }

    #[test]
    fn request_uri_stops_at_whitespace() {
        let uri: RequestUri = parse(b"/index.html?q=1 HTTP").unwrap();
        assert_eq!(uri.as_bytes(), b"/index.html?q=1");

        let err = parse::<RequestUri>(b" /").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyProduction);
    }

    #[test]
    fn digits_keep_source_width() {
        let digits: Digits = parse(b"007.").unwrap();
        assert_eq!(digits.value(), 7);
        assert_eq!(digits.to_bytes(), b"007");
    }

    #[test]
    fn digits_reject_words_and_overflow() {
        assert_matches!(
            parse::<Digits>(b"x"),
            Err(err) if err.kind == ParseErrorKind::InvalidNumber { value: "x".to_string() }
        );
        assert_matches!(
            parse::<Digits>(b"99999999999"),
            Err(err) if matches!(err.kind, ParseErrorKind::InvalidNumber { .. })
        );
    }

    #[test]
    fn parses_http_version() {
        let version: HttpVersion = parse(b"HTTP/1.0 ").unwrap();
        assert_eq!((version.major(), version.minor()), (1, 0));
        assert_eq!(version, HttpVersion::new(1, 0));

        let err = parse::<HttpVersion>(b"http/1.0").unwrap_err();
        assert_matches!(err.kind, ParseErrorKind::UnexpectedToken { ref expected, .. } if expected == "HTTP");
    }

    #[test]
    fn status_code_accepts_known_three_digit_codes() {
        let code: StatusCode = parse(b"200 ").unwrap();
        assert_eq!(code.value(), 200);
        assert_eq!(code.to_bytes(), b"200");
    }

    #[test]
    fn status_code_rejects_unknown_or_wrong_width() {
        for input in [b"999".as_slice(), b"20", b"0200", b"202"] {
            let err = parse::<StatusCode>(input).unwrap_err();
            assert_eq!(
                err.kind,
                ParseErrorKind::InvalidStatusCode {
                    value: String::from_utf8_lossy(input).into_owned(),
                }
            );
        }

        let err = parse::<StatusCode>(b"OK").unwrap_err();
        assert_matches!(err.kind, ParseErrorKind::InvalidNumber { .. });
    }

    #[test]
    fn reason_phrase_may_be_empty() {
        let reason: ReasonPhrase = parse(b"\r\n").unwrap();
        assert!(reason.as_bytes().is_empty());

        let reason: ReasonPhrase = parse(b"Not Found\r\n").unwrap();
        assert_eq!(reason.as_bytes(), b"Not Found");
    }

    #[test]
    fn entity_body_reads_to_end() {
        let body: EntityBody = parse(b"hello\r\nworld\x00\xff").unwrap();
        assert_eq!(body.as_bytes(), b"hello\r\nworld\x00\xff");

        let mut lexer = Lexer::new(&b"0123456789"[..]).unwrap();
        let err = EntityBody::parse_limited(&mut lexer, Some(4)).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::BodyTooLarge { limit: 4 });
    }
}
