use std::io::BufRead;

use crate::entity::{Production, Token};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{CR, LF, Lexer};

/// `HTTP-header := field-name ":" [ field-value ] CRLF`
///
/// The value is kept exactly as written, including any leading whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: Token,
    pub value: Vec<u8>,
}

impl Header {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: Token::new(name),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &[u8] {
        self.name.as_bytes()
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

impl Production for Header {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        let name = Token::parse(lexer)?;
        lexer.expect(b":")?;

        let mut value = Vec::new();
        while !lexer.at_eof() && !lexer.peek_is(CR) {
            value.extend(lexer.advance()?);
        }

        lexer.expect(CR)?;
        lexer.expect(LF)?;
        Ok(Self { name, value })
    }

    fn emit(&self, out: &mut Vec<u8>) {
        self.name.emit(out);
        out.push(b':');
        out.extend_from_slice(&self.value);
        out.extend_from_slice(b"\r\n");
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderList(Vec<Header>);

impl HeaderList {
    pub fn new(headers: Vec<Header>) -> Self {
        Self(headers)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Header> {
        self.0.iter()
    }

    /// First header whose name matches ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&Header> {
        self.0
            .iter()
            .find(|header| header.name().eq_ignore_ascii_case(name.as_bytes()))
    }

    pub(crate) fn parse_limited<R: BufRead>(
        lexer: &mut Lexer<R>,
        max_head_bytes: Option<usize>,
    ) -> Result<Self, ParseError> {
        let mut headers = Vec::new();
        while !lexer.peek_is(CR) {
            headers.push(Header::parse(lexer)?);
            check_head_size(lexer, max_head_bytes)?;
        }

        lexer.expect(CR)?;
        lexer.expect(LF)?;
        check_head_size(lexer, max_head_bytes)?;
        Ok(Self(headers))
    }
}

fn check_head_size<R: BufRead>(lexer: &Lexer<R>, limit: Option<usize>) -> Result<(), ParseError> {
    match limit {
        Some(limit) if lexer.offset() > limit => {
            Err(lexer.error(ParseErrorKind::HeadTooLarge { limit }))
        }
        _ => Ok(()),
    }
}

impl Production for HeaderList {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        Self::parse_limited(lexer, None)
    }

    fn emit(&self, out: &mut Vec<u8>) {
        for header in &self.0 {
            header.emit(out);
        }
        out.extend_from_slice(b"\r\n");
    }
}

impl<'a> IntoIterator for &'a HeaderList {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::{Header, HeaderList};
    use crate::entity::Production;
    use crate::error::ParseErrorKind;
    use crate::lexer::Lexer;

    #[test]
    fn parses_header_value_verbatim() {
        let mut lexer = Lexer::new(&b"Host:  example.com \r\nrest"[..]).unwrap();
        let header = Header::parse(&mut lexer).unwrap();

        assert_eq!(header.name(), b"Host");
        assert_eq!(header.value(), b"  example.com ");
        assert_eq!(header.to_bytes(), b"Host:  example.com \r\n");
        assert_eq!(lexer.peek(), b"rest");
    }

    #[test]
    fn header_requires_colon() {
        let mut lexer = Lexer::new(&b"Host example.com\r\n"[..]).unwrap();
        let err = Header::parse(&mut lexer).unwrap_err();
        assert_matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken { ref expected, ref actual } if expected == ":" && actual == " "
        );
        assert_eq!(err.offset, 4);
    }

    #[test]
    fn header_name_must_not_be_empty() {
        let mut lexer = Lexer::new(&b": value\r\n"[..]).unwrap();
        let err = Header::parse(&mut lexer).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyProduction);
    }

    #[test]
    fn header_list_keeps_order_and_terminator() {
        let input = b"B: 2\r\na: 1\r\nb: 3\r\n\r\nbody";
        let mut lexer = Lexer::new(&input[..]).unwrap();
        let headers = HeaderList::parse(&mut lexer).unwrap();

        let names: Vec<&[u8]> = headers.iter().map(Header::name).collect();
        assert_eq!(names, [b"B".as_slice(), b"a".as_slice(), b"b".as_slice()]);
        assert_eq!(headers.get("b").map(Header::value), Some(b" 2".as_slice()));
        assert_eq!(headers.to_bytes(), b"B: 2\r\na: 1\r\nb: 3\r\n\r\n");
        assert_eq!(lexer.peek(), b"body");
    }

    #[test]
    fn empty_header_list_is_bare_crlf() {
        let mut lexer = Lexer::new(&b"\r\n"[..]).unwrap();
        let headers = HeaderList::parse(&mut lexer).unwrap();
        assert!(headers.is_empty());
        assert_eq!(headers.to_bytes(), b"\r\n");
    }

    #[test]
    fn header_list_fails_at_end_of_input() {
        let mut lexer = Lexer::new(&b"Host: a\r\n"[..]).unwrap();
        let err = HeaderList::parse(&mut lexer).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::EmptyProduction);
        assert_eq!(err.offset, 9);
    }

    #[test]
    fn header_list_enforces_head_limit() {
        let mut lexer = Lexer::new(&b"Name: value\r\nOther: x\r\n\r\n"[..]).unwrap();
        let err = HeaderList::parse_limited(&mut lexer, Some(8)).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::HeadTooLarge { limit: 8 });
    }
}
