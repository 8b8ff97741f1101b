use std::io::{BufRead, ErrorKind};

use crate::error::{ParseError, ParseErrorKind};

pub const SP: &[u8] = b" ";
pub const HT: &[u8] = b"\t";
pub const CR: &[u8] = b"\r";
pub const LF: &[u8] = b"\n";
pub const QUOTE: &[u8] = b"\"";

pub const TSPECIALS: [u8; 19] = [
    b'(', b')', b'<', b'>', b'@', b',', b';', b':', b'\\', b'"', b'/', b'[', b']', b'?', b'=',
    b'{', b'}', b' ', b'\t',
];

pub fn is_ctl(byte: u8) -> bool {
    byte <= 31 || byte == 127
}

pub fn is_tspecial(byte: u8) -> bool {
    TSPECIALS.contains(&byte)
}

pub fn is_ctl_token(token: &[u8]) -> bool {
    matches!(token, [byte] if is_ctl(*byte))
}

pub fn is_tspecial_token(token: &[u8]) -> bool {
    matches!(token, [byte] if is_tspecial(*byte))
}

/// One-token-lookahead scanner over a byte source.
///
/// The buffered token is always the next unconsumed one; an empty token means
/// the source is exhausted.
#[derive(Debug)]
pub struct Lexer<R> {
    source: R,
    current: Vec<u8>,
    start: usize,
    position: usize,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(source: R) -> Result<Self, ParseError> {
        let mut lexer = Self {
            source,
            current: Vec::new(),
            start: 0,
            position: 0,
        };
        lexer.scan()?;
        Ok(lexer)
    }

    pub fn peek(&self) -> &[u8] {
        &self.current
    }

    pub fn peek_is(&self, literal: &[u8]) -> bool {
        self.current == literal
    }

    pub fn at_eof(&self) -> bool {
        self.current.is_empty()
    }

    /// Byte offset of the buffered token.
    pub fn offset(&self) -> usize {
        self.start
    }

    pub fn advance(&mut self) -> Result<Vec<u8>, ParseError> {
        let token = std::mem::take(&mut self.current);
        self.scan()?;
        Ok(token)
    }

    pub fn expect(&mut self, literal: &[u8]) -> Result<(), ParseError> {
        if self.current != literal {
            return Err(ParseError::unexpected(literal, &self.current, self.start));
        }
        self.scan()
    }

    pub fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.start)
    }

    fn scan(&mut self) -> Result<(), ParseError> {
        self.start = self.position;
        self.current.clear();

        let Some(byte) = self.peek_byte()? else {
            return Ok(());
        };
        self.bump(byte);

        match byte {
            b' ' | b'\r' | b'\n' => {}
            byte if is_tspecial(byte) => {}
            byte if byte.is_ascii_digit() => self.scan_run(|next| next.is_ascii_digit())?,
            byte if byte.is_ascii_alphabetic() => {
                self.scan_run(|next| next.is_ascii_alphabetic())?
            }
            _ => {}
        }
        Ok(())
    }

    fn scan_run(&mut self, accept: impl Fn(u8) -> bool) -> Result<(), ParseError> {
        while let Some(next) = self.peek_byte()? {
            if !accept(next) {
                break;
            }
            self.bump(next);
        }
        Ok(())
    }

    fn bump(&mut self, byte: u8) {
        self.current.push(byte);
        self.source.consume(1);
        self.position += 1;
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, ParseError> {
        loop {
            match self.source.fill_buf() {
                Ok(buffer) => return Ok(buffer.first().copied()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    return Err(ParseError::new(
                        ParseErrorKind::Io(err.to_string()),
                        self.position,
                    ));
                }
            }
        }
    }
}
