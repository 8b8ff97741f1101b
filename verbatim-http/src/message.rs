use std::fmt;
use std::io::BufRead;

use crate::entity::{
    EntityBody, HTTP, HttpVersion, Method, Production, ReasonPhrase, RequestUri, StatusCode,
};
use crate::error::{ParseError, ParseErrorKind};
use crate::header::HeaderList;
use crate::lexer::{CR, LF, Lexer, SP};
use crate::options::Limits;

/// `Status-Line := HTTP-Version SP Status-Code SP Reason-Phrase CRLF`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub version: HttpVersion,
    pub code: StatusCode,
    pub reason: ReasonPhrase,
}

impl Production for StatusLine {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        let version = HttpVersion::parse(lexer)?;
        lexer.expect(SP)?;
        let code = StatusCode::parse(lexer)?;
        lexer.expect(SP)?;
        let reason = ReasonPhrase::parse(lexer)?;
        lexer.expect(CR)?;
        lexer.expect(LF)?;
        Ok(Self {
            version,
            code,
            reason,
        })
    }

    fn emit(&self, out: &mut Vec<u8>) {
        self.version.emit(out);
        out.extend_from_slice(SP);
        self.code.emit(out);
        out.extend_from_slice(SP);
        self.reason.emit(out);
        out.extend_from_slice(b"\r\n");
    }
}

/// `Request-Line := Method SP Request-URI SP HTTP-Version CRLF`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub uri: RequestUri,
    pub version: HttpVersion,
}

impl RequestLine {
    // Picks up after `Method SP Request-URI SP`.
    fn finish<R: BufRead>(
        method: Method,
        uri: RequestUri,
        lexer: &mut Lexer<R>,
    ) -> Result<Self, ParseError> {
        let version = HttpVersion::parse(lexer)?;
        lexer.expect(CR)?;
        lexer.expect(LF)?;
        Ok(Self {
            method,
            uri,
            version,
        })
    }
}

impl Production for RequestLine {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        let method = Method::parse(lexer)?;
        lexer.expect(SP)?;
        let uri = RequestUri::parse(lexer)?;
        lexer.expect(SP)?;
        Self::finish(method, uri, lexer)
    }

    fn emit(&self, out: &mut Vec<u8>) {
        self.method.emit(out);
        out.extend_from_slice(SP);
        self.uri.emit(out);
        out.extend_from_slice(SP);
        self.version.emit(out);
        out.extend_from_slice(b"\r\n");
    }
}

/// `Simple-Request := "GET" SP Request-URI CRLF`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleRequest {
    pub method: Method,
    pub uri: RequestUri,
}

impl SimpleRequest {
    fn emit(&self, out: &mut Vec<u8>) {
        self.method.emit(out);
        out.extend_from_slice(SP);
        self.uri.emit(out);
        out.extend_from_slice(b"\r\n");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullRequest {
    pub line: RequestLine,
    pub headers: HeaderList,
    pub body: EntityBody,
}

impl FullRequest {
    fn emit(&self, out: &mut Vec<u8>) {
        self.line.emit(out);
        self.headers.emit(out);
        self.body.emit(out);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Simple(SimpleRequest),
    Full(FullRequest),
}

impl Request {
    pub fn method(&self) -> &Method {
        match self {
            Self::Simple(simple) => &simple.method,
            Self::Full(full) => &full.line.method,
        }
    }

    pub fn uri(&self) -> &RequestUri {
        match self {
            Self::Simple(simple) => &simple.uri,
            Self::Full(full) => &full.line.uri,
        }
    }

    pub(crate) fn parse_with<R: BufRead>(
        lexer: &mut Lexer<R>,
        limits: &Limits,
    ) -> Result<Self, ParseError> {
        let method_offset = lexer.offset();
        let method = Method::parse(lexer)?;
        lexer.expect(SP)?;
        let uri = RequestUri::parse(lexer)?;

        // A second SP can only lead into an HTTP-Version, so it commits to Full-Request.
        if lexer.peek_is(SP) {
            lexer.expect(SP)?;
            let line = RequestLine::finish(method, uri, lexer)?;
            let headers = HeaderList::parse_limited(lexer, limits.max_head_bytes)?;
            let body = EntityBody::parse_limited(lexer, limits.max_body_bytes)?;
            return Ok(Self::Full(FullRequest {
                line,
                headers,
                body,
            }));
        }

        lexer.expect(CR)?;
        lexer.expect(LF)?;
        if !method.is_get() {
            return Err(ParseError::new(
                ParseErrorKind::UnrecognizedMethodAtSimpleRequest {
                    method: String::from_utf8_lossy(&method.to_bytes()).into_owned(),
                },
                method_offset,
            ));
        }
        // Simple-Request has no body; anything after CRLF could not be re-emitted.
        if !lexer.at_eof() {
            return Err(ParseError::unexpected(b"", lexer.peek(), lexer.offset()));
        }
        Ok(Self::Simple(SimpleRequest { method, uri }))
    }
}

impl Production for Request {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        Self::parse_with(lexer, &Limits::default())
    }

    fn emit(&self, out: &mut Vec<u8>) {
        match self {
            Self::Simple(simple) => simple.emit(out),
            Self::Full(full) => full.emit(out),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullResponse {
    pub line: StatusLine,
    pub headers: HeaderList,
    pub body: EntityBody,
}

impl FullResponse {
    pub(crate) fn parse_with<R: BufRead>(
        lexer: &mut Lexer<R>,
        limits: &Limits,
    ) -> Result<Self, ParseError> {
        let line = StatusLine::parse(lexer)?;
        let headers = HeaderList::parse_limited(lexer, limits.max_head_bytes)?;
        let body = EntityBody::parse_limited(lexer, limits.max_body_bytes)?;
        Ok(Self {
            line,
            headers,
            body,
        })
    }
}

impl Production for FullResponse {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        Self::parse_with(lexer, &Limits::default())
    }

    fn emit(&self, out: &mut Vec<u8>) {
        self.line.emit(out);
        self.headers.emit(out);
        self.body.emit(out);
    }
}

/// `Simple-Response := [ Entity-Body ]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SimpleResponse {
    pub body: EntityBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    FullResponse(FullResponse),
    Request(Request),
    SimpleResponse(SimpleResponse),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    FullResponse,
    FullRequest,
    SimpleRequest,
    SimpleResponse,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FullResponse => "full-response",
            Self::FullRequest => "full-request",
            Self::SimpleRequest => "simple-request",
            Self::SimpleResponse => "simple-response",
        };
        f.write_str(name)
    }
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::FullResponse(_) => MessageKind::FullResponse,
            Self::Request(Request::Full(_)) => MessageKind::FullRequest,
            Self::Request(Request::Simple(_)) => MessageKind::SimpleRequest,
            Self::SimpleResponse(_) => MessageKind::SimpleResponse,
        }
    }

    pub fn headers(&self) -> Option<&HeaderList> {
        match self {
            Self::FullResponse(response) => Some(&response.headers),
            Self::Request(Request::Full(request)) => Some(&request.headers),
            Self::Request(Request::Simple(_)) | Self::SimpleResponse(_) => None,
        }
    }

    pub fn body(&self) -> Option<&EntityBody> {
        match self {
            Self::FullResponse(response) => Some(&response.body),
            Self::Request(Request::Full(request)) => Some(&request.body),
            Self::SimpleResponse(response) => Some(&response.body),
            Self::Request(Request::Simple(_)) => None,
        }
    }

    /// Picks the message kind from the first token alone; there is no backtracking.
    pub fn parse_with<R: BufRead>(
        lexer: &mut Lexer<R>,
        limits: &Limits,
    ) -> Result<Self, ParseError> {
        if lexer.peek_is(HTTP) {
            FullResponse::parse_with(lexer, limits).map(Self::FullResponse)
        } else if !lexer.at_eof() {
            Request::parse_with(lexer, limits).map(Self::Request)
        } else {
            let body = EntityBody::parse_limited(lexer, limits.max_body_bytes)?;
            Ok(Self::SimpleResponse(SimpleResponse { body }))
        }
    }
}

impl Production for Message {
    fn parse<R: BufRead>(lexer: &mut Lexer<R>) -> Result<Self, ParseError> {
        Self::parse_with(lexer, &Limits::default())
    }

    fn emit(&self, out: &mut Vec<u8>) {
        match self {
            Self::FullResponse(response) => response.emit(out),
            Self::Request(request) => request.emit(out),
            Self::SimpleResponse(response) => response.body.emit(out),
        }
    }
}
