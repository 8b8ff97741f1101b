mod codec;
mod entity;
mod error;
mod header;
mod lexer;
mod message;
mod options;

pub use codec::{parse_message, parse_message_with, serialize_message};
pub use entity::{
    Digits, EntityBody, HttpVersion, KNOWN_METHODS, KNOWN_STATUS_CODES, Method, Production,
    QuotedString, ReasonPhrase, RequestUri, StatusCode, Token,
};
pub use error::{ParseError, ParseErrorKind, show_token};
pub use header::{Header, HeaderList};
pub use lexer::{Lexer, TSPECIALS, is_ctl, is_tspecial};
pub use message::{
    FullRequest, FullResponse, Message, MessageKind, Request, RequestLine, SimpleRequest,
    SimpleResponse, StatusLine,
};
pub use options::{Disambiguation, Limits, ParseOptions};
