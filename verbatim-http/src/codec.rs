use std::io::{self, BufReader, Read, Write};

use crate::entity::{EntityBody, HTTP, Production};
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::Lexer;
use crate::message::{Message, SimpleResponse};
use crate::options::{Disambiguation, ParseOptions};

/// Parses one message, reading the source through to end-of-stream.
pub fn parse_message<R: Read>(source: R) -> Result<Message, ParseError> {
    parse_message_with(source, &ParseOptions::default())
}

pub fn parse_message_with<R: Read>(
    source: R,
    options: &ParseOptions,
) -> Result<Message, ParseError> {
    match options.disambiguation {
        Disambiguation::Committed => {
            let mut lexer = Lexer::new(BufReader::new(source))?;
            Message::parse_with(&mut lexer, &options.limits)
        }
        Disambiguation::Fallback => parse_with_fallback(source, options),
    }
}

pub fn serialize_message<W: Write>(message: &Message, sink: &mut W) -> io::Result<()> {
    sink.write_all(&message.to_bytes())
}

fn parse_with_fallback<R: Read>(
    mut source: R,
    options: &ParseOptions,
) -> Result<Message, ParseError> {
    let mut buffer = Vec::new();
    source
        .read_to_end(&mut buffer)
        .map_err(|err| ParseError::new(ParseErrorKind::Io(err.to_string()), buffer.len()))?;

    let (starts_as_request, parsed) = {
        let mut lexer = Lexer::new(buffer.as_slice())?;
        let starts_as_request = !lexer.at_eof() && !lexer.peek_is(HTTP);
        (starts_as_request, Message::parse_with(&mut lexer, &options.limits))
    };

    match parsed {
        Err(error) if starts_as_request && !error.kind.is_limit() => {
            if let Some(limit) = options.limits.max_body_bytes {
                if buffer.len() > limit {
                    return Err(ParseError::new(ParseErrorKind::BodyTooLarge { limit }, 0));
                }
            }
            Ok(Message::SimpleResponse(SimpleResponse {
                body: EntityBody::new(buffer),
            }))
        }
        result => result,
    }
}
