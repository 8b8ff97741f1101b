use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    pub(crate) fn unexpected(expected: &[u8], actual: &[u8], offset: usize) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedToken {
                expected: String::from_utf8_lossy(expected).into_owned(),
                actual: String::from_utf8_lossy(actual).into_owned(),
            },
            offset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("expected {} but found {}", show_token(.expected), show_token(.actual))]
    UnexpectedToken { expected: String, actual: String },
    #[error("invalid number {}", show_token(.value))]
    InvalidNumber { value: String },
    #[error("unknown status code {}", show_token(.value))]
    InvalidStatusCode { value: String },
    #[error("expected at least one token character")]
    EmptyProduction,
    #[error("invalid character inside quoted string")]
    InvalidQdtext,
    #[error("method {} cannot start a simple request", show_token(.method))]
    UnrecognizedMethodAtSimpleRequest { method: String },
    #[error("message head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },
    #[error("entity body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("read failed: {0}")]
    Io(String),
}

impl ParseErrorKind {
    pub fn is_limit(&self) -> bool {
        matches!(self, Self::HeadTooLarge { .. } | Self::BodyTooLarge { .. })
    }
}

/// Renders a lexical token for diagnostics, naming the whitespace and EOF tokens.
pub fn show_token(token: &str) -> String {
    match token {
        "" => "<EOF>".to_string(),
        " " => "<SP>".to_string(),
        "\t" => "<HT>".to_string(),
        "\r" => "<CR>".to_string(),
        "\n" => "<LF>".to_string(),
        other => format!("\"{other}\""),
    }
}
