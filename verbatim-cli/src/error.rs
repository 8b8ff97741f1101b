use thiserror::Error;
use verbatim_http::ParseError;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("harness IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("harness configuration error: {0}")]
    Config(String),
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
    #[error(
        "regenerated message differs from input at byte {offset} (input {expected_len} bytes, regenerated {actual_len} bytes)"
    )]
    Mismatch {
        offset: usize,
        expected_len: usize,
        actual_len: usize,
    },
}
