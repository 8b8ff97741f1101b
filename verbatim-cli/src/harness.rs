use std::io::{self, Write};

use tracing::debug;
use verbatim_http::{Message, ParseOptions, parse_message_with, serialize_message};

use crate::config::ReportConfig;
use crate::error::HarnessError;

#[derive(Debug)]
pub struct RoundTrip {
    pub message: Message,
    pub regenerated: Vec<u8>,
}

/// Parses `input`, serializes the result and requires the bytes to match exactly.
pub fn verify_round_trip(input: &[u8], options: &ParseOptions) -> Result<RoundTrip, HarnessError> {
    let message = parse_message_with(input, options)?;
    debug!(
        kind = %message.kind(),
        headers = message.headers().map_or(0, |headers| headers.len()),
        body_bytes = message.body().map_or(0, |body| body.len()),
        "parsed message"
    );

    let mut regenerated = Vec::with_capacity(input.len());
    serialize_message(&message, &mut regenerated)?;

    if let Some(offset) = first_difference(input, &regenerated) {
        return Err(HarnessError::Mismatch {
            offset,
            expected_len: input.len(),
            actual_len: regenerated.len(),
        });
    }

    Ok(RoundTrip {
        message,
        regenerated,
    })
}

pub fn first_difference(expected: &[u8], actual: &[u8]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(left, right)| left != right)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))
}

pub fn write_report<W: Write>(
    out: &mut W,
    round_trip: &RoundTrip,
    report: &ReportConfig,
) -> io::Result<()> {
    if report.echo_message {
        writeln!(out, "---Message begins---")?;
        out.write_all(&round_trip.regenerated)?;
        writeln!(out, "---Message ends---")?;
    }
    writeln!(out, "OK")
}
