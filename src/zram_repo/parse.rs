// Positional integer extraction from sysfs text

use crate::error::ParseError;
use crate::models::StatRecord;

/// Extracts every maximal run of ASCII digits, left to right, as a base-10 `u64`.
/// Everything else (labels, whitespace, signs, punctuation) separates runs.
/// Scanning stops at the first NUL byte, like a terminated read buffer.
pub fn extract_integers(buf: &[u8]) -> Result<Vec<u64>, ParseError> {
    let mut values = Vec::new();
    let mut current: Option<u64> = None;

    for &byte in buf.iter().take_while(|&&b| b != 0) {
        if byte.is_ascii_digit() {
            let digit = u64::from(byte - b'0');
            let acc = current.unwrap_or(0);
            let next = acc
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit))
                .ok_or(ParseError::Overflow {
                    index: values.len(),
                })?;
            current = Some(next);
        } else if let Some(value) = current.take() {
            values.push(value);
        }
    }
    if let Some(value) = current {
        values.push(value);
    }
    Ok(values)
}

/// Extracts integers from `buf` and binds the first `R::ARITY` of them to `R`.
pub fn parse_record<R: StatRecord>(buf: &[u8]) -> Result<R, ParseError> {
    let values = extract_integers(buf)?;
    let insufficient = ParseError::InsufficientFields {
        expected: R::ARITY,
        found: values.len(),
    };
    if values.len() < R::ARITY {
        return Err(insufficient);
    }
    R::from_fields(&values[..R::ARITY]).ok_or(insufficient)
}
