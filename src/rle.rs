//! Run-length transducer over character streams
//!
//! Each run of identical characters becomes a `<count><char>` token and tokens
//! are joined by a single space. A run of spaces therefore ends in its own
//! space followed by the separator, and the decoder relies on that: a space is
//! only treated as a delimiter once the next character turns out not to be a
//! space.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::TransportError;

const SEPARATOR: char = ' ';

/// Iterator over `(char, run_length)` pairs of a text.
struct Runs<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Runs<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
        }
    }
}

impl Iterator for Runs<'_> {
    type Item = (char, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let ch = self.chars.next()?;
        let mut run = 1;
        while self.chars.next_if_eq(&ch).is_some() {
            run += 1;
        }
        Some((ch, run))
    }
}

/// Encode text into space-separated `<count><char>` tokens.
///
/// Empty input yields an empty string. Never fails.
pub fn encode(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    for (i, (ch, run)) in Runs::new(text).enumerate() {
        if i > 0 {
            output.push(SEPARATOR);
        }
        output.push_str(&run.to_string());
        output.push(ch);
    }
    output
}

/// Byte length of `encode(text)`, computed without building the token string.
pub fn encoded_len(text: &str) -> usize {
    let mut len = 0;
    for (i, (ch, run)) in Runs::new(text).enumerate() {
        if i > 0 {
            len += SEPARATOR.len_utf8();
        }
        len += decimal_digits(run) + ch.len_utf8();
    }
    len
}

fn decimal_digits(n: usize) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Largest output a `String` can hold.
const MAX_OUTPUT: usize = isize::MAX as usize;

/// Decode a token string produced by [`encode`].
pub fn decode(tokens: &str) -> Result<String, TransportError> {
    decode_bounded(tokens, MAX_OUTPUT)
}

/// Decode a token string, refusing to produce more than `limit` bytes.
pub fn decode_bounded(tokens: &str, limit: usize) -> Result<String, TransportError> {
    let limit = limit.min(MAX_OUTPUT);
    let mut output = String::new();
    let mut pending = String::new();
    let mut pending_start = 0;
    let mut delimiter_seen = false;

    for (offset, ch) in tokens.char_indices() {
        if delimiter_seen && ch != SEPARATOR {
            // last char of `pending` is the delimiter
            pending.pop();
            expand_token(&pending, pending_start, limit, &mut output)?;
            pending.clear();
            pending_start = offset;
            delimiter_seen = false;
        } else if ch == SEPARATOR {
            delimiter_seen = true;
        }
        pending.push(ch);
    }

    if !pending.is_empty() {
        expand_token(&pending, pending_start, limit, &mut output)?;
    }

    Ok(output)
}

/// Append the run described by a single `<count><char>` token.
fn expand_token(
    token: &str,
    offset: usize,
    limit: usize,
    output: &mut String,
) -> Result<(), TransportError> {
    let malformed = || TransportError::MalformedToken {
        token: token.to_string(),
        offset,
    };

    let mut chars = token.chars();
    let run_char = chars.next_back().ok_or_else(malformed)?;
    let count_field = chars.as_str();
    if count_field.is_empty() || !count_field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let count: usize = count_field.parse().map_err(|_| malformed())?;

    let size = count
        .checked_mul(run_char.len_utf8())
        .and_then(|n| n.checked_add(output.len()))
        .filter(|&n| n <= limit)
        .ok_or_else(|| TransportError::InputTooLarge {
            size: output
                .len()
                .saturating_add(count.saturating_mul(run_char.len_utf8())),
            limit,
        })?;

    output
        .try_reserve(size - output.len())
        .map_err(|_| TransportError::InputTooLarge { size, limit })?;
    output.extend(std::iter::repeat(run_char).take(count));
    Ok(())
}
