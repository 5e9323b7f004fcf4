//! Packet line tokenizer.
//!
//! `perf script -D` prints every SPE packet behind a fixed-width column
//! holding the buffer offset and the raw packet bytes:
//!
//! ```text
//! .  00000000:  b0 18 8f 56 80 ff ff 00 80                      PC 0xff80568f18 el1 ns=1
//! ```
//!
//! Only the decoded text after that column is of interest.

use crate::utils::error::TokenizeError;

/// Strip the first `prefix_width` characters of `line` and split the rest on whitespace
///
/// **Public** - used by the session scanner and the packet accumulator
///
/// The width is counted in characters, line terminator included, so a line
/// read with its trailing newline behaves the same as in the dump.
///
/// # Errors
/// * `TokenizeError::MalformedLine` - line is shorter than the prefix column
pub fn tokenize(line: &str, prefix_width: usize) -> Result<Vec<&str>, TokenizeError> {
    let payload = match line.char_indices().nth(prefix_width) {
        Some((offset, _)) => &line[offset..],
        None => {
            let len = line.chars().count();
            if len < prefix_width {
                return Err(TokenizeError::MalformedLine { len });
            }
            ""
        }
    };

    Ok(payload.split_whitespace().collect())
}
