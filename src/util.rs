//! Shared identifier and file helpers.

use std::path::Path;

use crate::error::{Result, SqlGenError};

/// SQL Server rejects identifiers longer than this.
pub const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Characters kept from an over-long identifier before the hash suffix.
const SHORTENED_PREFIX_LENGTH: usize = 116;

/// Wraps an identifier in brackets unless it already has both.
///
/// ```
/// use sqlproj_gen::util::add_brackets;
///
/// assert_eq!(add_brackets("Orders").unwrap(), "[Orders]");
/// assert_eq!(add_brackets("[Orders]").unwrap(), "[Orders]");
/// assert!(add_brackets("[Orders").is_err());
/// ```
pub fn add_brackets(input: &str) -> Result<String> {
    let bracket_start = input.starts_with('[');
    let bracket_end = input.ends_with(']');

    match (bracket_start, bracket_end) {
        (true, true) => Ok(input.to_string()),
        (false, false) => Ok(format!("[{}]", input)),
        _ => Err(SqlGenError::InvalidBrackets {
            input: input.to_string(),
        }),
    }
}

/// Shortens an identifier longer than 128 characters in a deterministic way.
///
/// Lengths count UTF-16 code units, as SQL Server does for `sysname`.
/// The first 116 units are kept, followed by `_`, the absolute value of
/// [`deterministic_hash`] of the whole input and a closing bracket. Inputs are
/// expected to be bracketed already.
pub fn shorten_if_too_long(input: &str) -> String {
    let units: Vec<u16> = input.encode_utf16().collect();
    if units.len() <= MAX_IDENTIFIER_LENGTH {
        return input.to_string();
    }

    let prefix = String::from_utf16_lossy(&units[..SHORTENED_PREFIX_LENGTH]);
    format!(
        "{}_{}]",
        prefix,
        deterministic_hash(input).unsigned_abs()
    )
}

/// Two-lane string hash that is stable across runs and processes.
///
/// Operates on UTF-16 code units with 32-bit wraparound arithmetic.
pub fn deterministic_hash(input: &str) -> i32 {
    let units: Vec<u16> = input.encode_utf16().collect();

    let mut hash1: i32 = (5381_i32 << 16).wrapping_add(5381);
    let mut hash2: i32 = hash1;

    for pair in units.chunks(2) {
        hash1 = (hash1.wrapping_shl(5)).wrapping_add(hash1) ^ i32::from(pair[0]);

        if let Some(&second) = pair.get(1) {
            hash2 = (hash2.wrapping_shl(5)).wrapping_add(hash2) ^ i32::from(second);
        }
    }

    hash1.wrapping_add(hash2.wrapping_mul(1_566_083_941))
}

/// Splits a definition path on either separator, dropping empty segments.
pub(crate) fn path_segments(path: &str) -> Vec<&str> {
    path.split(['\\', '/']).filter(|s| !s.is_empty()).collect()
}

/// Last segment of a `\` or `/` separated path.
pub(crate) fn file_name(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}

/// Writes a file, creating its parent directories first. Overwrites.
pub(crate) fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SqlGenError::write(parent, e))?;
    }
    std::fs::write(path, contents).map_err(|e| SqlGenError::write(path, e))
}
