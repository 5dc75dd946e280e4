//! Recording file naming: `REC_<name>_<YYYYMMDD_HHmmss>.<ext>`, with a
//! `-<n>` take number before the extension when that name is already taken.
//!
//! The catalog derives ids and titles from these names on every read, so
//! building and parsing live side by side.

use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::NaiveDateTime;
use tracing::debug;

/// Prefix of every recording file name.
pub const RECORDING_PREFIX: &str = "REC_";

/// `chrono` format of the trailing timestamp segment.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Length of `_YYYYMMDD_HHmmss`.
const TIMESTAMP_SUFFIX_LEN: usize = 16;

/// Used when the requested name sanitizes to nothing.
const FALLBACK_NAME: &str = "untitled";

/// Make a user-supplied name safe to embed in a file name.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.chars().all(|c| c == '_' || c.is_whitespace()) {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}

/// Build the file name for a recording started at `started_at`.
pub fn recording_file_name(name: &str, started_at: NaiveDateTime, extension: &str) -> String {
    format!(
        "{RECORDING_PREFIX}{}_{}.{extension}",
        sanitize_name(name),
        started_at.format(TIMESTAMP_FORMAT)
    )
}

/// File name for the `take`-th recording with the same name and second.
///
/// Take 1 is the plain name; later takes end in `-<take>`.
pub fn numbered_file_name(
    name: &str,
    started_at: NaiveDateTime,
    extension: &str,
    take: u32,
) -> String {
    if take <= 1 {
        return recording_file_name(name, started_at, extension);
    }
    format!(
        "{RECORDING_PREFIX}{}_{}-{take}.{extension}",
        sanitize_name(name),
        started_at.format(TIMESTAMP_FORMAT)
    )
}

/// First path in `dir` for this name and second that is not on disk yet.
pub async fn unused_recording_path(
    dir: &Path,
    name: &str,
    started_at: NaiveDateTime,
    extension: &str,
) -> io::Result<PathBuf> {
    let mut take = 1;
    loop {
        let path = dir.join(numbered_file_name(name, started_at, extension, take));
        if !tokio::fs::try_exists(&path).await? {
            return Ok(path);
        }
        debug!(path = ?path, "Recording name taken, trying next take");
        take += 1;
    }
}

/// Display title for a recording file stem.
///
/// Strips the `REC_` prefix, any take number and the trailing timestamp. Any
/// stem that does not follow the pattern, or that would leave an empty title,
/// is returned as-is.
pub fn derive_title(stem: &str) -> String {
    let Some(rest) = stem.strip_prefix(RECORDING_PREFIX) else {
        return stem.to_string();
    };

    let title = strip_timestamp_suffix(rest)
        .or_else(|| strip_take_number(rest).and_then(strip_timestamp_suffix));
    match title {
        Some(title) if !title.trim().is_empty() => title.to_string(),
        _ => stem.to_string(),
    }
}

fn strip_take_number(rest: &str) -> Option<&str> {
    let (head, take) = rest.rsplit_once('-')?;
    (!take.is_empty() && take.bytes().all(|b| b.is_ascii_digit())).then_some(head)
}

fn strip_timestamp_suffix(rest: &str) -> Option<&str> {
    if rest.len() < TIMESTAMP_SUFFIX_LEN {
        return None;
    }
    let split = rest.len() - TIMESTAMP_SUFFIX_LEN;
    if !rest.is_char_boundary(split) {
        return None;
    }

    let (title, suffix) = rest.split_at(split);
    let bytes = suffix.as_bytes();
    let well_formed = bytes[0] == b'_'
        && bytes[9] == b'_'
        && bytes[1..9].iter().all(u8::is_ascii_digit)
        && bytes[10..].iter().all(u8::is_ascii_digit);

    well_formed.then_some(title)
}
