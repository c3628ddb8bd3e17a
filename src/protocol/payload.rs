//! Extraction of the meaningful part of a finished response.
//!
//! A typical exchange looks like this:
//! ```text
//! AT+CGSN          <- echo (optional, depends on ATE)
//! 866834040000000  <- payload
//! OK               <- terminal status line
//! ```

use crate::error::{Error, Result};
use crate::protocol::status::OK;

/// Returns the payload lines between the command echo and the `OK` line.
///
/// The first line starting with `command` is taken as the echo and the
/// payload starts right after it; without an echo the payload starts at
/// the first line. The payload ends before the first `OK` line.
///
/// With a non-empty `prefix`, only payload lines starting with the prefix
/// are returned, and the leading run of characters that occur in `prefix`
/// is stripped from each of them. This is a character-set trim:
/// `"+CSQ: 17,99"` with prefix `"+CSQ: "` yields `"17,99"`, but a value
/// that itself starts with one of the prefix characters loses it too.
///
/// # Errors
///
/// Returns [`Error::NoTerminalMarker`] if no line equals `OK`.
pub fn extract_payload<S: AsRef<str>>(
    lines: &[S],
    command: &str,
    prefix: &str,
) -> Result<Vec<String>> {
    let end = lines
        .iter()
        .position(|line| line.as_ref().trim() == OK)
        .ok_or(Error::NoTerminalMarker)?;

    let start = lines[..end]
        .iter()
        .position(|line| line.as_ref().trim().starts_with(command))
        .map_or(0, |echo| echo + 1);

    let body = lines[start..end].iter().map(AsRef::<str>::as_ref);

    let payload = if prefix.is_empty() {
        body.map(str::to_owned).collect()
    } else {
        body.filter(|line| line.starts_with(prefix))
            .map(|line| line.trim_start_matches(|c| prefix.contains(c)).to_owned())
            .collect()
    };

    Ok(payload)
}
