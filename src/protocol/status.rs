//! Terminal status lines of the AT command protocol.
//!
//! A modem ends every transaction with a line of its own: `OK` on success,
//! `ERROR` or an extended `+CME ERROR: <n>` / `+CMS ERROR: <n>` on failure.

/// Final result code for a successful command.
pub const OK: &str = "OK";

/// Final result code for a failed command.
pub const ERROR: &str = "ERROR";

/// Extended mobile equipment error prefix.
pub const CME_ERROR: &str = "+CME ERROR";

/// Extended SMS error prefix.
pub const CMS_ERROR: &str = "+CMS ERROR";

/// Classification of a single trimmed response line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLine {
    /// The transaction finished successfully.
    Ok,
    /// The modem reported an error.
    Error,
    /// Any other line (echo, data, URC).
    Data,
}

impl StatusLine {
    /// Classifies a line. Leading and trailing whitespace is ignored.
    #[must_use]
    pub fn classify(line: &str) -> Self {
        let line = line.trim();
        if line == OK {
            Self::Ok
        } else if line == ERROR || line.contains(CME_ERROR) || line.contains(CMS_ERROR) {
            Self::Error
        } else {
            Self::Data
        }
    }

    /// Returns true for `Ok` and `Error`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ok | Self::Error)
    }
}
