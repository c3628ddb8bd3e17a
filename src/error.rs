//! Error types for the atcom library.

use thiserror::Error;

/// The main error type for atcom operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The serial port could not be opened.
    #[error("failed to open serial port {port}: {source}")]
    PortOpenFailed {
        port: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the command to the port failed.
    #[error("failed to write command: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// Reading from the port failed with a non-transient error.
    #[error("failed to read response: {0}")]
    ReadFailed(#[source] std::io::Error),

    /// The modem answered with an explicit error line.
    #[error("modem error: {line}")]
    ProtocolError { line: String },

    /// A caller-supplied fault marker was found in the response.
    #[error("faulty response: found {marker:?}")]
    FaultMarkerMatched { marker: String },

    /// Desired markers were configured but none appeared in the response.
    #[error("desired response not found")]
    DesiredMarkerNotFound,

    /// No terminal status line arrived in time.
    #[error("timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The response has no terminal `OK` line to bound the payload.
    #[error("no OK line in response")]
    NoTerminalMarker,

    /// None of the supported modems is attached.
    #[error("no supported modem found")]
    NoSupportedModem,

    /// A supported modem is attached but none of its ports could be selected.
    #[error("no serial port selected for the detected modem")]
    NoPortSelected,

    /// The request violates its invariants.
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// An external program failed.
    #[error("`{program}` failed: {reason}")]
    Shell { program: String, reason: String },

    /// The read worker panicked or was aborted.
    #[error("read worker failed: {0}")]
    Task(String),
}

/// Result type alias for atcom operations.
pub type Result<T> = std::result::Result<T, Error>;
