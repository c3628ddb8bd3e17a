//! Command request and result types.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::protocol::extract_payload;
use crate::transport::{DEFAULT_BAUD_RATE, SerialConfig};

/// Default time to wait for a terminal status line.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Line terminator appended to commands.
pub const LINE_END: &str = "\r\n";

/// A single AT command to run against a modem.
#[derive(Debug, Clone)]
pub struct CommandRequest {
    /// Command text without framing (e.g. `AT+CSQ`).
    pub text: String,
    /// Whether to append `\r\n` before sending.
    pub line_end: bool,
    /// Serial port path. `None` lets the client detect it.
    pub port: Option<String>,
    /// Baud rate.
    pub baud_rate: u32,
    /// Substrings that mark the response as the one we wait for.
    pub desired: Vec<String>,
    /// Substrings that mark the response as faulty.
    pub fault: Vec<String>,
    /// Maximum time to wait for completion.
    pub timeout: Duration,
    /// Receives every decoded line as it arrives.
    pub sink: Option<mpsc::Sender<String>>,
    /// Only listen for unsolicited responses, write nothing.
    pub listen: bool,
}

impl CommandRequest {
    /// Creates a request for `text` with default settings.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            line_end: true,
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            desired: Vec::new(),
            fault: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            sink: None,
            listen: false,
        }
    }

    /// Creates a request that sends nothing and streams unsolicited
    /// responses into `sink`.
    #[must_use]
    pub fn listen(sink: mpsc::Sender<String>) -> Self {
        Self {
            sink: Some(sink),
            listen: true,
            ..Self::new("")
        }
    }

    /// Sets the serial port path.
    #[must_use]
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Sets the baud rate.
    #[must_use]
    pub const fn baud_rate(mut self, rate: u32) -> Self {
        self.baud_rate = rate;
        self
    }

    /// Sets whether `\r\n` is appended.
    #[must_use]
    pub const fn line_end(mut self, line_end: bool) -> Self {
        self.line_end = line_end;
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the desired markers.
    ///
    /// A desired marker seen before the final `OK` ends the exchange right
    /// away, so the returned lines may not contain `OK` and
    /// [`CommandResult::payload`] reports [`Error::NoTerminalMarker`]. Any
    /// `OK` still on its way is left unread on the line.
    #[must_use]
    pub fn desired<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.desired = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the fault markers.
    #[must_use]
    pub fn fault<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fault = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Streams decoded lines into `sink`.
    #[must_use]
    pub fn stream_to(mut self, sink: mpsc::Sender<String>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Returns true if the engine should run in streaming mode.
    #[must_use]
    pub const fn is_streaming(&self) -> bool {
        self.sink.is_some()
    }

    /// Returns the serial configuration, if a port is set.
    #[must_use]
    pub fn serial_config(&self) -> Option<SerialConfig> {
        self.port
            .as_ref()
            .map(|port| SerialConfig::new(port.clone()).baud_rate(self.baud_rate))
    }

    /// Returns the bytes to put on the wire.
    #[must_use]
    pub fn wire_bytes(&self) -> Vec<u8> {
        let mut bytes = self.text.clone().into_bytes();
        if self.line_end {
            bytes.extend_from_slice(LINE_END.as_bytes());
        }
        bytes
    }

    /// Checks the request invariants.
    pub fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(Error::InvalidRequest {
                reason: "timeout must be greater than zero".into(),
            });
        }
        if self.listen {
            if self.sink.is_none() {
                return Err(Error::InvalidRequest {
                    reason: "listen mode needs a sink".into(),
                });
            }
        } else if self.text.is_empty() {
            return Err(Error::InvalidRequest {
                reason: "command text is empty".into(),
            });
        }
        Ok(())
    }
}

/// Outcome of a single command.
///
/// The lines received so far are kept even when the command failed.
#[derive(Debug, Default)]
pub struct CommandResult {
    /// Trimmed, non-empty lines in arrival order.
    pub lines: Vec<String>,
    /// `None` on success.
    pub failure: Option<Error>,
}

impl CommandResult {
    /// Creates a successful result.
    #[must_use]
    pub const fn success(lines: Vec<String>) -> Self {
        Self {
            lines,
            failure: None,
        }
    }

    /// Creates a failed result that still carries the lines received.
    #[must_use]
    pub const fn failed(lines: Vec<String>, failure: Error) -> Self {
        Self {
            lines,
            failure: Some(failure),
        }
    }

    /// Returns true if the command succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Converts into a plain `Result`, dropping the lines on failure.
    pub fn into_result(self) -> Result<Vec<String>> {
        match self.failure {
            None => Ok(self.lines),
            Some(err) => Err(err),
        }
    }

    /// Returns the payload between the echo of `command` and `OK`.
    ///
    /// See [`extract_payload`] for the prefix semantics.
    pub fn payload(&self, command: &str, prefix: &str) -> Result<Vec<String>> {
        extract_payload(&self.lines, command, prefix)
    }
}
