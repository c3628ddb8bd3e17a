//! Main [`Atcom`] client implementation.
//!
//! This module provides the high-level [`Atcom`] client that combines
//! modem detection and the command engine into a single interface.

use crate::commands::CommandHandler;
use crate::detect::{Detector, Shell, SystemShell};
use crate::error::{Error, Result};
use crate::transport::{NativeSerial, Serial};
use crate::types::{CommandRequest, CommandResult, DetectedPort};

/// Client for talking to a cellular modem with AT commands.
///
/// Requests without a port are sent to the AT port of the detected modem.
pub struct Atcom<P = NativeSerial, S = SystemShell> {
    commands: CommandHandler<P>,
    detector: Detector<S>,
}

impl Atcom {
    /// Creates a client that uses real serial ports and system tools.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_parts(NativeSerial, SystemShell)
    }
}

impl Default for Atcom {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Serial, S: Shell> Atcom<P, S> {
    /// Creates a client from a serial opener and a shell.
    #[must_use]
    pub const fn with_parts(serial: P, shell: S) -> Self {
        Self::with_detector(serial, Detector::with_shell(shell))
    }

    /// Creates a client around a preconfigured detector.
    #[must_use]
    pub const fn with_detector(serial: P, detector: Detector<S>) -> Self {
        Self {
            commands: CommandHandler::new(serial),
            detector,
        }
    }

    /// Returns the command handler for direct command access.
    #[must_use]
    pub const fn commands(&self) -> &CommandHandler<P> {
        &self.commands
    }

    /// Returns the modem detector.
    #[must_use]
    pub const fn detector(&self) -> &Detector<S> {
        &self.detector
    }

    /// Detects the AT port of the attached modem.
    pub async fn decide_port(&self) -> Result<Option<DetectedPort>> {
        self.detector.detect_port().await
    }

    /// Sends a command, detecting the port first if the request has none.
    pub async fn send(&self, mut request: CommandRequest) -> CommandResult {
        if let Err(e) = request.validate() {
            return CommandResult::failed(Vec::new(), e);
        }

        if request.port.is_none() {
            match self.decide_port().await {
                Ok(Some(detected)) => request.port = Some(detected.port),
                Ok(None) => return CommandResult::failed(Vec::new(), Error::NoPortSelected),
                Err(e) => return CommandResult::failed(Vec::new(), e),
            }
        }

        self.commands.send(request).await
    }

    /// Sends `text` and returns the response lines.
    pub async fn send_at(&self, text: &str) -> Result<Vec<String>> {
        self.send(CommandRequest::new(text)).await.into_result()
    }
}
