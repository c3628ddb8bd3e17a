//! Command/response engine.
//!
//! Each call to [`CommandHandler::send`] owns the serial line for its whole
//! duration:
//! 1. open the line and write the command,
//! 2. spawn a read worker that feeds a [`LineDecoder`] and classifies the
//!    lines after every read,
//! 3. race the worker against the deadline.
//!
//! The deadline starts before the write, so a stalled write is bounded too.
//! On timeout the worker is cancelled but not awaited; the lines it has
//! published so far are returned with the timeout.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::protocol::{LineDecoder, StatusLine};
use crate::transport::{Serial, SerialIo};
use crate::types::{CommandRequest, CommandResult};

/// Size of a single read from the serial line.
pub const READ_BUFFER_SIZE: usize = 1024;

/// Pause before polling again when the line had nothing to read.
pub const RETRY_PAUSE: Duration = Duration::from_millis(10);

/// Runs AT commands over lines opened by `P`.
pub struct CommandHandler<P> {
    serial: P,
}

impl<P: Serial> CommandHandler<P> {
    /// Creates a new command handler.
    #[must_use]
    pub const fn new(serial: P) -> Self {
        Self { serial }
    }

    /// Returns the serial opener.
    #[must_use]
    pub const fn serial(&self) -> &P {
        &self.serial
    }

    /// Sends a command and waits for its response.
    ///
    /// Never fails outright: every failure is reported in
    /// [`CommandResult::failure`] next to the lines received before it.
    pub async fn send(&self, request: CommandRequest) -> CommandResult {
        if let Err(e) = request.validate() {
            return CommandResult::failed(Vec::new(), e);
        }
        let Some(config) = request.serial_config() else {
            return CommandResult::failed(Vec::new(), Error::NoPortSelected);
        };
        let timeout = request.timeout;
        let deadline = Instant::now() + timeout;

        let mut port = match self.serial.open(&config) {
            Ok(port) => port,
            Err(e) => {
                tracing::debug!("open failed: {}", e);
                return CommandResult::failed(Vec::new(), e);
            }
        };

        if !request.listen {
            tracing::debug!("sending {:?} to {}", request.text, config.port);
            let bytes = request.wire_bytes();
            match tokio::time::timeout_at(deadline, write_command(&mut *port, &bytes)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!("write failed: {}", e);
                    return CommandResult::failed(Vec::new(), Error::WriteFailed(e));
                }
                Err(_) => {
                    tracing::debug!("write stalled for {:?}", timeout);
                    return CommandResult::failed(Vec::new(), timeout_error(timeout));
                }
            }
        }

        let streaming = request.is_streaming();
        let (progress_tx, progress_rx) = watch::channel(Vec::new());
        let cancel = CancellationToken::new();

        let scanner = Scanner::new(&request, progress_tx);
        let worker = tokio::spawn(scanner.run(port, cancel.clone()));

        tokio::select! {
            biased;
            joined = worker => match joined {
                Ok(Some(result)) => result,
                Ok(None) => timed_out(progress_rx.borrow().clone(), timeout, streaming),
                Err(e) => CommandResult::failed(
                    progress_rx.borrow().clone(),
                    Error::Task(e.to_string()),
                ),
            },
            () = tokio::time::sleep_until(deadline) => {
                cancel.cancel();
                timed_out(progress_rx.borrow().clone(), timeout, streaming)
            }
        }
    }
}

/// Builds the result for a scan that ran out of time.
///
/// A streaming scan always ends this way and reports no failure.
fn timed_out(lines: Vec<String>, timeout: Duration, streaming: bool) -> CommandResult {
    if streaming {
        tracing::debug!("listening ended after {:?}", timeout);
        return CommandResult::success(lines);
    }

    tracing::debug!("timeout after {:?} with {} line(s)", timeout, lines.len());
    CommandResult::failed(lines, timeout_error(timeout))
}

fn timeout_error(timeout: Duration) -> Error {
    Error::Timeout {
        timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
    }
}

async fn write_command(port: &mut dyn SerialIo, bytes: &[u8]) -> io::Result<()> {
    tracing::trace!("writing {} bytes: {}", bytes.len(), hex::encode(bytes));
    port.write_all(bytes).await?;
    port.flush().await
}

/// Errors after which the read is simply retried.
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

/// State of a scan after the latest read.
#[derive(Debug)]
enum Verdict {
    /// Keep reading.
    Pending,
    /// The exchange is over; `None` means success.
    Done(Option<Error>),
}

/// Desired and fault markers of a request.
#[derive(Debug, Clone, Default)]
struct Markers {
    command: String,
    desired: Vec<String>,
    fault: Vec<String>,
}

impl Markers {
    fn first_match<'a>(markers: &'a [String], text: &str) -> Option<&'a String> {
        markers.iter().find(|marker| text.contains(marker.as_str()))
    }

    /// Classifies the complete lines received so far.
    ///
    /// The first terminal status line decides the outcome. Before one
    /// arrives, a fault or desired marker ends the exchange early.
    fn classify(&self, lines: &[String]) -> Verdict {
        let terminal = lines
            .iter()
            .map(|line| (StatusLine::classify(line), line))
            .find(|(status, _)| status.is_terminal());

        match terminal {
            Some((StatusLine::Error, line)) => {
                Verdict::Done(Some(Error::ProtocolError { line: line.clone() }))
            }
            Some(_) => Verdict::Done(self.check_response(&Self::response_text(lines, None))),
            None => {
                let text = Self::response_text(lines, Some(self.command.as_str()));
                self.check_early(&text)
            }
        }
    }

    /// Joins the data lines, leaving out status lines and the echo of `echo`.
    fn response_text(lines: &[String], echo: Option<&str>) -> String {
        lines
            .iter()
            .filter(|line| !StatusLine::classify(line).is_terminal())
            .filter(|line| echo.is_none_or(|echo| echo.is_empty() || line.as_str() != echo))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Applies the markers to a response that ended with `OK`.
    ///
    /// A fault marker wins over a desired marker.
    fn check_response(&self, text: &str) -> Option<Error> {
        if let Some(marker) = Self::first_match(&self.fault, text) {
            return Some(Error::FaultMarkerMatched {
                marker: marker.clone(),
            });
        }
        if self.desired.is_empty() || Self::first_match(&self.desired, text).is_some() {
            None
        } else {
            Some(Error::DesiredMarkerNotFound)
        }
    }

    /// Applies the markers to a response still waiting for its status line.
    fn check_early(&self, text: &str) -> Verdict {
        if let Some(marker) = Self::first_match(&self.fault, text) {
            return Verdict::Done(Some(Error::FaultMarkerMatched {
                marker: marker.clone(),
            }));
        }
        if Self::first_match(&self.desired, text).is_some() {
            return Verdict::Done(None);
        }
        Verdict::Pending
    }
}

/// The read worker of a single command.
struct Scanner {
    markers: Markers,
    decoder: LineDecoder,
    sink: Option<mpsc::Sender<String>>,
    progress: watch::Sender<Vec<String>>,
}

impl Scanner {
    fn new(request: &CommandRequest, progress: watch::Sender<Vec<String>>) -> Self {
        Self {
            markers: Markers {
                command: request.text.trim().to_owned(),
                desired: request.desired.clone(),
                fault: request.fault.clone(),
            },
            decoder: LineDecoder::new(),
            sink: request.sink.clone(),
            progress,
        }
    }

    /// Reads until the exchange is classified, the line fails, or `cancel`
    /// fires. Returns `None` when cancelled. The port is closed on return.
    async fn run(
        mut self,
        mut port: Box<dyn SerialIo>,
        cancel: CancellationToken,
    ) -> Option<CommandResult> {
        let mut buf = [0u8; READ_BUFFER_SIZE];

        loop {
            let read = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!("scan cancelled");
                    return None;
                }
                read = port.read(&mut buf) => read,
            };

            match read {
                Ok(0) => {}
                Ok(n) => {
                    tracing::trace!("received {} bytes: {}", n, hex::encode(&buf[..n]));
                    self.decoder.feed(&buf[..n]);

                    match self.step(&cancel).await {
                        None => {
                            tracing::debug!("scan cancelled while forwarding");
                            return None;
                        }
                        Some(Verdict::Done(failure)) => {
                            let lines = self.decoder.all_lines();
                            match &failure {
                                Some(e) => tracing::debug!("command failed: {}", e),
                                None => {
                                    tracing::debug!("command completed with {} line(s)", lines.len());
                                }
                            }
                            return Some(CommandResult { lines, failure });
                        }
                        Some(Verdict::Pending) => continue,
                    }
                }
                Err(e) if is_transient(&e) => {}
                Err(e) => {
                    tracing::error!("serial read error: {}", e);
                    return Some(CommandResult::failed(
                        self.decoder.all_lines(),
                        Error::ReadFailed(e),
                    ));
                }
            }

            // Nothing to read yet
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::debug!("scan cancelled");
                    return None;
                }
                () = tokio::time::sleep(RETRY_PAUSE) => {}
            }
        }
    }

    /// Publishes progress, forwards new lines, and classifies.
    ///
    /// Returns `None` when `cancel` fires while waiting on a full sink.
    async fn step(&mut self, cancel: &CancellationToken) -> Option<Verdict> {
        self.progress.send_replace(self.decoder.all_lines());

        if let Some(sink) = &self.sink {
            let mut closed = false;
            for line in self.decoder.take_new_lines() {
                let sent = tokio::select! {
                    biased;
                    () = cancel.cancelled() => return None,
                    sent = sink.send(line) => sent,
                };
                if sent.is_err() {
                    closed = true;
                    break;
                }
            }
            if closed {
                tracing::debug!("line receiver dropped");
                self.sink = None;
            }
        }

        Some(self.markers.classify(&self.decoder.complete_lines()))
    }
}
