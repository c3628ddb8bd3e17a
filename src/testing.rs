//! Deterministic stand-ins for the serial line and the shell.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, DuplexStream, ReadBuf};

use crate::detect::Shell;
use crate::error::{Error, Result};
use crate::transport::{Serial, SerialConfig, SerialIo};

/// Installs a test subscriber once; enable output with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// What the next `open` call hands out.
pub enum FakeLine {
    /// The device end of an in-memory duplex pipe.
    Duplex(DuplexStream),
    /// A line whose writes fail.
    BrokenWrite,
    /// A line whose reads fail.
    BrokenRead,
    /// Opening fails.
    Missing,
}

/// Serial opener that hands out a single prepared line.
pub struct FakeSerial {
    line: Mutex<Option<FakeLine>>,
    opened: Mutex<Vec<SerialConfig>>,
}

impl FakeSerial {
    pub fn new(line: FakeLine) -> Self {
        Self {
            line: Mutex::new(Some(line)),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Creates a serial fake backed by a duplex pipe and returns the modem end.
    pub fn duplex() -> (Self, DuplexStream) {
        Self::with_capacity(4096)
    }

    /// Like [`FakeSerial::duplex`], with `capacity` bytes of buffering in
    /// each direction.
    pub fn with_capacity(capacity: usize) -> (Self, DuplexStream) {
        let (host, modem) = tokio::io::duplex(capacity);
        (Self::new(FakeLine::Duplex(host)), modem)
    }

    /// Returns every configuration `open` was called with.
    pub fn opened(&self) -> Vec<SerialConfig> {
        self.opened.lock().unwrap().clone()
    }
}

impl Serial for FakeSerial {
    fn open(&self, config: &SerialConfig) -> Result<Box<dyn SerialIo>> {
        self.opened.lock().unwrap().push(config.clone());

        match self.line.lock().unwrap().take() {
            Some(FakeLine::Duplex(stream)) => Ok(Box::new(stream)),
            Some(FakeLine::BrokenWrite) => Ok(Box::new(BrokenLine { fail_reads: false })),
            Some(FakeLine::BrokenRead) => Ok(Box::new(BrokenLine { fail_reads: true })),
            Some(FakeLine::Missing) | None => Err(Error::PortOpenFailed {
                port: config.port.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such device"),
            }),
        }
    }
}

/// A line that fails either its reads or its writes.
struct BrokenLine {
    fail_reads: bool,
}

impl AsyncRead for BrokenLine {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if self.fail_reads {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged")))
        } else {
            Poll::Pending
        }
    }
}

impl AsyncWrite for BrokenLine {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        if self.fail_reads {
            Poll::Ready(Ok(buf.len()))
        } else {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "write refused")))
        }
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

/// Shell that answers from a table keyed by the full command line.
///
/// Unknown commands produce empty output.
#[derive(Default)]
pub struct FakeShell {
    responses: HashMap<String, std::result::Result<String, String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `command` with `output`.
    #[must_use]
    pub fn with(mut self, command: &str, output: &str) -> Self {
        self.responses
            .insert(command.to_owned(), Ok(output.to_owned()));
        self
    }

    /// Makes `command` fail with `reason`.
    #[must_use]
    pub fn failing(mut self, command: &str, reason: &str) -> Self {
        self.responses
            .insert(command.to_owned(), Err(reason.to_owned()));
        self
    }

    /// Returns the command lines run so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Shell for FakeShell {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [&'a str],
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let command = if args.is_empty() {
                program.to_owned()
            } else {
                format!("{program} {}", args.join(" "))
            };
            self.calls.lock().unwrap().push(command.clone());

            match self.responses.get(&command) {
                Some(Ok(output)) => Ok(output.clone()),
                Some(Err(reason)) => Err(Error::Shell {
                    program: program.to_owned(),
                    reason: reason.clone(),
                }),
                None => Ok(String::new()),
            }
        })
    }
}

/// `lsusb` output with an EC25 attached.
pub const LSUSB_EC25: &str = "
Bus 001 Device 002: ID 2c7c:0125 Quectel Wireless Solutions Co., Ltd. EC25 LTE modem
Bus 001 Device 001: ID 1d6b:0002 Linux Foundation 2.0 root hub
Bus 002 Device 001: ID 1d6b:0003 Linux Foundation 3.0 root hub";

/// `lsusb` output with only root hubs.
pub const LSUSB_EMPTY: &str = "
Bus 001 Device 001: ID 1d6b:0002 Linux Foundation 2.0 root hub
Bus 002 Device 001: ID 1d6b:0003 Linux Foundation 3.0 root hub";

/// `find` output for an EC25 exposing four ttyUSB ports.
pub const FIND_EC25: &str = "
/sys/bus/usb/devices/usb1/dev
/sys/bus/usb/devices/usb1/1-2/1-2:1.2/ttyUSB2/tty/ttyUSB2/dev
/sys/bus/usb/devices/usb1/1-2/1-2:1.0/ttyUSB0/tty/ttyUSB0/dev
/sys/bus/usb/devices/usb1/1-2/1-2:1.3/ttyUSB3/tty/ttyUSB3/dev";

/// Builds `udevadm` property output for an EC25 port.
pub fn udev_ec25(tty: &str, interface: &str) -> String {
    format!(
        "DEVNAME='/dev/{tty}'
SUBSYSTEM='tty'
ID_MODEL='EG25-G'
ID_MODEL_ID='0125'
ID_VENDOR='Quectel'
ID_VENDOR_ID='2c7c'
ID_USB_INTERFACE_NUM='{interface}'
ID_MODEL_FROM_DATABASE='EC25 LTE modem'"
    )
}

/// Command line of the `find` step.
pub const FIND_COMMAND: &str = "bash -c /usr/bin/find /sys/bus/usb/devices/usb*/ -name dev";

/// Command line of the `udevadm` step for `dir`.
pub fn udev_command(dir: &str) -> String {
    format!("udevadm info -q property --export -p {dir}")
}

/// A shell describing an attached EC25 whose AT port is `ttyUSB2`.
pub fn ec25_shell() -> FakeShell {
    let base = "/sys/bus/usb/devices/usb1/1-2";
    FakeShell::new()
        .with("lsusb", LSUSB_EC25)
        .with(FIND_COMMAND, FIND_EC25)
        .with(
            &udev_command("/sys/bus/usb/devices/usb1"),
            "DEVNAME='/dev/bus/usb/001/001'\nID_VENDOR_ID='1d6b'",
        )
        .with(
            &udev_command(&format!("{base}/1-2:1.0/ttyUSB0/tty/ttyUSB0")),
            &udev_ec25("ttyUSB0", "00"),
        )
        .with(
            &udev_command(&format!("{base}/1-2:1.2/ttyUSB2/tty/ttyUSB2")),
            &udev_ec25("ttyUSB2", "02"),
        )
        .with(
            &udev_command(&format!("{base}/1-2:1.3/ttyUSB3/tty/ttyUSB3")),
            &udev_ec25("ttyUSB3", "03"),
        )
}
