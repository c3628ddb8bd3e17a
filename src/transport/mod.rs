//! Transport layer for AT command communication.
//!
//! The engine never touches a device directly; it asks a [`Serial`]
//! implementation to open a line and then talks to the returned
//! [`SerialIo`] handle. Closing the line is dropping the handle.

pub mod serial;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::Result;

/// An open, bidirectional serial line.
pub trait SerialIo: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> SerialIo for T {}

/// Trait for opening serial lines.
pub trait Serial: Send + Sync {
    /// Opens the line described by `config`.
    fn open(&self, config: &SerialConfig) -> Result<Box<dyn SerialIo>>;
}

pub use serial::{DEFAULT_BAUD_RATE, NativeSerial, SerialConfig};
