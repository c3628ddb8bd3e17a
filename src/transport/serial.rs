//! Serial/USB transport implementation.
//!
//! This module provides serial port access for modems connected via USB.

use std::io;

use tokio_serial::SerialPortBuilderExt;

use crate::error::{Error, Result};
use crate::transport::{Serial, SerialIo};

/// Default baud rate for cellular modems.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Configuration for a serial line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Serial port path (e.g., "/dev/ttyUSB2" or "COM3").
    pub port: String,
    /// Baud rate.
    pub baud_rate: u32,
}

impl SerialConfig {
    /// Creates a new serial configuration with default settings.
    #[must_use]
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }

    /// Sets the baud rate.
    #[must_use]
    pub const fn baud_rate(mut self, rate: u32) -> Self {
        self.baud_rate = rate;
        self
    }
}

/// Opens real serial ports through `tokio-serial`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSerial;

impl Serial for NativeSerial {
    fn open(&self, config: &SerialConfig) -> Result<Box<dyn SerialIo>> {
        tracing::info!(
            "opening serial port {} at {} baud",
            config.port,
            config.baud_rate
        );

        let stream = tokio_serial::new(&config.port, config.baud_rate)
            .open_native_async()
            .map_err(|e| Error::PortOpenFailed {
                port: config.port.clone(),
                source: io::Error::from(e),
            })?;

        Ok(Box::new(stream))
    }
}
