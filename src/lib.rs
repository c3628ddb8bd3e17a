//! # atcom
//!
//! A Rust library for talking to cellular modems with AT commands.
//!
//! This library sends AT commands over USB/Serial, waits for the modem's
//! final result code, and finds the modem's AT port on its own.
//!
//! ## Features
//!
//! - Async/await based API using Tokio
//! - Desired/fault markers that reclassify a response by its content
//! - Streaming mode for unsolicited result codes
//! - USB modem detection through `lsusb` and udev
//! - Failures always come with the lines received so far
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use atcom::{Atcom, CommandRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), atcom::Error> {
//!     let client = Atcom::new();
//!
//!     // Registration status, port detected automatically
//!     let request = CommandRequest::new("AT+CREG?").timeout(Duration::from_secs(5));
//!
//!     let result = client.send(request).await;
//!     for line in result.payload("AT+CREG?", "+CREG: ")? {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`protocol`] - Line decoding, status lines and payload extraction
//! - [`types`] - Requests, results and modem descriptors
//! - [`transport`] - Serial line abstraction and the `tokio-serial` backend
//! - [`detect`] - USB modem detection
//! - [`commands`] - The command/response engine
//! - [`client`] - High-level [`Atcom`] client

pub mod client;
pub mod commands;
pub mod detect;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use client::Atcom;
pub use commands::CommandHandler;
pub use detect::{Detector, SUPPORTED_MODEMS, Shell, SystemShell};
pub use error::{Error, Result};
pub use protocol::{StatusLine, extract_payload};
pub use transport::{NativeSerial, Serial, SerialConfig, SerialIo};
pub use types::{CommandRequest, CommandResult, DetectedPort, ModemDescriptor, UsbSerialNode};
