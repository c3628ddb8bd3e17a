//! Data types for AT command exchanges and modem detection.
//!
//! This module contains the core data structures used throughout the library:
//! - Command requests and results
//! - Modem descriptors and detected ports

pub mod modem;
pub mod request;

pub use modem::{DetectedPort, ModemDescriptor, UsbSerialNode};
pub use request::{CommandRequest, CommandResult, DEFAULT_TIMEOUT, LINE_END};
