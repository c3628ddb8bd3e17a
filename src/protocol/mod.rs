//! Protocol definitions for AT command communication.
//!
//! This module contains the text-level protocol pieces:
//! - Line decoding of the raw byte stream
//! - Terminal status line classification
//! - Payload extraction from finished responses

pub mod lines;
pub mod payload;
pub mod status;

pub use lines::{LineDecoder, split_lines};
pub use payload::extract_payload;
pub use status::{CME_ERROR, CMS_ERROR, ERROR, OK, StatusLine};
