//! Line decoding for the AT command protocol.
//!
//! Modems terminate lines with `\r\n`, but echoes commonly end in a bare
//! `\r` (`AT+COPS?\r\r\n`). Both CR and LF are treated as terminators, and
//! the resulting empty lines are dropped:
//! ```text
//! "AT+COPS?\r\r\n+COPS: 0\r\n\r\nOK\r\n"  =>  ["AT+COPS?", "+COPS: 0", "OK"]
//! ```

use bytes::BytesMut;

/// Returns true if the byte ends a line.
const fn is_line_end(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

/// Splits text into trimmed, non-empty lines.
#[must_use]
pub fn split_lines(text: &str) -> Vec<String> {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Accumulates raw bytes and hands out decoded lines.
///
/// The buffer keeps growing for the lifetime of a single command; the
/// decoder only tracks how many complete lines have already been handed
/// out so streaming consumers see each line once.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: BytesMut,
    emitted: usize,
}

impl LineDecoder {
    /// Creates a new line decoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
            emitted: 0,
        }
    }

    /// Feeds data into the decoder.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Returns all complete lines received so far.
    ///
    /// A trailing fragment without a terminator is not included.
    #[must_use]
    pub fn complete_lines(&self) -> Vec<String> {
        match self.buffer.iter().rposition(|&b| is_line_end(b)) {
            Some(end) => split_lines(&String::from_utf8_lossy(&self.buffer[..end])),
            None => Vec::new(),
        }
    }

    /// Returns every line received so far, including a trailing fragment.
    #[must_use]
    pub fn all_lines(&self) -> Vec<String> {
        split_lines(&self.text())
    }

    /// Returns complete lines that have not been returned by a previous call.
    pub fn take_new_lines(&mut self) -> Vec<String> {
        let lines = self.complete_lines();
        let fresh = lines.get(self.emitted..).unwrap_or_default().to_vec();
        self.emitted = lines.len();
        fresh
    }

    /// Returns the accumulated bytes as text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_trims_and_drops_empty() {
        let lines = split_lines("AT+COPS?\r\r\n+COPS: 0\r\n\r\nOK\r\n");
        assert_eq!(lines, vec!["AT+COPS?", "+COPS: 0", "OK"]);

        assert!(split_lines("\r\n\r\n").is_empty());
        assert_eq!(split_lines("  OK  "), vec!["OK"]);
    }

    #[test]
    fn test_complete_lines_ignore_fragment() {
        let mut decoder = LineDecoder::new();
        decoder.feed(b"\r\n+CSQ: 17,99\r\nO");

        assert_eq!(decoder.complete_lines(), vec!["+CSQ: 17,99"]);
        assert_eq!(decoder.all_lines(), vec!["+CSQ: 17,99", "O"]);

        decoder.feed(b"K\r\n");
        assert_eq!(decoder.complete_lines(), vec!["+CSQ: 17,99", "OK"]);
    }

    #[test]
    fn test_take_new_lines_hands_out_each_line_once() {
        let mut decoder = LineDecoder::new();

        decoder.feed(b"RDY\r\n+CPIN: RE");
        assert_eq!(decoder.take_new_lines(), vec!["RDY"]);
        assert!(decoder.take_new_lines().is_empty());

        decoder.feed(b"ADY\r\n\r\nOK\r\n");
        assert_eq!(decoder.take_new_lines(), vec!["+CPIN: READY", "OK"]);
        assert!(decoder.take_new_lines().is_empty());
        assert_eq!(decoder.text(), "RDY\r\n+CPIN: READY\r\n\r\nOK\r\n");
    }
}
