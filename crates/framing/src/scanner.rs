use core_types::Line;

/// Buffers raw serial chunks and emits one `Line` per `\n` encountered.
///
/// Line payloads are decoded as UTF-8 (lossily, so a corrupt byte cannot
/// poison the stream) and trimmed of surrounding ASCII whitespace, which
/// also strips the `\r` of CRLF endings. Empty lines are dropped.
///
/// There is no cap on buffered bytes: a stream that never sends a newline
/// grows the buffer unboundedly.
pub struct LineScanner {
    buffer: Vec<u8>,
    // Timestamp of the first byte currently in the buffer, so a line split
    // across chunks reports when it *started* arriving.
    start_timestamp_us: Option<u64>,
}

impl LineScanner {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(1024),
            start_timestamp_us: None,
        }
    }

    /// Ingest a chunk and return any complete lines it finishes, in order.
    pub fn push(&mut self, bytes: &[u8], timestamp_us: u64) -> Vec<Line> {
        let mut lines = Vec::new();

        if self.buffer.is_empty() {
            self.start_timestamp_us = Some(timestamp_us);
        }

        for &b in bytes {
            if b == b'\n' {
                let ts = self.start_timestamp_us.unwrap_or(timestamp_us);
                let text = String::from_utf8_lossy(&self.buffer);
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    lines.push(Line::new(trimmed, ts));
                }
                self.buffer.clear();
                // Bytes after this newline (if any) start a new line within
                // the same chunk; per-chunk timing is the best we have.
                self.start_timestamp_us = None;
            } else {
                self.buffer.push(b);
            }
        }

        if !self.buffer.is_empty() && self.start_timestamp_us.is_none() {
            self.start_timestamp_us = Some(timestamp_us);
        }

        lines
    }

    /// Discard any partially accumulated line, e.g. when a session ends.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.start_timestamp_us = None;
    }
}

impl Default for LineScanner {
    fn default() -> Self {
        Self::new()
    }
}
