//! Newline framing for the byte stream.
//!
//! Input arrives in arbitrary-sized chunks that need not align with message
//! boundaries. `LineFramer` buffers the partial tail across chunks and emits
//! each complete newline-terminated record; JSON parsing happens a layer up
//! so one malformed line cannot take the stream down.

/// Splits a chunked byte stream into complete lines.
#[derive(Debug, Default)]
pub struct LineFramer {
    buffer: Vec<u8>,
}

impl LineFramer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every line completed by it.
    ///
    /// A trailing carriage return is stripped from each line and lines that
    /// are empty or all-whitespace are skipped. Bytes after the last newline
    /// stay buffered for the next chunk.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        for i in 0..self.buffer.len() {
            if self.buffer[i] != b'\n' {
                continue;
            }
            let mut line = &self.buffer[start..i];
            if line.ends_with(b"\r") {
                line = &line[..line.len() - 1];
            }
            let line = String::from_utf8_lossy(line);
            if !line.trim().is_empty() {
                lines.push(line.into_owned());
            }
            start = i + 1;
        }
        self.buffer.drain(..start);

        lines
    }

    /// True if no partial line is buffered.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_complete_line() {
        let mut framer = LineFramer::new();
        let lines = framer.push(b"{\"id\":1}\n");
        assert_eq!(lines, ["{\"id\":1}"]);
        assert!(framer.is_empty());
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut framer = LineFramer::new();
        let lines = framer.push(b"one\ntwo\nthree\n");
        assert_eq!(lines, ["one", "two", "three"]);
    }

    #[test]
    fn test_split_across_chunks() {
        let mut framer = LineFramer::new();
        let first = framer.push(b"{\"id\":1,\"method\":\"x\"}\n{\"i");
        assert_eq!(first, ["{\"id\":1,\"method\":\"x\"}"]);
        assert!(!framer.is_empty());

        let second = framer.push(b"d\":2,\"method\":\"y\"}\n");
        assert_eq!(second, ["{\"id\":2,\"method\":\"y\"}"]);
        assert!(framer.is_empty());
    }

    #[test]
    fn test_chunk_split_inside_utf8_sequence() {
        let mut framer = LineFramer::new();
        let bytes = "héllo\n".as_bytes();
        assert!(framer.push(&bytes[..3]).is_empty());
        let lines = framer.push(&bytes[3..]);
        assert_eq!(lines, ["héllo"]);
    }

    #[test]
    fn test_crlf_stripped() {
        let mut framer = LineFramer::new();
        let lines = framer.push(b"hello\r\nworld\r\n");
        assert_eq!(lines, ["hello", "world"]);
    }

    #[test]
    fn test_blank_lines_skipped() {
        let mut framer = LineFramer::new();
        let lines = framer.push(b"\n  \n\r\nreal\n\n");
        assert_eq!(lines, ["real"]);
    }

    #[test]
    fn test_no_newline_buffers_everything() {
        let mut framer = LineFramer::new();
        assert!(framer.push(b"partial with no end").is_empty());
        assert!(!framer.is_empty());
        let lines = framer.push(b"\n");
        assert_eq!(lines, ["partial with no end"]);
    }
}
