//! Line framing for `data: <json>` server-sent event bodies.
//!
//! Bytes are buffered until a full line is available, so payloads and
//! multi-byte characters split across network chunks decode correctly.
//!
//! ```rust
//! use pprovider::sse::{SseDecoder, SseFrame};
//!
//! let mut decoder = SseDecoder::new();
//! assert!(decoder.push(b"data: {\"a\"").is_empty());
//! assert_eq!(
//!     decoder.push(b":1}\n\ndata: [DONE]\n"),
//!     vec![SseFrame::Data("{\"a\":1}".into()), SseFrame::Data("[DONE]".into())]
//! );
//! ```

pub const DONE_SENTINEL: &str = "[DONE]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    Data(String),
    /// A `data:` line that was not valid UTF-8.
    Invalid(String),
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(bytes);

        let mut frames = Vec::new();
        while let Some(newline_index) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let line = self.buffer.drain(..=newline_index).collect::<Vec<_>>();
            if let Some(frame) = decode_line(&line) {
                frames.push(frame);
            }
        }

        frames
    }

    /// Flushes a trailing line that never received its newline.
    pub fn finish(&mut self) -> Option<SseFrame> {
        let line = std::mem::take(&mut self.buffer);
        decode_line(&line)
    }
}

fn decode_line(line: &[u8]) -> Option<SseFrame> {
    let line = line.trim_ascii();
    let payload = line.strip_prefix(b"data:")?.trim_ascii();

    Some(match std::str::from_utf8(payload) {
        Ok(text) => SseFrame::Data(text.to_string()),
        Err(error) => SseFrame::Invalid(error.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_non_data_lines() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(
            b"event: content_block_delta\r\n: keep-alive\r\nid: 7\r\ndata: {\"x\":1}\r\n\r\n",
        );

        assert_eq!(frames, vec![SseFrame::Data("{\"x\":1}".to_string())]);
    }

    #[test]
    fn reassembles_utf8_split_across_chunks() {
        let line = "data: {\"text\":\"caf\u{e9} \u{1f44b}\"}\n".as_bytes();
        let mut decoder = SseDecoder::new();
        let mut frames = Vec::new();
        for byte in line {
            frames.extend(decoder.push(std::slice::from_ref(byte)));
        }

        assert_eq!(
            frames,
            vec![SseFrame::Data("{\"text\":\"caf\u{e9} \u{1f44b}\"}".to_string())]
        );
    }

    #[test]
    fn reports_invalid_utf8_and_flushes_trailing_line() {
        let mut decoder = SseDecoder::new();
        let frames = decoder.push(b"data: \xff\xfe\ndata: tail");

        assert!(matches!(frames.as_slice(), [SseFrame::Invalid(_)]));
        assert_eq!(decoder.finish(), Some(SseFrame::Data("tail".to_string())));
        assert_eq!(decoder.finish(), None);
    }
}
