//! Line-oriented decoding of streamed HTTP bodies.
//!
//! Server-sent events (Gemini, OpenAI) and NDJSON (Ollama) are both line
//! protocols. Network chunks can split a line anywhere, so bytes are buffered
//! until a full line is available before it is decoded.

use std::collections::VecDeque;
use std::fmt::Display;

use futures::stream::{self, BoxStream, Stream, StreamExt};

use quizsmith_core::traits::FragmentStream;

use crate::error::ProviderError;

/// What a decoded line contributes to the fragment stream.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Frame {
    /// A text fragment.
    Text(String),
    /// Nothing (keep-alives, empty deltas, event names).
    Skip,
    /// The server signalled the end of the response.
    Done,
}

/// Accumulates bytes and hands out complete lines.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    /// Append a chunk and return every line it completed, without terminators.
    pub(crate) fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(decode_line(&line[..line.len() - 1]));
        }
        lines
    }

    /// Whatever is left once the body ends.
    pub(crate) fn finish(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let rest = std::mem::take(&mut self.pending);
        Some(decode_line(&rest))
    }
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

/// Payload of an SSE `data:` line, or `None` for any other line.
pub(crate) fn sse_data(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

type Decoder = Box<dyn Fn(&str) -> Result<Frame, ProviderError> + Send>;

struct DecodeState {
    body: BoxStream<'static, Result<Vec<u8>, String>>,
    lines: LineBuffer,
    decode: Decoder,
    ready: VecDeque<anyhow::Result<String>>,
    finished: bool,
}

impl DecodeState {
    fn handle(&mut self, line: &str) {
        if self.finished {
            return;
        }
        match (self.decode)(line) {
            Ok(Frame::Text(text)) => self.ready.push_back(Ok(text)),
            Ok(Frame::Skip) => {}
            Ok(Frame::Done) => self.finished = true,
            Err(e) => {
                self.ready.push_back(Err(e.into()));
                self.finished = true;
            }
        }
    }
}

/// Turn a streamed HTTP body into text fragments using a per-line decoder.
pub(crate) fn fragment_stream<S, B, E, F>(body: S, decode: F) -> FragmentStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]>,
    E: Display,
    F: Fn(&str) -> Result<Frame, ProviderError> + Send + 'static,
{
    let body = body
        .map(|chunk| chunk.map(|b| b.as_ref().to_vec()).map_err(|e| e.to_string()))
        .boxed();

    let state = DecodeState {
        body,
        lines: LineBuffer::default(),
        decode: Box::new(decode),
        ready: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.ready.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }
            match state.body.next().await {
                Some(Ok(chunk)) => {
                    for line in state.lines.push(&chunk) {
                        state.handle(&line);
                    }
                }
                Some(Err(e)) => {
                    state.finished = true;
                    return Some((Err(ProviderError::NetworkError(e).into()), state));
                }
                None => {
                    if let Some(rest) = state.lines.finish() {
                        state.handle(&rest);
                    }
                    state.finished = true;
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(parts: &[&'static str]) -> impl Stream<Item = Result<&'static [u8], String>> + Send {
        stream::iter(parts.iter().map(|p| Ok(p.as_bytes())).collect::<Vec<_>>())
    }

    fn data_decoder(line: &str) -> Result<Frame, ProviderError> {
        match sse_data(line) {
            Some("[DONE]") => Ok(Frame::Done),
            Some("bad") => Err(ProviderError::StreamDecode("bad".into())),
            Some(text) => Ok(Frame::Text(text.to_string())),
            None => Ok(Frame::Skip),
        }
    }

    async fn collect(stream: FragmentStream) -> Vec<Result<String, String>> {
        stream
            .map(|r| r.map_err(|e| e.to_string()))
            .collect()
            .await
    }

    #[test]
    fn line_buffer_joins_split_lines() {
        let mut buf = LineBuffer::default();
        assert!(buf.push(b"data: hel").is_empty());
        assert_eq!(buf.push(b"lo\r\ndata: x\n\nda"), vec!["data: hello", "data: x", ""]);
        assert_eq!(buf.finish(), Some("da".to_string()));
        assert_eq!(buf.finish(), None);
    }

    #[test]
    fn line_buffer_keeps_multibyte_chars_across_chunks() {
        let mut buf = LineBuffer::default();
        let text = "data: café\n".as_bytes();
        assert!(buf.push(&text[..10]).is_empty());
        assert_eq!(buf.push(&text[10..]), vec!["data: café"]);
    }

    #[tokio::test]
    async fn decodes_across_chunk_boundaries() {
        let body = chunks(&["data: Wh", "at\n\ndata: is\n", ": keep-alive\n\ndata: 2+2", "\n"]);
        let out = collect(fragment_stream(body, data_decoder)).await;
        assert_eq!(
            out,
            vec![Ok("What".into()), Ok("is".into()), Ok("2+2".into())]
        );
    }

    #[tokio::test]
    async fn stops_at_done() {
        let body = chunks(&["data: a\ndata: [DONE]\ndata: ignored\n"]);
        let out = collect(fragment_stream(body, data_decoder)).await;
        assert_eq!(out, vec![Ok("a".into())]);
    }

    #[tokio::test]
    async fn trailing_line_without_newline_is_decoded() {
        let body = chunks(&["data: a\ndata: tail"]);
        let out = collect(fragment_stream(body, data_decoder)).await;
        assert_eq!(out, vec![Ok("a".into()), Ok("tail".into())]);
    }

    #[tokio::test]
    async fn decode_error_ends_stream() {
        let body = chunks(&["data: a\ndata: bad\ndata: b\n"]);
        let out = collect(fragment_stream(body, data_decoder)).await;
        assert_eq!(out.len(), 2);
        assert!(out[1].as_ref().unwrap_err().contains("decode"));
    }

    #[tokio::test]
    async fn transport_error_ends_stream() {
        let body = stream::iter(vec![
            Ok(b"data: a\n".as_slice()),
            Err("connection reset".to_string()),
            Ok(b"data: b\n".as_slice()),
        ]);
        let out = collect(fragment_stream(body, data_decoder)).await;
        assert_eq!(out.len(), 2);
        assert!(out[1].as_ref().unwrap_err().contains("connection reset"));
    }
}
