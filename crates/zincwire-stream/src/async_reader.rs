use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use zincwire_value::{from_json, EnumRegistry, Value};

use crate::error::{error_from_message, ErrorMapper, Result, StreamError};
use crate::message::{classify, tracing_sink, Classified, DiagnosticSink};

/// Default bound on a single read step: 64 KiB.
pub const DEFAULT_READ_LIMIT: usize = 64 * 1024;

/// Configuration for [`AsyncMessageReader`].
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Maximum bytes pulled from the source in one read step.
    ///
    /// A line longer than this is not an error: it accumulates across as
    /// many bounded reads as it takes until its newline arrives. The
    /// limit bounds the per-step allocation, not the message size.
    pub read_limit: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            read_limit: DEFAULT_READ_LIMIT,
        }
    }
}

/// Decodes newline-delimited messages from an incremental byte source.
///
/// Same classification and decode behavior as
/// [`MessageReader`](crate::MessageReader), but suspends while waiting
/// for more bytes instead of requiring a pre-read buffer. Bytes are only
/// requested when the consumer awaits the next message, so backpressure
/// falls out naturally, and dropping the reader at any point is the only
/// teardown needed.
pub struct AsyncMessageReader<R, S = fn(&str)> {
    inner: R,
    pending: BytesMut,
    chunk: Box<[u8]>,
    // Bytes of `pending` already scanned for a newline.
    scanned: usize,
    sink: S,
    mapper: ErrorMapper,
    eof: bool,
    failed: bool,
}

impl<R: AsyncRead + Unpin> AsyncMessageReader<R, fn(&str)> {
    /// Read messages from `inner` with default configuration, logging
    /// warnings through `tracing`.
    pub fn new(inner: R) -> Self {
        Self::with_config(inner, StreamConfig::default(), tracing_sink)
    }
}

impl<R: AsyncRead + Unpin, S: DiagnosticSink> AsyncMessageReader<R, S> {
    /// Read messages with explicit configuration and diagnostic sink.
    pub fn with_config(inner: R, config: StreamConfig, sink: S) -> Self {
        Self {
            inner,
            pending: BytesMut::new(),
            chunk: vec![0u8; config.read_limit.max(1)].into_boxed_slice(),
            scanned: 0,
            sink,
            mapper: error_from_message,
            eof: false,
            failed: false,
        }
    }

    /// Replace the error-mapping collaborator.
    pub fn with_error_mapper(mut self, mapper: ErrorMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Await the next decoded data message.
    ///
    /// Returns `Ok(None)` at end of stream; trailing bytes without a
    /// terminating newline are discarded, mirroring the framing contract
    /// that every message is newline-terminated. The registry is passed
    /// per call so entries added after message N-1 apply to message N.
    /// After a fatal error every further call returns `Ok(None)`.
    pub async fn next_message(&mut self, registry: &EnumRegistry) -> Result<Option<Value>> {
        if self.failed {
            return Ok(None);
        }
        loop {
            while let Some(offset) = self.pending[self.scanned..]
                .iter()
                .position(|&b| b == b'\n')
            {
                let line = self.pending.split_to(self.scanned + offset + 1);
                self.scanned = 0;

                let line = line[..line.len() - 1].trim_ascii();
                if line.is_empty() {
                    continue;
                }
                if let Some(step) = self.dispatch_line(line, registry)? {
                    return Ok(Some(step));
                }
            }
            self.scanned = self.pending.len();

            if self.eof {
                if !self.pending.is_empty() {
                    tracing::debug!(
                        bytes = self.pending.len(),
                        "discarding unterminated trailing bytes at end of stream"
                    );
                    self.pending.clear();
                    self.scanned = 0;
                }
                return Ok(None);
            }

            // Bounded accumulation step: at most `read_limit` bytes are
            // appended per wait, however long the line turns out to be.
            let read = match self.inner.read(&mut self.chunk).await {
                Ok(n) => n,
                Err(err) => {
                    self.failed = true;
                    return Err(StreamError::Io(err));
                }
            };
            if read == 0 {
                self.eof = true;
            } else {
                self.pending.extend_from_slice(&self.chunk[..read]);
            }
        }
    }

    fn dispatch_line(&mut self, line: &[u8], registry: &EnumRegistry) -> Result<Option<Value>> {
        let parsed: serde_json::Value = match serde_json::from_slice(line) {
            Ok(parsed) => parsed,
            Err(source) => {
                self.failed = true;
                return Err(StreamError::Malformed {
                    line: Bytes::copy_from_slice(line),
                    source,
                });
            }
        };

        match classify(parsed, self.mapper) {
            Classified::Data(message) => Ok(Some(from_json(&message, registry))),
            Classified::Warning(text) => {
                self.sink.warning(&text);
                Ok(None)
            }
            Classified::Error(err) => {
                self.failed = true;
                Err(StreamError::Solver(err))
            }
        }
    }

    /// Consume the reader and return the inner byte source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use super::*;
    use crate::error::SolverError;

    /// Yields at most `step` bytes per read, like a slow pipe.
    struct TrickleReader {
        bytes: Vec<u8>,
        pos: usize,
        step: usize,
    }

    impl TrickleReader {
        fn new(bytes: impl Into<Vec<u8>>, step: usize) -> Self {
            Self {
                bytes: bytes.into(),
                pos: 0,
                step,
            }
        }
    }

    impl AsyncRead for TrickleReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> Poll<std::io::Result<()>> {
            let n = self
                .step
                .min(self.bytes.len() - self.pos)
                .min(buf.remaining());
            let pos = self.pos;
            buf.put_slice(&self.bytes[pos..pos + n]);
            self.pos += n;
            Poll::Ready(Ok(()))
        }
    }

    fn small_config() -> StreamConfig {
        StreamConfig { read_limit: 8 }
    }

    #[tokio::test]
    async fn messages_arrive_across_chunked_reads() {
        let wire = b"{\"type\":\"solution\",\"n\":1}\n{\"type\":\"solution\",\"n\":2}\n";
        let registry = EnumRegistry::new();
        let mut reader = AsyncMessageReader::with_config(
            TrickleReader::new(&wire[..], 3),
            small_config(),
            |_: &str| {},
        );

        let first = reader.next_message(&registry).await.unwrap().unwrap();
        assert_eq!(first.get("n"), Some(&Value::Int(1)));
        let second = reader.next_message(&registry).await.unwrap().unwrap();
        assert_eq!(second.get("n"), Some(&Value::Int(2)));
        assert!(reader.next_message(&registry).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn line_longer_than_read_limit_is_reassembled() {
        // One data message much longer than the 8-byte read limit.
        let long = "x".repeat(512);
        let wire = format!("{{\"type\":\"solution\",\"s\":\"{long}\"}}\n");
        let registry = EnumRegistry::new();
        let mut reader = AsyncMessageReader::with_config(
            TrickleReader::new(wire.into_bytes(), 5),
            small_config(),
            |_: &str| {},
        );

        let message = reader.next_message(&registry).await.unwrap().unwrap();
        assert_eq!(
            message.get("s").and_then(Value::as_str),
            Some(long.as_str())
        );
        assert!(reader.next_message(&registry).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn warnings_are_sunk_between_data_messages() {
        let wire = b"{\"type\":\"warning\",\"message\":\"m1\"}\n\
            {\"type\":\"solution\",\"n\":1}\n\
            {\"type\":\"error\",\"what\":\"warning\",\"message\":\"m2\"}\n";
        let registry = EnumRegistry::new();
        let mut warnings = Vec::new();
        let mut reader = AsyncMessageReader::with_config(
            TrickleReader::new(&wire[..], 7),
            StreamConfig::default(),
            |m: &str| warnings.push(m.to_string()),
        );

        let message = reader.next_message(&registry).await.unwrap().unwrap();
        assert_eq!(message.get("n"), Some(&Value::Int(1)));
        assert!(reader.next_message(&registry).await.unwrap().is_none());
        assert_eq!(warnings, vec!["m1".to_string(), "m2".to_string()]);
    }

    #[tokio::test]
    async fn fatal_error_then_end_of_sequence() {
        let wire = b"{\"type\":\"error\",\"what\":\"AssertionError\",\"message\":\"boom\"}\n\
            {\"type\":\"solution\",\"n\":1}\n";
        let registry = EnumRegistry::new();
        let mut reader = AsyncMessageReader::new(TrickleReader::new(&wire[..], 16));

        let err = reader.next_message(&registry).await.unwrap_err();
        assert!(
            matches!(err, StreamError::Solver(SolverError { ref kind, .. }) if kind == "AssertionError")
        );
        // No further elements after the fatal error.
        assert!(reader.next_message(&registry).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn trailing_bytes_without_newline_are_discarded() {
        let wire = b"{\"type\":\"solution\",\"n\":1}\n{\"type\":\"solu";
        let registry = EnumRegistry::new();
        let mut reader = AsyncMessageReader::new(TrickleReader::new(&wire[..], 16));

        assert!(reader.next_message(&registry).await.unwrap().is_some());
        assert!(reader.next_message(&registry).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_line_is_fatal() {
        let wire = b"{not json\n";
        let registry = EnumRegistry::new();
        let mut reader = AsyncMessageReader::new(TrickleReader::new(&wire[..], 16));

        let err = reader.next_message(&registry).await.unwrap_err();
        assert!(matches!(err, StreamError::Malformed { ref line, .. } if line.as_ref() == b"{not json"));
        assert!(reader.next_message(&registry).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn registry_entries_added_between_messages_apply() {
        use zincwire_value::EnumType;

        let wire = b"{\"type\":\"t\",\"d\":{\"e\":\"Mo\"}}\n{\"type\":\"t\",\"d\":{\"e\":\"Mo\"}}\n";
        let mut registry = EnumRegistry::new();
        let mut reader = AsyncMessageReader::new(TrickleReader::new(&wire[..], 16));

        let first = reader.next_message(&registry).await.unwrap().unwrap();
        assert_eq!(
            first.get("d"),
            Some(&Value::String("Mo".to_string()))
        );

        let day = EnumType::new("DAY", ["Mo"]);
        registry.register(&day);

        let second = reader.next_message(&registry).await.unwrap().unwrap();
        assert_eq!(
            second.get("d"),
            Some(&Value::Enum(day.member("Mo").unwrap()))
        );
    }
}
