use bytes::Bytes;
use zincwire_value::{from_json, EnumRegistry, Value};

use crate::error::{error_from_message, ErrorMapper, Result, StreamError};
use crate::message::{classify, tracing_sink, Classified, DiagnosticSink};

/// Decodes a fully-read, newline-delimited message buffer.
///
/// A lazy, single-pass iterator over the decoded data messages: warnings
/// go to the diagnostic sink, the first fatal error is yielded as `Err`
/// and fuses the iterator.
pub struct MessageReader<'a, S = fn(&str)> {
    buf: &'a [u8],
    pos: usize,
    registry: &'a EnumRegistry,
    sink: S,
    mapper: ErrorMapper,
    done: bool,
}

impl<'a> MessageReader<'a, fn(&str)> {
    /// Read messages from `buf`, resolving enum names through `registry`
    /// and logging warnings through `tracing`.
    pub fn new(buf: &'a [u8], registry: &'a EnumRegistry) -> Self {
        Self::with_sink(buf, registry, tracing_sink)
    }
}

impl<'a, S: DiagnosticSink> MessageReader<'a, S> {
    /// Read messages with an explicit diagnostic sink.
    pub fn with_sink(buf: &'a [u8], registry: &'a EnumRegistry, sink: S) -> Self {
        Self {
            buf,
            pos: 0,
            registry,
            sink,
            mapper: error_from_message,
            done: false,
        }
    }

    /// Replace the error-mapping collaborator.
    pub fn with_error_mapper(mut self, mapper: ErrorMapper) -> Self {
        self.mapper = mapper;
        self
    }

    fn next_line(&mut self) -> Option<&'a [u8]> {
        if self.pos >= self.buf.len() {
            return None;
        }
        let rest = &self.buf[self.pos..];
        match rest.iter().position(|&b| b == b'\n') {
            Some(end) => {
                self.pos += end + 1;
                Some(&rest[..end])
            }
            None => {
                self.pos = self.buf.len();
                Some(rest)
            }
        }
    }
}

impl<S: DiagnosticSink> Iterator for MessageReader<'_, S> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while let Some(line) = self.next_line() {
            let line = line.trim_ascii();
            if line.is_empty() {
                continue;
            }

            let parsed: serde_json::Value = match serde_json::from_slice(line) {
                Ok(parsed) => parsed,
                Err(source) => {
                    self.done = true;
                    return Some(Err(StreamError::Malformed {
                        line: Bytes::copy_from_slice(line),
                        source,
                    }));
                }
            };

            match classify(parsed, self.mapper) {
                Classified::Data(message) => {
                    return Some(Ok(from_json(&message, self.registry)));
                }
                Classified::Warning(text) => self.sink.warning(&text),
                Classified::Error(err) => {
                    self.done = true;
                    return Some(Err(StreamError::Solver(err)));
                }
            }
        }
        self.done = true;
        None
    }
}
