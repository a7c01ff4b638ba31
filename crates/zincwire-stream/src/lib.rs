//! Line-delimited JSON message framing and dispatch for solver drivers.
//!
//! A driver process emits one JSON object per `\n`-terminated line:
//! progress, solutions, warnings and errors, interleaved on one byte
//! stream. This crate splits that stream into messages, decodes each
//! through the [`zincwire_value`] codec, and routes it by its `type`
//! field:
//!
//! - data messages are yielded to the consumer,
//! - warnings (including errors demoted by `what == "warning"`) go to a
//!   [`DiagnosticSink`] and produce no element,
//! - fatal errors terminate the stream with a [`SolverError`].
//!
//! [`MessageReader`] consumes a fully-read buffer; with the `async`
//! feature, [`AsyncMessageReader`] consumes a live byte source without
//! blocking on partial lines. [`MessageWriter`] is the encode path back
//! to the driver.

pub mod error;
pub mod message;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_reader;

pub use error::{error_from_message, ErrorMapper, Location, Result, SolverError, StreamError};
pub use message::{classify, tracing_sink, Classified, DiagnosticSink};
pub use reader::MessageReader;
pub use writer::MessageWriter;

#[cfg(feature = "async")]
pub use async_reader::{AsyncMessageReader, StreamConfig, DEFAULT_READ_LIMIT};
