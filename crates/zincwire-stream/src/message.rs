use crate::error::{ErrorMapper, SolverError};

/// The outcome of classifying one parsed message by its `type` field.
#[derive(Debug)]
pub enum Classified {
    /// A data message, yielded to the consumer.
    Data(serde_json::Value),
    /// A non-fatal diagnostic, routed to the sink; no element produced.
    Warning(String),
    /// A fatal driver error; terminates the stream.
    Error(SolverError),
}

/// Classify a parsed message.
///
/// `type == "warning"` is a warning, and so is an error-shaped message
/// demoted by `what == "warning"`. Any other `type == "error"` is fatal
/// and goes through the error-mapping collaborator. Everything else —
/// including objects without a `type` field — is data.
pub fn classify(message: serde_json::Value, mapper: ErrorMapper) -> Classified {
    let msg_type = message.get("type").and_then(serde_json::Value::as_str);
    let what = message.get("what").and_then(serde_json::Value::as_str);

    match msg_type {
        Some("warning") => Classified::Warning(warning_text(&message)),
        Some("error") if what == Some("warning") => Classified::Warning(warning_text(&message)),
        Some("error") => Classified::Error(mapper(&message)),
        _ => Classified::Data(message),
    }
}

fn warning_text(message: &serde_json::Value) -> String {
    message
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| message.to_string())
}

/// Receives non-fatal driver warnings.
///
/// Any `FnMut(&str)` works; [`tracing_sink`] is the default and forwards
/// to the `tracing` subscriber.
pub trait DiagnosticSink {
    fn warning(&mut self, message: &str);
}

impl<F: FnMut(&str)> DiagnosticSink for F {
    fn warning(&mut self, message: &str) {
        self(message);
    }
}

/// The default diagnostic sink: forwards to `tracing::warn!`.
pub fn tracing_sink(message: &str) {
    tracing::warn!(%message, "driver warning");
}
