use std::io::Write;

use zincwire_value::{Encoder, Value};

use crate::error::{Result, StreamError};

/// Writes domain values to the driver's input as newline-terminated JSON.
///
/// The encode-path counterpart of the readers: one value per line,
/// flushed after every message so the driver sees it promptly.
pub struct MessageWriter<W> {
    inner: W,
    encoder: Encoder,
}

impl<W: Write> MessageWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_encoder(inner, Encoder::new())
    }

    /// Use an encoder with extension converters installed.
    pub fn with_encoder(inner: W, encoder: Encoder) -> Self {
        Self { inner, encoder }
    }

    /// Encode and send one value as a single line.
    pub fn send(&mut self, value: &Value) -> Result<()> {
        let json = self.encoder.encode(value)?;
        serde_json::to_writer(&mut self.inner, &json).map_err(StreamError::Serialize)?;
        self.inner.write_all(b"\n")?;
        self.inner.flush()?;
        Ok(())
    }

    /// Send an already-JSON message (e.g. a command envelope) as a line.
    pub fn send_json(&mut self, message: &serde_json::Value) -> Result<()> {
        serde_json::to_writer(&mut self.inner, message).map_err(StreamError::Serialize)?;
        self.inner.write_all(b"\n")?;
        self.inner.flush()?;
        Ok(())
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use zincwire_value::{EnumRegistry, EnumType};

    use super::*;
    use crate::reader::MessageReader;

    #[test]
    fn written_values_read_back() {
        let day = EnumType::new("DAY", ["Mo", "Tu"]);
        let mut registry = EnumRegistry::new();
        registry.register(&day);

        let mut wire = Vec::new();
        let mut writer = MessageWriter::new(&mut wire);
        writer
            .send_json(&serde_json::json!({"type": "solution", "d": {"e": "Mo"}}))
            .unwrap();
        writer.send(&Value::from(1i64..=3)).unwrap();

        let items: Vec<_> = MessageReader::with_sink(&wire, &registry, |_: &str| {})
            .collect::<std::result::Result<_, _>>()
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].get("d"),
            Some(&Value::Enum(day.member("Mo").unwrap()))
        );
        assert_eq!(items[1], Value::from(1i64..=3));
    }

    #[test]
    fn unrepresentable_value_fails_before_writing() {
        let mut wire = Vec::new();
        let mut writer = MessageWriter::new(&mut wire);
        let err = writer.send(&Value::Float(f64::INFINITY)).unwrap_err();

        assert!(matches!(err, StreamError::Encode(_)));
        assert!(wire.is_empty());
    }
}
