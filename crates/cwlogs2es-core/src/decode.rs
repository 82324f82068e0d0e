// CloudWatch Logs subscription wire format
//
// Subscription filters deliver batches as base64-encoded, gzip-compressed
// JSON. The shapes here mirror that wire format; unknown fields are
// ignored and missing fields default, so older and newer producers both
// parse.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use serde::Deserialize;
use std::io::Read;

use crate::error::DecodeError;

/// Batch classification sent by the log source.
///
/// CloudWatch sends `CONTROL_MESSAGE` when it checks a subscription
/// destination; everything else carries log data, including values this
/// type has never heard of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum MessageType {
    #[default]
    DataMessage,
    ControlMessage,
}

impl From<String> for MessageType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "CONTROL_MESSAGE" => MessageType::ControlMessage,
            _ => MessageType::DataMessage,
        }
    }
}

/// One subscription batch as CloudWatch ships it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogBatch {
    pub message_type: MessageType,
    pub log_group: String,
    pub log_stream: String,
    pub log_events: Vec<LogEvent>,
}

/// A single log record within a batch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogEvent {
    /// Unique within the batch; reused as the document `_id`.
    pub id: String,
    /// Event time in epoch milliseconds.
    pub timestamp: i64,
    /// Raw log line, possibly a JSON document.
    pub message: String,
}

/// Decode the `data` field of a subscription event into a [`LogBatch`].
///
/// The payload is standard base64 wrapping a gzip stream wrapping JSON.
/// All three layers must decode; there is no partial result.
pub fn decode_log_batch(data: &str) -> Result<LogBatch, DecodeError> {
    let compressed = BASE64_STANDARD.decode(data)?;
    let mut json = Vec::new();
    GzDecoder::new(compressed.as_slice()).read_to_end(&mut json)?;
    Ok(serde_json::from_slice(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    /// base64(gzip(json)) of a one-event batch whose messageType is the
    /// unrecognized value "log".
    const RECORDED_BATCH: &str = "H4sICPFQnl0AA3RlbXAuanNvbgCr5lJQUMpNLS5OTE8NqSxIVbJSUMrJT1fSAYkDGe5F+aUFIEH9ktTiErhwcElRamIuSBxF2LUsNa+kGCgcDRRQUKgGk0CpkkygFSWJuSCTDA2AQAcmA7UaZFJGak5OvhJcJjMFJGhoZKwEFqkFkrFctQAe8j0HsAAAAA==";

    fn pack(json: &str) -> String {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(json.as_bytes()).unwrap();
        BASE64_STANDARD.encode(encoder.finish().unwrap())
    }

    #[test]
    fn decodes_recorded_batch() {
        let batch = decode_log_batch(RECORDED_BATCH).unwrap();

        assert_eq!(batch.message_type, MessageType::DataMessage);
        assert_eq!(batch.log_group, "/test");
        assert_eq!(batch.log_stream, "test");
        assert_eq!(batch.log_events.len(), 1);
        assert_eq!(batch.log_events[0].id, "123");
        assert_eq!(batch.log_events[0].timestamp, 10000);
        assert_eq!(batch.log_events[0].message, "hello");
    }

    #[test]
    fn decodes_control_message() {
        let data = pack(r#"{"messageType":"CONTROL_MESSAGE","logGroup":"/g","logStream":"s","logEvents":[]}"#);
        let batch = decode_log_batch(&data).unwrap();

        assert_eq!(batch.message_type, MessageType::ControlMessage);
        assert!(batch.log_events.is_empty());
    }

    #[test]
    fn missing_fields_default() {
        let batch = decode_log_batch(&pack("{}")).unwrap();

        assert_eq!(batch.message_type, MessageType::DataMessage);
        assert_eq!(batch.log_group, "");
        assert!(batch.log_events.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let data = pack(
            r#"{"messageType":"DATA_MESSAGE","owner":"123456789012","subscriptionFilters":["all"],"logGroup":"/g","logStream":"s","logEvents":[{"id":"1","timestamp":1,"message":"m","extra":true}]}"#,
        );
        let batch = decode_log_batch(&data).unwrap();

        assert_eq!(batch.log_events.len(), 1);
        assert_eq!(batch.log_events[0].message, "m");
    }

    #[test]
    fn unrecognized_message_type_is_data() {
        assert_eq!(MessageType::from("log".to_string()), MessageType::DataMessage);
        assert_eq!(
            MessageType::from("CONTROL_MESSAGE".to_string()),
            MessageType::ControlMessage
        );
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = decode_log_batch("%%% not base64 %%%").unwrap_err();
        assert!(matches!(err, DecodeError::Base64(_)));
    }

    #[test]
    fn rejects_non_gzip_bytes() {
        let err = decode_log_batch(&BASE64_STANDARD.encode(b"plain bytes")).unwrap_err();
        assert!(matches!(err, DecodeError::Gunzip(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = decode_log_batch(&pack("{not json")).unwrap_err();
        assert!(matches!(err, DecodeError::Format(_)));
    }
}
