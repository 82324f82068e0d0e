// Elasticsearch bulk payload construction
//
// One `{"index": ...}` action line plus one source document line per log
// event, newline-terminated, routed to a day-stamped index.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::decode::{LogBatch, LogEvent, MessageType};
use crate::flatten::{flatten_message, FLATTEN_PREFIX};

/// Builds `_bulk` payloads for decoded log batches.
///
/// Carries the deployment tags stamped onto every document. One builder
/// per process; `build` is pure apart from reading the current date.
#[derive(Debug, Clone)]
pub struct BulkPayloadBuilder {
    env: String,
    region: String,
    index_prefix: String,
}

impl BulkPayloadBuilder {
    pub fn new(env: &str, region: &str, index_prefix: &str) -> Self {
        Self {
            env: env.to_string(),
            region: region.to_string(),
            index_prefix: index_prefix.to_string(),
        }
    }

    /// Render `batch` as newline-delimited action/source line pairs.
    ///
    /// Control messages and empty batches produce an empty string, which
    /// callers treat as "nothing to send". The index name is computed
    /// once per build, so every event in a batch lands in the same day's
    /// index even if the build straddles midnight.
    pub fn build(&self, batch: &LogBatch) -> String {
        if batch.message_type == MessageType::ControlMessage {
            return String::new();
        }

        let index = todays_index(&self.index_prefix);
        let mut payload = String::new();
        for event in &batch.log_events {
            let action = json!({
                "index": {
                    "_index": index.as_str(),
                    "_type": "_doc",
                    "_id": event.id.as_str(),
                }
            });
            payload.push_str(&action.to_string());
            payload.push('\n');
            payload.push_str(&Value::Object(self.document(batch, event)).to_string());
            payload.push('\n');
        }
        payload
    }

    /// Seed fields plus whatever the flattener lifts out of the message.
    fn document(&self, batch: &LogBatch, event: &LogEvent) -> Map<String, Value> {
        let mut doc = Map::new();
        doc.insert("@id".to_string(), Value::String(event.id.clone()));
        doc.insert(
            "@timestamp".to_string(),
            Value::String(rfc3339_nanos(event.timestamp)),
        );
        doc.insert("message".to_string(), Value::String(event.message.clone()));
        doc.insert("env".to_string(), Value::String(self.env.clone()));
        doc.insert("region".to_string(), Value::String(self.region.clone()));
        doc.insert("log_group".to_string(), Value::String(batch.log_group.clone()));
        doc.insert("log_stream".to_string(), Value::String(batch.log_stream.clone()));
        flatten_message(&mut doc, &event.message, FLATTEN_PREFIX);
        doc
    }
}

/// `<prefix>-YYYY.MM.DD` for the current UTC date.
fn todays_index(prefix: &str) -> String {
    format!("{}-{}", prefix, Utc::now().format("%Y.%m.%d"))
}

/// Epoch milliseconds as an RFC3339 timestamp with nanosecond precision.
/// Out-of-range values render as the epoch.
fn rfc3339_nanos(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> BulkPayloadBuilder {
        BulkPayloadBuilder::new("staging", "us-east-1", "cwl")
    }

    fn data_batch(events: Vec<LogEvent>) -> LogBatch {
        LogBatch {
            message_type: MessageType::DataMessage,
            log_group: "/aws/lambda/app".to_string(),
            log_stream: "2020/01/01/[$LATEST]abcdef".to_string(),
            log_events: events,
        }
    }

    fn event(id: &str, timestamp: i64, message: &str) -> LogEvent {
        LogEvent {
            id: id.to_string(),
            timestamp,
            message: message.to_string(),
        }
    }

    #[test]
    fn control_message_builds_empty_payload() {
        let batch = LogBatch {
            message_type: MessageType::ControlMessage,
            ..LogBatch::default()
        };
        assert_eq!(builder().build(&batch), "");
    }

    #[test]
    fn empty_batch_builds_empty_payload() {
        assert_eq!(builder().build(&data_batch(Vec::new())), "");
    }

    #[test]
    fn two_events_produce_two_line_pairs() {
        let batch = data_batch(vec![
            event("1", 10000, "hello"),
            event("2", 20000, "world"),
        ]);
        let payload = builder().build(&batch);

        assert!(payload.ends_with('\n'));
        let lines: Vec<&str> = payload.lines().collect();
        assert_eq!(lines.len(), 4);

        let expected_index = format!("cwl-{}", Utc::now().format("%Y.%m.%d"));
        for (pair, id) in [(0, "1"), (2, "2")] {
            let action: Value = serde_json::from_str(lines[pair]).unwrap();
            assert_eq!(action["index"]["_index"].as_str(), Some(expected_index.as_str()));
            assert_eq!(action["index"]["_type"], json!("_doc"));
            assert_eq!(action["index"]["_id"], json!(id));
        }
    }

    #[test]
    fn source_line_carries_seed_fields() {
        let batch = data_batch(vec![event("123", 10000, "hello")]);
        let payload = builder().build(&batch);
        let lines: Vec<&str> = payload.lines().collect();

        let source: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(source["@id"], json!("123"));
        assert_eq!(source["@timestamp"], json!("1970-01-01T00:00:10.000000000Z"));
        assert_eq!(source["message"], json!("hello"));
        assert_eq!(source["env"], json!("staging"));
        assert_eq!(source["region"], json!("us-east-1"));
        assert_eq!(source["log_group"], json!("/aws/lambda/app"));
        assert_eq!(source["log_stream"], json!("2020/01/01/[$LATEST]abcdef"));
    }

    #[test]
    fn json_message_is_replaced_by_flattened_fields() {
        let batch = data_batch(vec![event("1", 0, r#"{"level":"info","msg":"ready"}"#)]);
        let payload = builder().build(&batch);
        let lines: Vec<&str> = payload.lines().collect();

        let source: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(source["json_log_data.level"], json!("info"));
        assert_eq!(source["json_log_data.msg"], json!("ready"));
        assert!(source.get("message").is_none());
    }

    #[test]
    fn unrecognized_message_type_is_shipped_as_data() {
        let batch = LogBatch {
            message_type: MessageType::default(),
            log_events: vec![event("1", 0, "m")],
            ..LogBatch::default()
        };
        let payload = builder().build(&batch);
        assert_eq!(payload.lines().count(), 2);
    }
}
