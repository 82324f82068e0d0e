// cwlogs2es-core - Pure log batch processing
//
// This crate contains the PURE transform logic for turning a CloudWatch
// Logs subscription batch into an Elasticsearch bulk payload:
// base64+gzip expansion, JSON message flattening, and newline-delimited
// payload construction. No I/O, no async, no runtime dependencies.

pub mod bulk;
pub mod decode;
pub mod error;
pub mod flatten;

// Re-export commonly used types
pub use bulk::BulkPayloadBuilder;
pub use decode::{decode_log_batch, LogBatch, LogEvent, MessageType};
pub use error::DecodeError;
pub use flatten::{flatten_message, FLATTEN_PREFIX};
