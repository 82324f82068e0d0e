// Invocation handling
//
// One event in, one status string out. The probe sentinel short-circuits
// to the connectivity check; everything else is decode, build, then a
// retried bulk write.

use std::sync::Arc;

use cwlogs2es_core::{decode_log_batch, BulkPayloadBuilder, DecodeError};
use cwlogs2es_writer::{
    run_with_retry, BulkWriter, ConnectivityProbe, EsError, RetryPolicy, SigV4Client, Sleep,
    TokioSleep,
};
use thiserror::Error;
use tracing::{error, info};

use crate::config::HandlerConfig;
use crate::event::{LogsEvent, PROBE_SENTINEL};

/// Stable status string for a skipped control message.
pub const CONTROL_MESSAGE_STATUS: &str = "handled control message";

/// Everything that can sink one invocation.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    BulkWrite(EsError),

    #[error(transparent)]
    Probe(EsError),
}

impl HandlerError {
    /// Stable status label reported alongside the error.
    ///
    /// Decode failures report no status; the harness only sees the error.
    pub fn status(&self) -> &'static str {
        match self {
            HandlerError::Decode(_) => "",
            HandlerError::BulkWrite(_) => "elasticsearch update error",
            HandlerError::Probe(_) => "failed",
        }
    }
}

/// Long-lived per-process state shared across warm invocations.
pub struct HandlerState {
    builder: BulkPayloadBuilder,
    writer: BulkWriter<SigV4Client>,
    probe: ConnectivityProbe<SigV4Client>,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleep>,
}

impl HandlerState {
    /// Wire the pipeline up against one shared signing client.
    pub fn new(config: &HandlerConfig, client: SigV4Client) -> Self {
        Self::with_retry(config, client, RetryPolicy::default(), Arc::new(TokioSleep))
    }

    /// Same wiring with an explicit retry budget and delay hook.
    pub fn with_retry(
        config: &HandlerConfig,
        client: SigV4Client,
        retry: RetryPolicy,
        sleeper: Arc<dyn Sleep>,
    ) -> Self {
        Self {
            builder: BulkPayloadBuilder::new(&config.env, &config.region, &config.es_index_prefix),
            writer: BulkWriter::new(client.clone(), &config.es_host),
            probe: ConnectivityProbe::new(client, &config.es_host),
            retry,
            sleeper,
        }
    }
}

/// Process one invocation and produce its status string.
pub async fn handle_event(state: &HandlerState, event: LogsEvent) -> Result<String, HandlerError> {
    if event.awslogs.data == PROBE_SENTINEL {
        return probe_connectivity(state).await;
    }

    let batch = decode_log_batch(&event.awslogs.data)?;
    info!(log_group = %batch.log_group, "handling logs");

    let payload = state.builder.build(&batch);
    if payload.is_empty() {
        return Ok(CONTROL_MESSAGE_STATUS.to_string());
    }

    let summary = run_with_retry(state.retry, state.sleeper.as_ref(), "bulk update", || {
        state.writer.write(&payload)
    })
    .await
    .map_err(|err| {
        error!("bulk update failed three times, sending to DLQ");
        HandlerError::BulkWrite(err)
    })?;

    Ok(summary.to_string())
}

async fn probe_connectivity(state: &HandlerState) -> Result<String, HandlerError> {
    run_with_retry(state.retry, state.sleeper.as_ref(), "connectivity probe", || {
        state.probe.ping()
    })
    .await
    .map_err(HandlerError::Probe)?;

    Ok("success".to_string())
}
