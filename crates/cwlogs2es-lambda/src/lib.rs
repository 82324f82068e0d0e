// AWS Lambda runtime adapter
//
// lambda_runtime provides the tokio runtime. State lives in an Arc and
// is shared across warm invocations, so the HTTP connection pool and
// resolved credentials survive between batches.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod event;
mod handler;

pub use config::HandlerConfig;
pub use event::{AwsLogs, LogsEvent, PROBE_SENTINEL};
pub use handler::{handle_event, HandlerError, HandlerState, CONTROL_MESSAGE_STATUS};

use cwlogs2es_writer::SigV4Client;

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` controls the filter and defaults to `info`. Idempotent:
/// later calls keep the first subscriber.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::registry().with(env_filter).with(fmt::layer()),
    );
}

/// Lambda runtime entry point
pub async fn run() -> Result<(), Error> {
    init_tracing();

    let config = HandlerConfig::from_env();
    info!(
        es_host = %config.es_host,
        index_prefix = %config.es_index_prefix,
        env = %config.env,
        "starting log shipper"
    );

    let client = SigV4Client::from_env(&config.region)
        .await
        .map_err(|e| Error::from(format!("Failed to initialize signing client: {}", e)))?;
    let state = Arc::new(HandlerState::new(&config, client));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<LogsEvent>| {
        let state = state.clone();
        async move { function_handler(state, event).await }
    }))
    .await
}

/// Lambda handler for subscription events
async fn function_handler(
    state: Arc<HandlerState>,
    event: LambdaEvent<LogsEvent>,
) -> Result<String, Error> {
    let (payload, _context) = event.into_parts();

    match handle_event(&state, payload).await {
        Ok(status) => {
            info!(%status, "invocation complete");
            Ok(status)
        }
        Err(err) => {
            error!(status = err.status(), error = %err, "invocation failed");
            Err(err.into())
        }
    }
}
