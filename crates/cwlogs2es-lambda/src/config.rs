// Environment configuration
//
// All four values ride in as plain environment variables on the
// function. Absence is not an error at this layer; a missing host or
// region surfaces naturally from the signing/transport path.

/// Deployment settings read once at startup.
#[derive(Debug, Clone, Default)]
pub struct HandlerConfig {
    /// Deployment tag stamped on every document (`env` field).
    pub env: String,
    /// Signing region, also stamped on every document.
    pub region: String,
    /// Elasticsearch base URL.
    pub es_host: String,
    /// Daily index name prefix.
    pub es_index_prefix: String,
}

impl HandlerConfig {
    pub fn from_env() -> Self {
        Self {
            env: std::env::var("ENV").unwrap_or_default(),
            region: std::env::var("AWS_REGION").unwrap_or_default(),
            es_host: std::env::var("ES_HOST").unwrap_or_default(),
            es_index_prefix: std::env::var("ES_INDEX_PREFIX").unwrap_or_default(),
        }
    }
}
