// AWS Lambda binary entry point
//
// The lambda_runtime crate provides the tokio runtime, so we use #[tokio::main]

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    cwlogs2es_lambda::run().await
}
