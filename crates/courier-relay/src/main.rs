//! Courier relay function
//!
//! Serverless entry point. Configuration, the SNS client and the resolved
//! topic address are built once per execution environment and shared by
//! every invocation it serves.

use courier_core::CourierConfig;
use courier_relay::logging::{self, LogSink};
use courier_relay::{Relay, SnsBackend};
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = CourierConfig::from_env();
    logging::init(&config.logging, LogSink::Platform);

    let backend = SnsBackend::from_config(&config.backend).await;
    let relay = Relay::from_config(Arc::new(backend), &config)?;

    info!("Starting courier relay {}", courier_core::VERSION);

    let relay = &relay;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        let span = info_span!("invocation", request_id = %event.context.request_id);
        relay
            .handle(event.payload)
            .instrument(span)
            .await
            .map_err(lambda_runtime::Error::from)
    }))
    .await
}
