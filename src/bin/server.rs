//! Lambda HTTP entry point for the retirement engine API

use lambda_http::{run, service_fn, Error, Request};
use retirement_engine::api::{performance, route};
use retirement_engine::EngineConfig;

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    performance::mark_start();

    let config: &'static EngineConfig = Box::leak(Box::new(EngineConfig::load()?));
    log::info!(
        "Starting retirement engine (nps rate {}, index rate {})",
        config.nps_rate,
        config.index_rate
    );

    run(service_fn(move |request: Request| async move {
        Ok::<_, Error>(route(&request, config))
    }))
    .await
}
