use meetup_relay::config::env_loader::load_forwarder_config;
use meetup_relay::relay::{error_chain, forward_events, RelayError};
use meetup_relay::tracing::{setup_loki, shutdown_loki};
use std::process::ExitCode;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let loki = setup_loki().await;

    let result = run().await;

    if let Err(err) = &result {
        error!("Forwarding events failed: {}", error_chain(err));
    }

    shutdown_loki(loki).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run() -> Result<(), RelayError> {
    let config = load_forwarder_config()?;

    forward_events(&config).await.map(|_| ())
}
