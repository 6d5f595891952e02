//! A scouting loop against a logging stand-in dispatcher.
//!
//! Run with `cargo run --example scouting` to watch a full app-start
//! burst and a map refresh flow through the orchestrator. The
//! dispatcher here only logs what it would transmit and answers every
//! call with an empty body.

use waylink::prelude::*;

/// Logs each envelope instead of putting it on the wire.
struct LoggingDispatcher;

impl Dispatcher for LoggingDispatcher {
    async fn dispatch(
        &self,
        envelope: DispatchEnvelope,
    ) -> Result<Vec<CallResponse>, DispatchError> {
        tracing::info!(
            intent = %envelope.intent,
            calls = envelope.calls.len(),
            relative_ms = envelope.relative_timestamp_ms,
            lat = envelope.position.latitude,
            lon = envelope.position.longitude,
            "would transmit"
        );
        for call in &envelope.calls {
            tracing::info!(
                call = %call.request_type,
                payload_bytes = call.payload.len(),
                "  ├─"
            );
        }
        Ok(envelope
            .calls
            .iter()
            .map(|call| CallResponse {
                request_type: call.request_type,
                body: Box::new(()),
            })
            .collect())
    }
}

#[tokio::main]
async fn main() -> Result<(), DispatchError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,waylink=debug".into()),
        )
        .init();

    let now = waylink::now_ms();
    let mut gate = AuthGate::new(RefreshPolicy::AutoRefresh);
    gate.log_in(AuthToken::new("demo-token", now + 3_600_000));

    let mut api = RequestOrchestrator::new(
        JsonCodec,
        LoggingDispatcher,
        None::<NoRefresher>,
        Session::generate_random(now),
        DeviceInfo::generate_random(),
        OrchestratorConfig::default(),
    );
    api.set_auth(gate);
    api.set_position(Position::at(40.7580, -73.9855));

    // App launch: profile plus the keep-alive bundle.
    api.queue_app_start_sequence()?;
    let responses = api.dispatch(Intent::AppStart).await?;
    tracing::info!(responses = responses.len(), "app start complete");

    // Walk a block north, then refresh the map around the new position.
    api.set_position(Position::at(40.7590, -73.9855));
    api.queue_map_scan()?;
    let responses = api.dispatch(Intent::MapRefresh).await?;
    tracing::info!(responses = responses.len(), "map refresh complete");

    Ok(())
}
