//! `chatbridge run`: one invocation against the model.

use anyhow::Result;
use chatbridge_runtime::{ProtocolEmitter, Runtime, RuntimeConfig};
use tokio_util::sync::CancellationToken;

pub async fn handle(config: RuntimeConfig, payload: &str) -> Result<()> {
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling");
            on_signal.cancel();
        }
    });

    let runtime = Runtime::new(config);
    let mut emitter = ProtocolEmitter::new(std::io::stdout());

    // The protocol stream is already terminated when this fails.
    runtime.run(payload, &mut emitter, cancel).await?;
    Ok(())
}
