//! `chatbridge messages`: dry run of context assembly and routing.

use anyhow::{Context, Result};
use chatbridge_runtime::{ProtocolEmitter, Runtime, RuntimeConfig};

pub fn handle(config: RuntimeConfig, payload: &str) -> Result<()> {
    let runtime = Runtime::new(config);
    // Protocol events are not wanted here, only the message list.
    let mut emitter = ProtocolEmitter::new(std::io::sink());

    let prepared = runtime
        .prepare(payload, &mut emitter)
        .context("failed to build messages")?;

    tracing::debug!(
        route = prepared.route.label(),
        messages = prepared.messages.len(),
        "prepared messages"
    );
    println!("{}", serde_json::to_string_pretty(&prepared.messages)?);
    Ok(())
}
