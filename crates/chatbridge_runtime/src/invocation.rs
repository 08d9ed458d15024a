//! One invocation, end to end: payload -> context -> messages -> model -> host.

use std::io::Write;
use std::sync::Arc;

use chatbridge_core::{BridgeError, ChatMessage, Credentials, EditorSnapshot, Result};
use chatbridge_llms::providers::openai::OpenAIConfig;
use chatbridge_llms::{GenerateRequest, OpenAIProvider, Provider, ProviderRegistry};
use chatbridge_observability::{invocation_span, record_error};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Instrument};

use crate::bridge::{StreamSummary, StreamingBridge};
use crate::config::RuntimeConfig;
use crate::context::{
    build_generate_request, build_messages, build_system_prompt, ContextAssembler, PromptRoute,
};
use crate::emitter::ProtocolEmitter;

/// Everything needed to call the model, built without touching the network.
#[derive(Debug)]
pub struct PreparedInvocation {
    pub snapshot: EditorSnapshot,
    pub route: PromptRoute,
    pub messages: Vec<ChatMessage>,
    pub request: GenerateRequest,
}

#[derive(Debug)]
pub struct InvocationReport {
    pub route: PromptRoute,
    pub message_count: usize,
    pub stream: StreamSummary,
}

/// Drives invocations. Holds no per-invocation state: the snapshot and the
/// open-block stack live in the call and in the emitter respectively.
pub struct Runtime {
    config: RuntimeConfig,
    providers: ProviderRegistry,
    /// Registered provider to use instead of one built from the payload.
    pinned: Option<String>,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            providers: ProviderRegistry::new(),
            pinned: None,
        }
    }

    /// Use a fixed provider instead of one built from the payload credentials.
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.pinned = Some(provider.provider_id().to_string());
        self.providers.insert(provider);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Parse the payload and build the model request.
    ///
    /// Emits the context metadata events and the diagnostic `log` events.
    pub fn prepare<W: Write>(
        &self,
        payload: &str,
        emitter: &mut ProtocolEmitter<W>,
    ) -> Result<PreparedInvocation> {
        let snapshot = EditorSnapshot::from_json(payload)?;
        self.prepare_snapshot(snapshot, emitter)
    }

    pub fn prepare_snapshot<W: Write>(
        &self,
        snapshot: EditorSnapshot,
        emitter: &mut ProtocolEmitter<W>,
    ) -> Result<PreparedInvocation> {
        let context = ContextAssembler::new(&snapshot)
            .with_missing_files(self.config.missing_file_policy)
            .assemble(emitter)?;

        let route = PromptRoute::classify(snapshot.prompt());
        if let PromptRoute::Raw { ref directive } = route {
            info!(directive = %directive, "raw prompt, file context not attached");
        }

        let system_prompt = build_system_prompt(&self.config.model);
        let messages = build_messages(
            &system_prompt,
            &route,
            &context,
            snapshot.chat_history(),
            snapshot.prompt(),
        );

        emitter.log(format!("messages {}", messages.len()))?;
        emitter.log(format!("prompt {}", snapshot.prompt()))?;
        emitter.log(format!("## Terminal {}", snapshot.terminal_snapshot_text()))?;

        let request = build_generate_request(&self.config, messages.clone());

        Ok(PreparedInvocation {
            snapshot,
            route,
            messages,
            request,
        })
    }

    /// Run one invocation. The chat stream is always terminated, on failure
    /// after closing any open block and logging the failure.
    pub async fn run<W: Write>(
        &self,
        payload: &str,
        emitter: &mut ProtocolEmitter<W>,
        cancel: CancellationToken,
    ) -> Result<InvocationReport> {
        let span = invocation_span!(self.config.model.as_str(), tracing::field::Empty);

        async move {
            match self.run_inner(payload, emitter, cancel).await {
                Ok(report) => {
                    emitter.terminate_chat()?;
                    info!(
                        message_count = report.message_count,
                        deltas = report.stream.deltas,
                        "invocation complete"
                    );
                    Ok(report)
                }
                Err(err) => {
                    record_error(&err);
                    terminate_after_failure(emitter, &err);
                    Err(err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_inner<W: Write>(
        &self,
        payload: &str,
        emitter: &mut ProtocolEmitter<W>,
        cancel: CancellationToken,
    ) -> Result<InvocationReport> {
        let prepared = self.prepare(payload, emitter)?;
        tracing::Span::current().record("route", prepared.route.label());
        let message_count = prepared.messages.len();

        let provider = self.provider_for(prepared.snapshot.credentials())?;
        info!(
            provider = provider.provider_id(),
            messages = message_count,
            "requesting completion"
        );

        let stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BridgeError::Cancelled),
            opened = provider.stream(prepared.request) => {
                opened.map_err(|e| BridgeError::ModelUnavailable(e.to_string()))?
            }
        };

        let summary = StreamingBridge::new(emitter, &self.config.model)
            .relay(stream, cancel)
            .await?;

        Ok(InvocationReport {
            route: prepared.route,
            message_count,
            stream: summary,
        })
    }

    fn provider_for(&self, credentials: &Credentials) -> Result<Arc<dyn Provider>> {
        if let Some(ref id) = self.pinned {
            return self
                .providers
                .get_provider(id)
                .map_err(|e| BridgeError::ModelUnavailable(e.to_string()));
        }

        let config = OpenAIConfig::new(&credentials.api_key).with_base_url(&credentials.api_url);
        let provider =
            OpenAIProvider::new(config).map_err(|e| BridgeError::ModelUnavailable(e.to_string()))?;
        Ok(Arc::new(provider))
    }
}

/// Best effort: the host channel itself may be what failed.
fn terminate_after_failure<W: Write>(emitter: &mut ProtocolEmitter<W>, err: &BridgeError) {
    if emitter.is_terminated() {
        return;
    }
    if let Err(e) = emitter.close_open_blocks() {
        warn!(error = %e, "could not close open blocks");
    }
    if let Err(e) = emitter.log(format!("{} error: {}", err.kind(), err)) {
        warn!(error = %e, "could not log failure to host");
    }
    if let Err(e) = emitter.terminate_chat() {
        warn!(error = %e, "could not terminate chat");
    }
}
