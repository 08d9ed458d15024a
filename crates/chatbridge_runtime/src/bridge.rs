//! Streaming bridge: relays model deltas into the block-tagged chat stream.
//!
//! Reasoning deltas are wrapped in a `collapse` block, answer deltas are
//! forwarded plain. The block opens on the first reasoning delta after plain
//! content and closes on the first answer delta after reasoning. Deltas are
//! forwarded in arrival order with no buffering.

use std::io::Write;
use std::time::{Duration, Instant};

use chatbridge_core::{BlockKind, BridgeError, Result};
use chatbridge_llms::{StreamEvent, Usage};
use chatbridge_observability::{duration_millis, record_duration, record_error};
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::emitter::ProtocolEmitter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Plain,
    Thinking,
}

/// What a finished relay saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub deltas: usize,
    pub reasoning_chars: usize,
    pub answer_chars: usize,
    pub usage: Option<Usage>,
    pub duration: Duration,
}

pub struct StreamingBridge<'a, W: Write> {
    emitter: &'a mut ProtocolEmitter<W>,
    model: &'a str,
    state: BridgeState,
    summary: StreamSummary,
}

impl<'a, W: Write> StreamingBridge<'a, W> {
    pub fn new(emitter: &'a mut ProtocolEmitter<W>, model: &'a str) -> Self {
        Self {
            emitter,
            model,
            state: BridgeState::Plain,
            summary: StreamSummary::default(),
        }
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    /// Translate one delta into protocol events.
    pub fn handle(&mut self, event: StreamEvent) -> Result<()> {
        self.summary.deltas += 1;

        match event {
            StreamEvent::ReasoningDelta { delta } => {
                if self.state == BridgeState::Plain {
                    self.emitter.start_block(BlockKind::Think)?;
                    self.state = BridgeState::Thinking;
                }
                self.summary.reasoning_chars += delta.chars().count();
                self.emitter.push_chat(delta)
            }
            StreamEvent::TextDelta { delta } => {
                if self.state == BridgeState::Thinking {
                    self.close_thinking()?;
                }
                self.summary.answer_chars += delta.chars().count();
                self.emitter.push_chat(delta)
            }
            StreamEvent::Usage { usage } => {
                if self.summary.usage.is_some() {
                    warn!(prompt_tokens = usage.prompt_tokens, "ignoring repeated usage report");
                    return Ok(());
                }
                self.summary.usage = Some(usage);
                self.emitter.push_metadata(format!(
                    "number of tokens used in prompt: {} model: {}",
                    usage.prompt_tokens, self.model
                ))
            }
        }
    }

    fn close_thinking(&mut self) -> Result<()> {
        match self.emitter.end_block()? {
            BlockKind::Think => {
                self.state = BridgeState::Plain;
                Ok(())
            }
            other => Err(BridgeError::UnbalancedBlocks {
                open: vec![other.tag()],
            }),
        }
    }

    /// Close a reasoning block left open by the upstream.
    pub fn finish(mut self) -> Result<StreamSummary> {
        if self.state == BridgeState::Thinking {
            debug!("stream ended while thinking, closing collapse block");
            self.close_thinking()?;
        }
        Ok(self.summary)
    }

    /// Consume the whole stream, checking `cancel` between deltas.
    ///
    /// On upstream failure or cancellation the open block is closed before
    /// the error is returned, so the host never sees a dangling tag.
    /// Terminating the chat is left to the caller.
    #[tracing::instrument(
        name = "bridge.relay",
        skip_all,
        fields(
            model = %self.model,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
            bridge.stream_duration_ms = tracing::field::Empty,
        )
    )]
    pub async fn relay<S>(mut self, mut stream: S, cancel: CancellationToken) -> Result<StreamSummary>
    where
        S: Stream<Item = chatbridge_llms::Result<StreamEvent>> + Unpin,
    {
        let start = Instant::now();

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(deltas = self.summary.deltas, "relay cancelled");
                    self.abort()?;
                    return Err(BridgeError::Cancelled);
                }
                next = stream.next() => next,
            };

            match next {
                Some(Ok(event)) => {
                    if let Err(err) = self.handle(event) {
                        record_error(&err);
                        self.abort()?;
                        return Err(err);
                    }
                }
                Some(Err(e)) => {
                    let err = BridgeError::StreamInterrupted(e.to_string());
                    record_error(&err);
                    self.abort()?;
                    return Err(err);
                }
                None => break,
            }
        }

        let duration = start.elapsed();
        record_duration("bridge.stream_duration_ms", duration);

        let mut summary = self.finish()?;
        summary.duration = duration;
        info!(
            deltas = summary.deltas,
            reasoning_chars = summary.reasoning_chars,
            answer_chars = summary.answer_chars,
            duration_ms = duration_millis(duration),
            "relay finished"
        );
        Ok(summary)
    }

    fn abort(&mut self) -> Result<()> {
        self.emitter.close_open_blocks()?;
        self.state = BridgeState::Plain;
        Ok(())
    }
}
