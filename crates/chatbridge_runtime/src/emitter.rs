//! Protocol emitter: the single writer to the host channel.
//!
//! Every event is serialized to one JSON line, written in a single call and
//! flushed before the next event is produced, so a host reading line by line
//! can render incrementally and never observes a partial record.
//!
//! The emitter also owns the invocation's [`BlockStack`]. Blocks can only be
//! closed from the top, and `terminate_chat` refuses to run while any block
//! is still open.

use std::io::Write;

use chatbridge_core::{BlockKind, BlockStack, BridgeError, OutboundEvent, Result};

pub struct ProtocolEmitter<W: Write> {
    writer: W,
    blocks: BlockStack,
    events_written: usize,
    terminated: bool,
}

impl<W: Write> ProtocolEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            blocks: BlockStack::new(),
            events_written: 0,
            terminated: false,
        }
    }

    fn emit(&mut self, event: OutboundEvent) -> Result<()> {
        if self.terminated {
            return Err(BridgeError::Terminated);
        }

        let mut line = serde_json::to_vec(&event)?;
        line.push(b'\n');
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        self.events_written += 1;

        tracing::trace!(method = event.method(), seq = self.events_written, "event emitted");
        Ok(())
    }

    /// Append raw text or markup to the visible chat stream.
    pub fn push_chat(&mut self, content: impl Into<String>) -> Result<()> {
        self.emit(OutboundEvent::push_chat(content))
    }

    pub fn start_block(&mut self, kind: BlockKind) -> Result<()> {
        self.push_chat(kind.open_tag())?;
        self.blocks.push(kind);
        Ok(())
    }

    /// Close the innermost open block.
    pub fn end_block(&mut self) -> Result<BlockKind> {
        let kind = self.blocks.top().ok_or(BridgeError::NoOpenBlock)?;
        self.push_chat(kind.close_tag())?;
        self.blocks.pop();
        Ok(kind)
    }

    pub fn push_block(&mut self, kind: BlockKind, content: impl Into<String>) -> Result<()> {
        self.start_block(kind)?;
        self.push_chat(content)?;
        self.end_block()?;
        Ok(())
    }

    pub fn push_meta(&mut self, content: impl Into<String>) -> Result<()> {
        self.push_block(BlockKind::Meta, content)
    }

    /// Metadata as a single inline record: `\n<metadata> .. </metadata>\n`.
    pub fn push_metadata(&mut self, content: impl AsRef<str>) -> Result<()> {
        let kind = BlockKind::Meta;
        self.push_chat(format!(
            "\n{} {} {}\n",
            kind.open_tag(),
            content.as_ref(),
            kind.close_tag()
        ))
    }

    pub fn apply_diff(&mut self, patch: Vec<String>, matches: Vec<[usize; 2]>) -> Result<()> {
        self.emit(OutboundEvent::apply_diff(patch, matches))
    }

    /// Diagnostic text, not shown in the primary chat view.
    pub fn log(&mut self, content: impl Into<String>) -> Result<()> {
        self.emit(OutboundEvent::log(content))
    }

    /// Close every open block, innermost first. Returns how many were closed.
    pub fn close_open_blocks(&mut self) -> Result<usize> {
        let mut closed = 0;
        while !self.blocks.is_empty() {
            self.end_block()?;
            closed += 1;
        }
        Ok(closed)
    }

    /// Final event of the invocation. Fails if a block is still open.
    pub fn terminate_chat(&mut self) -> Result<()> {
        self.blocks.ensure_empty()?;
        self.emit(OutboundEvent::terminate_chat())?;
        self.terminated = true;
        Ok(())
    }

    pub fn blocks(&self) -> &BlockStack {
        &self.blocks
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn events_written(&self) -> usize {
        self.events_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Parse emitted JSON lines back into events.
#[cfg(test)]
pub(crate) fn parse_events(bytes: &[u8]) -> Vec<OutboundEvent> {
    std::str::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter() -> ProtocolEmitter<Vec<u8>> {
        ProtocolEmitter::new(Vec::new())
    }

    #[test]
    fn test_one_record_per_line() {
        let mut e = emitter();
        e.push_chat("multi\nline").unwrap();
        e.log("debug").unwrap();
        e.terminate_chat().unwrap();

        let out = String::from_utf8(e.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"method":"push_chat","content":"multi\nline"}"#);
        assert_eq!(lines[1], r#"{"method":"log","content":"debug"}"#);
        assert_eq!(lines[2], r#"{"method":"terminate_chat"}"#);
    }

    #[test]
    fn test_push_block() {
        let mut e = emitter();
        e.push_block(BlockKind::Think, "pondering").unwrap();
        assert!(e.blocks().is_empty());

        let events = parse_events(&e.into_inner());
        let contents: Vec<_> = events.iter().filter_map(|ev| ev.chat_content()).collect();
        assert_eq!(contents, vec!["<collapse>", "pondering", "</collapse>"]);
    }

    #[test]
    fn test_push_meta() {
        let mut e = emitter();
        e.push_meta("info").unwrap();

        let events = parse_events(&e.into_inner());
        let contents: Vec<_> = events.iter().filter_map(|ev| ev.chat_content()).collect();
        assert_eq!(contents, vec!["<metadata>", "info", "</metadata>"]);
    }

    #[test]
    fn test_push_metadata_inline() {
        let mut e = emitter();
        e.push_metadata("Current File: src/lib.rs").unwrap();

        let events = parse_events(&e.into_inner());
        assert_eq!(
            events,
            vec![OutboundEvent::push_chat(
                "\n<metadata> Current File: src/lib.rs </metadata>\n"
            )]
        );
    }

    #[test]
    fn test_nested_blocks_close_lifo() {
        let mut e = emitter();
        e.start_block(BlockKind::Think).unwrap();
        e.start_block(BlockKind::Meta).unwrap();

        assert_eq!(e.end_block().unwrap(), BlockKind::Meta);
        assert_eq!(e.end_block().unwrap(), BlockKind::Think);
        assert!(matches!(e.end_block(), Err(BridgeError::NoOpenBlock)));
    }

    #[test]
    fn test_terminate_refuses_open_block() {
        let mut e = emitter();
        e.start_block(BlockKind::Think).unwrap();

        let err = e.terminate_chat().unwrap_err();
        assert!(matches!(err, BridgeError::UnbalancedBlocks { .. }));
        assert!(!e.is_terminated());

        assert_eq!(e.close_open_blocks().unwrap(), 1);
        e.terminate_chat().unwrap();
        assert!(e.is_terminated());
    }

    #[test]
    fn test_nothing_after_terminate() {
        let mut e = emitter();
        e.terminate_chat().unwrap();

        assert!(matches!(e.push_chat("late"), Err(BridgeError::Terminated)));
        assert!(matches!(e.terminate_chat(), Err(BridgeError::Terminated)));
        assert_eq!(e.events_written(), 1);
    }

    #[test]
    fn test_apply_diff_passthrough() {
        let mut e = emitter();
        e.apply_diff(vec!["fn a() {}".to_string()], vec![[0, 0], [3, 4]])
            .unwrap();

        let out = String::from_utf8(e.into_inner()).unwrap();
        assert_eq!(
            out.trim_end(),
            r#"{"method":"apply_diff","patch":["fn a() {}"],"matches":[[0,0],[3,4]]}"#
        );
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "host went away"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_surfaces_and_keeps_stack() {
        let mut e = ProtocolEmitter::new(FailingWriter);
        assert!(matches!(e.start_block(BlockKind::Think), Err(BridgeError::Io(_))));
        assert!(e.blocks().is_empty());
        assert_eq!(e.events_written(), 0);
    }
}
