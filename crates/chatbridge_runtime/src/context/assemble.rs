//! Context document assembly.

use std::io::Write;

use chatbridge_core::{EditorSnapshot, FileRef, Result};
use tracing::warn;

use crate::config::MissingFilePolicy;
use crate::emitter::ProtocolEmitter;

/// Builds the ordered context document (other open files, current file,
/// selection) and reports which files were used as metadata events.
pub struct ContextAssembler<'a> {
    snapshot: &'a EditorSnapshot,
    missing_files: MissingFilePolicy,
}

impl<'a> ContextAssembler<'a> {
    pub fn new(snapshot: &'a EditorSnapshot) -> Self {
        Self {
            snapshot,
            missing_files: MissingFilePolicy::default(),
        }
    }

    pub fn with_missing_files(mut self, policy: MissingFilePolicy) -> Self {
        self.missing_files = policy;
        self
    }

    /// Assemble the context string.
    ///
    /// Always emits exactly one opened-files metadata event and, unless that
    /// step fails, exactly one current-file metadata event.
    pub fn assemble<W: Write>(&self, emitter: &mut ProtocolEmitter<W>) -> Result<String> {
        let mut sections = Vec::new();

        let (opened, failure) = self.read_opened_files(emitter)?;
        if !opened.is_empty() {
            sections.push(format_section("Other relevant files", &opened.join("\n\n")));
        }

        emitter.push_metadata(format!(
            "Opened Files: {}",
            format_path_list(&self.snapshot.opened_file_paths())
        ))?;

        if let Some(err) = failure {
            return Err(err);
        }

        let current = self.snapshot.current_file().path();
        sections.push(format_section(
            "Current File",
            &format!(
                "Here is the file I'm looking at (`{}`):\n\n{}",
                current,
                format_code_block(self.snapshot.current_file_content())
            ),
        ));

        emitter.push_metadata(format!("Current File: {}", current))?;

        if let Some(selection) = self.snapshot.meaningful_selection() {
            sections.push(format_section(
                "Selection",
                &format!(
                    "This is the code snippet that I'm referring to\n\n{}",
                    format_code_block(selection)
                ),
            ));
        }

        Ok(sections.join("\n\n"))
    }

    /// Render each readable opened file. Under `Fail`, the first read error is
    /// returned alongside so the caller can still emit metadata first.
    fn read_opened_files<W: Write>(
        &self,
        emitter: &mut ProtocolEmitter<W>,
    ) -> Result<(Vec<String>, Option<chatbridge_core::BridgeError>)> {
        let mut rendered = Vec::with_capacity(self.snapshot.opened_files().len());

        for file in self.snapshot.opened_files() {
            match file.read_content() {
                Ok(content) => rendered.push(format_file(file, &content)),
                Err(err) => match self.missing_files {
                    MissingFilePolicy::Fail => return Ok((rendered, Some(err))),
                    MissingFilePolicy::Skip => {
                        warn!(path = file.path(), error = %err, "skipping unreadable opened file");
                        emitter.log(format!("skipping opened file {}: {}", file.path(), err))?;
                    }
                },
            }
        }

        Ok((rendered, None))
    }
}

fn format_file(file: &FileRef, content: &str) -> String {
    format!("Path: `{}`\n\n{}", file.path(), format_code_block(content))
}

/// `['a.py', 'b.py']`, the list form the host already displays.
fn format_path_list(paths: &[&str]) -> String {
    let quoted: Vec<String> = paths
        .iter()
        .map(|p| format!("'{}'", p.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect();
    format!("[{}]", quoted.join(", "))
}

fn format_code_block(content: &str) -> String {
    format!("```\n{}\n```", content)
}

fn format_section(title: &str, content: &str) -> String {
    format!("## {}\n\n{}", title, content)
}
