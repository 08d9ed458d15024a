//! Editor state for a single invocation, parsed from the host payload.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{BridgeError, Result};
use crate::file::FileRef;
use crate::message::ChatMessage;

/// Endpoint credentials supplied by the host.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Read-only view of the editor for one invocation.
///
/// Built once from the host payload by [`EditorSnapshot::from_json`] or
/// [`EditorSnapshot::from_value`]; construction verifies that every required
/// field is present and that the current file exists on disk. Fields are only
/// reachable through accessors, so the snapshot cannot change afterwards.
#[derive(Debug, Clone)]
pub struct EditorSnapshot {
    repo_root: PathBuf,
    repo_files: Vec<FileRef>,
    current_file: FileRef,
    edit_file: Option<FileRef>,
    current_file_content: String,
    opened_files: Vec<FileRef>,
    selection: Option<String>,
    clipboard: Option<String>,
    cursor_row: usize,
    cursor_column: usize,
    chat_history: Vec<ChatMessage>,
    terminal_history: Option<String>,
    terminal_snapshot: Option<Vec<String>>,
    prompt: String,
    credentials: Credentials,
}

impl EditorSnapshot {
    pub fn from_json(payload: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(payload)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let mut fields = match value {
            Value::Object(map) => map,
            other => {
                return Err(BridgeError::InvalidField {
                    field: "payload",
                    source: serde::de::Error::custom(format!(
                        "expected a JSON object, got {}",
                        type_name(&other)
                    )),
                })
            }
        };

        let current_file_content: String = required(&mut fields, "current_file_content")?;
        let selection: Option<String> = required(&mut fields, "selection")?;
        let cursor_row: usize = required(&mut fields, "cursor_row")?;
        let cursor_column: usize = required(&mut fields, "cursor_column")?;
        let api_key: String = required(&mut fields, "api_key")?;
        let api_url: String = required(&mut fields, "api_url")?;
        let prompt: String = required(&mut fields, "prompt")?;
        let terminal_history: Option<String> = optional(&mut fields, "terminal_history")?;
        let terminal_snapshot: Option<Vec<String>> = optional(&mut fields, "terminal_snapshot")?;
        let repo_path: String = required(&mut fields, "repo_path")?;
        let current_file: String = required(&mut fields, "current_file")?;
        let edit_file: Option<String> = optional(&mut fields, "edit_file")?;
        let repo: Vec<String> = required(&mut fields, "repo")?;
        let opened_files: Vec<String> = required(&mut fields, "opened_files")?;
        let chat_history: Vec<ChatMessage> = required(&mut fields, "chat_history")?;
        let clipboard: Option<String> = match optional(&mut fields, "clipboard")? {
            Some(text) => Some(text),
            None => optional(&mut fields, "clip_board")?,
        };

        let repo_root = PathBuf::from(repo_path);
        let current_file = FileRef::new(current_file, &repo_root);
        if !current_file.exists() {
            return Err(BridgeError::file_unavailable(
                current_file.path(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "current file does not exist"),
            ));
        }

        Ok(Self {
            repo_files: repo.into_iter().map(|p| FileRef::new(p, &repo_root)).collect(),
            edit_file: edit_file.map(|p| FileRef::new(p, &repo_root)),
            opened_files: opened_files
                .into_iter()
                .map(|p| FileRef::new(p, &repo_root))
                .collect(),
            current_file,
            repo_root,
            current_file_content,
            selection,
            clipboard,
            cursor_row,
            cursor_column,
            chat_history,
            terminal_history,
            terminal_snapshot,
            prompt,
            credentials: Credentials { api_key, api_url },
        })
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn repo_files(&self) -> &[FileRef] {
        &self.repo_files
    }

    pub fn current_file(&self) -> &FileRef {
        &self.current_file
    }

    pub fn edit_file(&self) -> Option<&FileRef> {
        self.edit_file.as_ref()
    }

    pub fn current_file_content(&self) -> &str {
        &self.current_file_content
    }

    pub fn opened_files(&self) -> &[FileRef] {
        &self.opened_files
    }

    /// Selection exactly as sent, possibly blank.
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    pub fn cursor_column(&self) -> usize {
        self.cursor_column
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        &self.chat_history
    }

    pub fn terminal_history(&self) -> Option<&str> {
        self.terminal_history.as_deref()
    }

    pub fn terminal_snapshot(&self) -> Option<&[String]> {
        self.terminal_snapshot.as_deref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Selection text, only when it has non-whitespace content.
    pub fn meaningful_selection(&self) -> Option<&str> {
        self.selection
            .as_deref()
            .filter(|selection| !selection.trim().is_empty())
    }

    /// Terminal snapshot lines joined with newlines; empty when the host sent none.
    pub fn terminal_snapshot_text(&self) -> String {
        self.terminal_snapshot
            .as_ref()
            .map(|lines| lines.join("\n"))
            .unwrap_or_default()
    }

    pub fn opened_file_paths(&self) -> Vec<&str> {
        self.opened_files.iter().map(|f| f.path()).collect()
    }
}

fn required<T: DeserializeOwned>(fields: &mut Map<String, Value>, field: &'static str) -> Result<T> {
    let value = fields.remove(field).ok_or(BridgeError::MissingField(field))?;
    serde_json::from_value(value).map_err(|source| BridgeError::InvalidField { field, source })
}

fn optional<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Option<T>> {
    match fields.remove(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| BridgeError::InvalidField { field, source }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
