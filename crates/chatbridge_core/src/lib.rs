pub mod block;
pub mod error;
pub mod event;
pub mod file;
pub mod message;
pub mod snapshot;

pub use block::{BlockKind, BlockStack};
pub use error::{BridgeError, Result};
pub use event::OutboundEvent;
pub use file::FileRef;
pub use message::{ChatMessage, Role};
pub use snapshot::{Credentials, EditorSnapshot};
