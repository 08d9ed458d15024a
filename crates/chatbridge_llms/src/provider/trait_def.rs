use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GenerateRequest, GenerateStream, Headers};

/// A streaming chat-completion backend.
#[async_trait]
pub trait Provider: Send + Sync {
    fn provider_id(&self) -> &str;

    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers;

    /// Open a response stream. Resolves only after the upstream accepted the
    /// request; connection and auth failures are returned here.
    async fn stream(&self, request: GenerateRequest) -> Result<GenerateStream>;
}
