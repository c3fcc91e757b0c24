use anyhow::Result;
use async_trait::async_trait;

/// A text-in, text-out completion service.
///
/// The pipeline only ever needs "send a prompt, get free-form text back";
/// structure (JSON extraction, validation) is imposed by the caller.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
