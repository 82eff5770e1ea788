use async_trait::async_trait;

use crate::domain::Credential;

/// Lists the model identifiers a credential can use.
#[async_trait]
pub trait ModelDirectory: Send + Sync {
    /// Never fails: transport and status errors are logged and yield an
    /// empty list, which callers treat as "no models available".
    async fn list_models(&self, credential: &Credential) -> Vec<String>;
}
