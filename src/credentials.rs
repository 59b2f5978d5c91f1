use async_trait::async_trait;

/// Source of the admin key used by the reset flow.
///
/// Returning `None` (or an empty string) aborts the reset without a request.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn request_credential(&self, prompt: &str) -> Option<String>;
}

pub struct NoCredential;

#[async_trait]
impl CredentialProvider for NoCredential {
    async fn request_credential(&self, _prompt: &str) -> Option<String> {
        None
    }
}

/// Always answers with the same key, e.g. one taken from the environment.
pub struct StaticCredential(pub String);

#[async_trait]
impl CredentialProvider for StaticCredential {
    async fn request_credential(&self, _prompt: &str) -> Option<String> {
        Some(self.0.clone())
    }
}
