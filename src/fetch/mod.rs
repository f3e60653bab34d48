mod http;

pub use http::UpdateClient;

use async_trait::async_trait;

use crate::error::NetworkError;

/// Trait for retrieving raw CRX container bytes by extension identifier.
///
/// The HTTP update-service client is the production implementation; tests
/// or embedders can substitute any other transport.
#[async_trait]
pub trait PackageSource: Send + Sync {
    /// Fetch the complete container for the given extension ID into memory.
    async fn fetch(&self, extension_id: &str) -> Result<Vec<u8>, NetworkError>;
}
