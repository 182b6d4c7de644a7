use crate::utils::error::Result;
use async_trait::async_trait;

/// Sink seam. `write_file` overwrites whatever is already at `path` and
/// returns the full location of the written object.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Raw: Send;
    type Row: Send;

    fn name(&self) -> &str;

    async fn extract(&self) -> Result<Vec<Self::Raw>>;

    fn transform(&self, records: Vec<Self::Raw>) -> Result<Vec<Self::Row>>;

    async fn load(&self, rows: Vec<Self::Row>) -> Result<String>;
}
