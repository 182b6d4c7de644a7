use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;

/// Object-store sink. Keys are written under `prefix/`; uploads overwrite
/// any existing object at the same key.
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    prefix: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }

    /// Build a sink from an `s3://bucket/prefix` output path using the
    /// ambient AWS credential chain.
    pub async fn from_output_path(output_path: &str) -> Result<Self> {
        let remainder = output_path.strip_prefix("s3://").ok_or_else(|| {
            EtlError::InvalidConfigValueError {
                field: "output_path".to_string(),
                value: output_path.to_string(),
                reason: "Expected an s3://bucket/prefix path".to_string(),
            }
        })?;

        let (bucket, prefix) = match remainder.split_once('/') {
            Some((bucket, prefix)) => (bucket, prefix.trim_end_matches('/')),
            None => (remainder, ""),
        };

        if bucket.is_empty() {
            return Err(EtlError::InvalidConfigValueError {
                field: "output_path".to_string(),
                value: output_path.to_string(),
                reason: "S3 bucket name cannot be empty".to_string(),
            });
        }

        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        let client = S3Client::new(&config);

        Ok(Self::new(client, bucket.to_string(), prefix.to_string()))
    }

    fn key_for(&self, path: &str) -> String {
        if self.prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{}", self.prefix, path)
        }
    }
}

impl Storage for S3Storage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let key = self.key_for(path);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| {
                EtlError::IoError(std::io::Error::other(format!(
                    "Failed to upload s3://{}/{}: {}",
                    self.bucket, key, e
                )))
            })?;

        Ok(format!("s3://{}/{}", self.bucket, key))
    }
}
