use crate::modules::common::multipart_form_data::{filename_with_timestamp, UploadedFile};
use axum::{async_trait, body::Bytes};
use aws_sdk_s3 as s3;
use s3::error::DisplayErrorContext;
use std::{sync::Arc, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid file, a filename and file data must be present")]
    InvalidInput,

    /// the asset host rejected the upload, keeps the remote error text
    #[error("failed to upload image: {0}")]
    Failed(String),

    #[error("failed to upload image: timed out after {0:?}")]
    TimedOut(Duration),
}

/// The remote object store holding uploaded assets.
///
/// Abstracted behind a trait so route handlers never talk to the asset host
/// directly and tests can substitute a fake.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, key: &str, bytes: Bytes) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct S3Storage {
    client: s3::Client,
    bucket: String,
}

impl S3Storage {
    pub async fn new(bucket: String) -> Self {
        let aws_cfg = aws_config::load_from_env().await;

        Self {
            client: s3::Client::new(&aws_cfg),
            bucket,
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, key: &str, bytes: Bytes) -> anyhow::Result<()> {
        let result = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(bytes.into())
            .send()
            .await;

        if let Err(err) = result {
            tracing::error!("[S3] failed to upload S3 object: {}", key);
            return Err(anyhow::anyhow!("{}", DisplayErrorContext(err)));
        }

        Ok(())
    }
}

/// Uploads car images to the remote object storage, returning their public URL.
///
/// Issues exactly one remote call per upload, bounded by `timeout`, with no
/// retrying: a failed attempt is a failed upload.
#[derive(Clone)]
pub struct ImageUploader {
    storage: Arc<dyn ObjectStorage>,
    public_base_url: String,
    timeout: Duration,
}

impl ImageUploader {
    pub fn new(storage: Arc<dyn ObjectStorage>, public_base_url: String, timeout: Duration) -> Self {
        Self {
            storage,
            public_base_url,
            timeout,
        }
    }

    /// uploads a image under a timestamped object key in the `car/` folder,
    /// eg: `car/front-view_02-10-2023_10:20:59.jpeg`
    pub async fn upload(&self, file: &UploadedFile) -> Result<String, UploadError> {
        let filename = file
            .filename
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(UploadError::InvalidInput)?;

        if file.contents.is_empty() {
            return Err(UploadError::InvalidInput);
        }

        let key = format!("car/{}", filename_with_timestamp(filename));

        let put = self.storage.put(&key, file.contents.clone());

        match tokio::time::timeout(self.timeout, put).await {
            Ok(Ok(())) => Ok(format!(
                "{}/{}",
                self.public_base_url.trim_end_matches('/'),
                key
            )),
            Ok(Err(err)) => Err(UploadError::Failed(err.to_string())),
            Err(_) => Err(UploadError::TimedOut(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeStorage {
        puts: AtomicUsize,
        fail_with: Option<String>,
        delay: Option<Duration>,
    }

    impl FakeStorage {
        fn succeeding() -> Arc<FakeStorage> {
            Arc::new(FakeStorage {
                puts: AtomicUsize::new(0),
                fail_with: None,
                delay: None,
            })
        }

        fn failing(message: &str) -> Arc<FakeStorage> {
            Arc::new(FakeStorage {
                puts: AtomicUsize::new(0),
                fail_with: Some(String::from(message)),
                delay: None,
            })
        }

        fn slow(delay: Duration) -> Arc<FakeStorage> {
            Arc::new(FakeStorage {
                puts: AtomicUsize::new(0),
                fail_with: None,
                delay: Some(delay),
            })
        }
    }

    #[async_trait]
    impl ObjectStorage for FakeStorage {
        async fn put(&self, _key: &str, _bytes: Bytes) -> anyhow::Result<()> {
            self.puts.fetch_add(1, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            match &self.fail_with {
                Some(message) => Err(anyhow::anyhow!(message.clone())),
                None => Ok(()),
            }
        }
    }

    fn uploader(storage: Arc<FakeStorage>) -> ImageUploader {
        ImageUploader::new(
            storage,
            String::from("https://cdn.example.com/"),
            Duration::from_millis(50),
        )
    }

    fn png_file() -> UploadedFile {
        UploadedFile {
            filename: Some(String::from("front-view.png")),
            content_type: Some(String::from("image/png")),
            contents: Bytes::from_static(b"not really a png"),
        }
    }

    #[tokio::test]
    async fn upload_issues_exactly_one_remote_call_and_returns_the_public_url() {
        let storage = FakeStorage::succeeding();

        let url = uploader(storage.clone())
            .upload(&png_file())
            .await
            .expect("upload should succeed");

        assert_eq!(storage.puts.load(Ordering::SeqCst), 1);
        assert!(url.starts_with("https://cdn.example.com/car/front-view_"));
        assert!(url.ends_with(".png"));
    }

    #[tokio::test]
    async fn upload_wraps_the_remote_error_message() {
        let storage = FakeStorage::failing("remote said no");

        let err = uploader(storage.clone())
            .upload(&png_file())
            .await
            .expect_err("upload should fail");

        assert_eq!(storage.puts.load(Ordering::SeqCst), 1);
        assert!(err.to_string().starts_with("failed to upload image:"));
        assert!(err.to_string().contains("remote said no"));
    }

    #[tokio::test]
    async fn upload_rejects_a_file_without_a_filename_before_any_remote_call() {
        let storage = FakeStorage::succeeding();

        let mut file = png_file();
        file.filename = None;

        let err = uploader(storage.clone())
            .upload(&file)
            .await
            .expect_err("upload should fail");

        assert!(matches!(err, UploadError::InvalidInput));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upload_rejects_a_file_without_data_before_any_remote_call() {
        let storage = FakeStorage::succeeding();

        let mut file = png_file();
        file.contents = Bytes::new();

        let err = uploader(storage.clone())
            .upload(&file)
            .await
            .expect_err("upload should fail");

        assert!(matches!(err, UploadError::InvalidInput));
        assert_eq!(storage.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upload_fails_when_the_remote_call_exceeds_the_timeout() {
        let storage = FakeStorage::slow(Duration::from_secs(5));

        let err = uploader(storage.clone())
            .upload(&png_file())
            .await
            .expect_err("upload should time out");

        assert!(matches!(err, UploadError::TimedOut(_)));
        assert!(err.to_string().starts_with("failed to upload image:"));
    }
}
