use crate::library::{SnapshotList, SnapshotUpload};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid recording name '{0}'")]
    InvalidName(String),
}

/// REST client for recordings and snapshots stored by the media server.
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    http: reqwest::Client,
    base: String,
}

impl MediaLibrary {
    pub fn new(api_base: &str) -> Self {
        Self::with_client(reqwest::Client::new(), api_base)
    }

    pub fn with_client(http: reqwest::Client, api_base: &str) -> Self {
        Self {
            http,
            base: api_base.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn list_recordings(&self) -> Result<Vec<String>, LibraryError> {
        let res = self.http.get(self.url("/api/recordings")).send().await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn delete_recording(&self, name: &str) -> Result<Value, LibraryError> {
        if name.is_empty() || name.contains(['/', '?', '#']) {
            return Err(LibraryError::InvalidName(name.to_owned()));
        }
        let res = self
            .http
            .delete(self.url(&format!("/api/recordings/{}", name)))
            .send()
            .await?;
        info!("Deleted recording '{}'", name);
        Ok(check(res).await?.json().await?)
    }

    /// Upload a finished WebM recording as multipart field `video`.
    pub async fn upload_recording(&self, filename: &str, data: Bytes) -> Result<Value, LibraryError> {
        let size = data.len();
        let part = Part::bytes(data.to_vec())
            .file_name(filename.to_owned())
            .mime_str("video/webm")?;
        let form = Form::new().part("video", part);

        let res = self
            .http
            .post(self.url("/api/save-recording"))
            .multipart(form)
            .send()
            .await?;
        info!("Uploaded recording '{}' ({} bytes)", filename, size);
        Ok(check(res).await?.json().await?)
    }

    pub async fn list_snapshots(&self) -> Result<SnapshotList, LibraryError> {
        let res = self.http.get(self.url("/api/snapshots/")).send().await?;
        Ok(check(res).await?.json().await?)
    }

    pub async fn delete_snapshot(&self, id: i64) -> Result<Value, LibraryError> {
        let res = self
            .http
            .delete(self.url("/api/snapshots/"))
            .query(&[("id", id)])
            .send()
            .await?;
        info!("Deleted snapshot {}", id);
        Ok(check(res).await?.json().await?)
    }

    pub async fn save_snapshot(&self, upload: &SnapshotUpload) -> Result<Value, LibraryError> {
        debug!("Saving snapshot '{}'", upload.filename);
        let res = self
            .http
            .post(self.url("/api/save-snapshots/"))
            .json(upload)
            .send()
            .await?;
        Ok(check(res).await?.json().await?)
    }
}

async fn check(res: Response) -> Result<Response, LibraryError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(LibraryError::Status { status, body })
}
