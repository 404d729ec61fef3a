// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Access to the image service, in-process or over HTTP

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{FileStore, Verdict};
use crate::{Result, SwipeError};

/// Operations the triage client needs from the image service
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Filenames currently waiting in the pending directory
    async fn list_pending(&self) -> Result<Vec<String>>;

    /// Move one pending file according to the verdict
    async fn decide(&self, filename: &str, verdict: Verdict) -> Result<()>;
}

#[async_trait]
impl ImageService for FileStore {
    async fn list_pending(&self) -> Result<Vec<String>> {
        FileStore::list_pending(self)
    }

    async fn decide(&self, filename: &str, verdict: Verdict) -> Result<()> {
        FileStore::decide(self, filename, verdict)
    }
}

/// Wire format of `GET /api/images`
#[derive(Debug, Serialize, Deserialize)]
pub struct ImagesResponse {
    pub images: Vec<String>,
}

/// Wire format of `POST /api/approve` and `POST /api/decline`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DecideRequest {
    #[serde(default)]
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// HTTP client for a running SwipeSort service
pub struct HttpImageService {
    client: Client,
    base_url: Url,
}

impl HttpImageService {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| SwipeError::Config(format!("Invalid server URL {}: {}", base_url, e)))?;
        let client = Client::builder().build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| SwipeError::Config(format!("Invalid endpoint {}: {}", path, e)))
    }

    /// URL the service exposes a pending image under, with the name encoded
    /// as a single path segment
    pub fn image_url(&self, filename: &str) -> Result<Url> {
        let mut url = self.endpoint("pending/")?;
        url.path_segments_mut()
            .map_err(|_| SwipeError::Config(format!("Server URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .push(filename);
        Ok(url)
    }

    async fn error_from(response: reqwest::Response) -> SwipeError {
        let status = response.status();
        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };

        match status {
            StatusCode::BAD_REQUEST => SwipeError::InvalidRequest(message),
            StatusCode::NOT_FOUND => SwipeError::NotFound(message),
            _ => SwipeError::Remote { status: status.as_u16(), message },
        }
    }
}

#[async_trait]
impl ImageService for HttpImageService {
    async fn list_pending(&self) -> Result<Vec<String>> {
        let url = self.endpoint("api/images")?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let body: ImagesResponse = response.json().await?;
        Ok(body.images)
    }

    async fn decide(&self, filename: &str, verdict: Verdict) -> Result<()> {
        let url = self.endpoint(&format!("api/{}", verdict))?;
        let request = DecideRequest {
            filename: Some(filename.to_string()),
        };

        debug!("POST {} ({})", url, filename);
        let response = self.client.post(url).json(&request).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let service = HttpImageService::new("http://localhost:3000").unwrap();
        assert_eq!(service.base_url().as_str(), "http://localhost:3000/");

        let service = HttpImageService::new("http://localhost:3000/sorter//").unwrap();
        assert_eq!(service.base_url().as_str(), "http://localhost:3000/sorter/");
    }

    #[test]
    fn test_image_url_encodes_name() {
        let service = HttpImageService::new("http://localhost:3000").unwrap();
        let url = service.image_url("summer day #1?.jpg").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/pending/summer%20day%20%231%3F.jpg");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpImageService::new("not a url"),
            Err(SwipeError::Config(_))
        ));
    }

    #[test]
    fn test_decide_request_tolerates_missing_field() {
        let req: DecideRequest = serde_json::from_str("{}").unwrap();
        assert!(req.filename.is_none());
    }
}
