use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use crawl_core::{FileEntry, JobRequest, JobStatus, StartResponse, DOWNLOAD_ROUTE};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::{ApiError, EngineEvent, FailureKind};

const START_ROUTE: [&str; 2] = ["api", "start"];
const STATUS_ROUTE: [&str; 2] = ["api", "status"];
const FILES_ROUTE: [&str; 2] = ["api", "files"];

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Spacing of status poll cycles.
    pub poll_period: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            poll_period: Duration::from_secs(1),
        }
    }
}

impl ClientSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The four server calls the controller consumes.
#[async_trait]
pub trait JobApi: Send + Sync {
    async fn start_job(&self, request: &JobRequest) -> Result<StartResponse, ApiError>;
    async fn job_status(&self) -> Result<JobStatus, ApiError>;
    async fn list_files(&self) -> Result<Vec<FileEntry>, ApiError>;
    async fn download(&self, filename: &str) -> Result<Bytes, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobApi {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestJobApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, ApiError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl JobApi for ReqwestJobApi {
    async fn start_job(&self, request: &JobRequest) -> Result<StartResponse, ApiError> {
        let body = serde_json::to_vec(request)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))?;
        let response = self
            .client
            .post(endpoint_url(&self.base_url, &START_ROUTE)?)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        // Rejections (already running, bad dates) arrive as 400 with a JSON body.
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        match serde_json::from_slice::<StartResponse>(&bytes) {
            Ok(answer) => Ok(answer),
            Err(_) if !status.is_success() => Err(http_status_error(status)),
            Err(err) => Err(ApiError::new(FailureKind::Decode, err.to_string())),
        }
    }

    async fn job_status(&self) -> Result<JobStatus, ApiError> {
        self.get_json(&STATUS_ROUTE).await
    }

    async fn list_files(&self) -> Result<Vec<FileEntry>, ApiError> {
        let response = self
            .client
            .get(endpoint_url(&self.base_url, &FILES_ROUTE)?)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        match serde_json::from_slice::<FileListing>(&bytes) {
            Ok(FileListing {
                success: Some(false),
                message,
                ..
            }) => Err(ApiError::new(
                FailureKind::Rejected,
                message.unwrap_or_default(),
            )),
            Ok(_) if !status.is_success() => Err(http_status_error(status)),
            Ok(listing) => Ok(listing.files.unwrap_or_default()),
            Err(_) if !status.is_success() => Err(http_status_error(status)),
            Err(err) => Err(ApiError::new(FailureKind::Decode, err.to_string())),
        }
    }

    async fn download(&self, filename: &str) -> Result<Bytes, ApiError> {
        let response = self
            .client
            .get(download_url(&self.base_url, filename)?)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(http_status_error(status));
        }

        let mut body = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            body.extend_from_slice(&chunk);
        }
        Ok(body.freeze())
    }
}

impl ReqwestJobApi {
    async fn get_json<T: DeserializeOwned>(&self, route: &[&str]) -> Result<T, ApiError> {
        let response = self
            .client
            .get(endpoint_url(&self.base_url, route)?)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(http_status_error(status));
        }
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::new(FailureKind::Decode, err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct FileListing {
    #[serde(default)]
    files: Option<Vec<FileEntry>>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

/// Appends `segments` to the base URL's path, percent-encoding each segment.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::new(FailureKind::InvalidUrl, format!("{base} cannot be a base")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Download navigation target for a bare file name.
pub fn download_url(base: &Url, filename: &str) -> Result<Url, ApiError> {
    let [api, download] = DOWNLOAD_ROUTE;
    endpoint_url(base, &[api, download, filename])
}

fn http_status_error(status: reqwest::StatusCode) -> ApiError {
    ApiError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}
