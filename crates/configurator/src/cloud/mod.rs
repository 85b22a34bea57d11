//! Client for the remote configuration service.
//!
//! The service exposes a Supabase-compatible REST surface: an object store
//! with public buckets for models and textures, and a `configurations`
//! table holding named `{config, overrides}` payloads.

pub mod error;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::json;
use tracing::{debug, info, warn};

use shared::{ConfigurationPayload, SavedConfiguration};

pub use error::{CloudError, CloudResult};

const CONFIGURATIONS_TABLE: &str = "configurations";
const CACHE_CONTROL_SECS: u32 = 3600;

/// Storage buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Models,
    Textures,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Models => "models",
            Bucket::Textures => "textures",
        }
    }
}

/// Replace every character outside `[A-Za-z0-9.-]` with `_`
pub fn safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Object path for an upload: `<millis>_<safe name>`
pub fn object_path(file_name: &str, millis: u128) -> String {
    format!("{millis}_{}", safe_file_name(file_name))
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// REST client for storage and configuration records
#[derive(Debug, Clone)]
pub struct CloudClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CloudClient {
    /// Build a client; both URL and key must be non-empty
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> CloudResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        let api_key = api_key.trim();
        if base_url.is_empty() || api_key.is_empty() {
            return Err(CloudError::NotConfigured);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public URL of a stored object
    pub fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            bucket.as_str(),
            path
        )
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check(resp: reqwest::Response) -> CloudResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let err = CloudError::from_response(status.as_u16(), &body);
        warn!(status = status.as_u16(), error = %err, "Cloud request failed");
        Err(err)
    }

    /// Upload a file and return its public URL. Never overwrites an object.
    pub async fn store(&self, bucket: Bucket, file_name: &str, bytes: Vec<u8>) -> CloudResult<String> {
        let path = object_path(file_name, now_millis());
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url,
            bucket.as_str(),
            path
        );
        debug!(bucket = bucket.as_str(), %path, size = bytes.len(), "Uploading object");

        let resp = self
            .authorized(self.http.post(&url))
            .header("x-upsert", "false")
            .header("cache-control", CACHE_CONTROL_SECS.to_string())
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .await?;
        Self::check(resp).await?;

        let public = self.public_url(bucket, &path);
        if reqwest::Url::parse(&public).is_err() {
            return Err(CloudError::MissingPublicUrl { path });
        }
        info!(%public, "Upload complete");
        Ok(public)
    }

    /// Upload a local file
    pub async fn store_file(&self, bucket: Bucket, path: &std::path::Path) -> CloudResult<String> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        self.store(bucket, &name, bytes).await
    }

    /// Persist a named configuration
    pub async fn save(&self, name: &str, payload: &ConfigurationPayload) -> CloudResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CloudError::EmptyName);
        }
        let url = format!("{}/rest/v1/{CONFIGURATIONS_TABLE}", self.base_url);
        let resp = self
            .authorized(self.http.post(&url))
            .header("prefer", "return=minimal")
            .json(&json!([{ "name": name, "data": payload }]))
            .send()
            .await?;
        Self::check(resp).await?;
        info!(name, "Configuration saved");
        Ok(())
    }

    /// Most recent configurations, newest first
    pub async fn list_recent(&self, limit: usize) -> CloudResult<Vec<SavedConfiguration>> {
        let url = format!(
            "{}/rest/v1/{CONFIGURATIONS_TABLE}?select=*&order=created_at.desc&limit={limit}",
            self.base_url
        );
        let resp = self.authorized(self.http.get(&url)).send().await?;
        let resp = Self::check(resp).await?;
        let text = resp.text().await?;
        let records: Vec<SavedConfiguration> =
            serde_json::from_str(&text).map_err(|e| CloudError::Decode(e.to_string()))?;
        debug!(count = records.len(), "Listed configurations");
        Ok(records)
    }

    /// The newest stored configuration, if any
    pub async fn latest(&self) -> CloudResult<Option<SavedConfiguration>> {
        Ok(self.list_recent(1).await?.into_iter().next())
    }
}
