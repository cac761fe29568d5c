//! Upstream notify endpoint: wire types and HTTP source.
//!
//! Only the fields the pipeline consumes are modelled. Records are parsed leniently so
//! one odd record type cannot poison the whole envelope.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::domain::FeedKind;
use crate::error::{Result, TrackerError};

/// Envelope status marking a usable payload
pub const STATUS_OK: &str = "OK";

/// Top-level response of the notify endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEnvelope {
    pub status: String,
    #[serde(default)]
    pub data: Vec<Value>,
}

impl FeedEnvelope {
    /// Records of an OK envelope; any other status is an upstream failure
    pub fn into_records(self) -> Result<Vec<FeedRecord>> {
        if self.status != STATUS_OK {
            return Err(TrackerError::UpstreamStatus(self.status));
        }
        Ok(self.data.iter().filter_map(FeedRecord::from_value).collect())
    }
}

/// One upstream record, reduced to the consumed fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedRecord {
    pub cmd: i64,
    pub sid: Option<u64>,
    pub d1: Option<u8>,
    pub d2: Option<u8>,
    pub d3: Option<u8>,
}

impl FeedRecord {
    /// Parse a record; `None` when it has no numeric `cmd`
    pub fn from_value(value: &Value) -> Option<Self> {
        let cmd = value.get("cmd")?.as_i64()?;
        Some(Self {
            cmd,
            sid: value.get("sid").and_then(as_u64_lenient),
            d1: die(value, "d1"),
            d2: die(value, "d2"),
            d3: die(value, "d3"),
        })
    }
}

fn as_u64_lenient(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn die(value: &Value, key: &str) -> Option<u8> {
    value
        .get(key)
        .and_then(as_u64_lenient)
        .and_then(|d| u8::try_from(d).ok())
}

/// Source of feed envelopes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<FeedEnvelope>;
}

/// reqwest-backed source for one feed
pub struct HttpFeedSource {
    client: reqwest::Client,
    base_url: String,
    platform_id: String,
    gid: String,
}

impl HttpFeedSource {
    pub fn new(config: &UpstreamConfig, kind: FeedKind) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            platform_id: config.platform_id.clone(),
            gid: config.gid(kind).to_string(),
        })
    }

    pub fn gid(&self) -> &str {
        &self.gid
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<FeedEnvelope> {
        debug!("Fetching feed gid={}", self.gid);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("platform_id", self.platform_id.as_str()), ("gid", self.gid.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TrackerError::UpstreamStatus(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
