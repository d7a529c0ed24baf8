//! Network access used by the merge pipeline: fetching source photos and posting
//! the remote batch. Every request is bounded by the configured timeouts.

use crate::config::AppConfig;
use crate::error::{Error, Result};
use serde::Serialize;
use std::io::Read;
use ureq::{Agent, AgentBuilder};

/// One element of the remote batch: the record id and its photo, base64 encoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedImage {
    pub id: String,
    pub image: String,
}

pub trait ImageTransport: Send + Sync {
    /// Fetches the raw bytes behind `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    /// Posts the whole batch as one JSON array to `endpoint`.
    fn post_batch(&self, endpoint: &str, batch: &[EncodedImage]) -> Result<()>;
}

pub struct HttpTransport {
    agent: Agent,
    max_image_bytes: u64,
}

impl HttpTransport {
    pub fn new(config: &AppConfig) -> Self {
        let agent = AgentBuilder::new()
            .timeout_connect(config.connect_timeout())
            .timeout(config.request_timeout())
            .build();
        Self {
            agent,
            max_image_bytes: config.max_image_bytes,
        }
    }
}

impl ImageTransport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| Error::Network(e.to_string()))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(self.max_image_bytes + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| Error::Network(e.to_string()))?;

        if bytes.len() as u64 > self.max_image_bytes {
            return Err(Error::Network(format!(
                "image larger than {} bytes",
                self.max_image_bytes
            )));
        }
        Ok(bytes)
    }

    fn post_batch(&self, endpoint: &str, batch: &[EncodedImage]) -> Result<()> {
        self.agent
            .post(endpoint)
            .send_json(batch)
            .map(|_| ())
            .map_err(|e| Error::Network(e.to_string()))
    }
}
