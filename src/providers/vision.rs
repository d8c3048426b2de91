/// Object-detection aggregator client
///
/// Fans one image URL out to several vision engines through an aggregator
/// API. Detection is best-effort: a transport failure or bad status returns
/// None so the caller can skip annotation instead of aborting the flow.
use crate::{
    config::VisionProviderConfig,
    error::DeskResult,
    providers::build_http_client,
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

/// Aggregator response, keyed by engine name
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct DetectionPayload {
    pub engines: HashMap<String, EngineDetections>,
}

/// One engine's detections
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineDetections {
    #[serde(default)]
    pub items: Vec<RawDetection>,
}

/// A single raw detection item
#[derive(Debug, Clone, Deserialize)]
pub struct RawDetection {
    pub label: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub x_min: Option<f64>,
    #[serde(default)]
    pub x_max: Option<f64>,
    #[serde(default)]
    pub y_min: Option<f64>,
    #[serde(default)]
    pub y_max: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

/// Object-detection aggregator client
#[derive(Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    config: VisionProviderConfig,
}

impl VisionClient {
    pub fn new(config: VisionProviderConfig) -> DeskResult<Self> {
        Ok(Self {
            http: build_http_client()?,
            config,
        })
    }

    /// Engines this client fans out to, in configured order
    pub fn engines(&self) -> &[String] {
        &self.config.engines
    }

    /// Run object detection on an image URL
    ///
    /// Returns None on transport failure or non-success status, meaning
    /// "skip annotation". Undecodable bodies also degrade to None.
    pub async fn detect_objects(&self, image_url: &str) -> Option<DetectionPayload> {
        let body = json!({
            "providers": self.config.engines.join(","),
            "file_url": image_url,
        });

        let response = match self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Object detection transport failure: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(
                "Object detection returned status {}, skipping annotation",
                response.status()
            );
            return None;
        }

        match response.json::<DetectionPayload>().await {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!("Object detection response undecodable: {}", e);
                None
            }
        }
    }
}
