use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::{json, Value};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::{
    capture::DataUri,
    config::GatewayConfig,
    error::{GatewayError, Result},
    gateway::{
        prompts::{animate_prompt, transform_prompt, ANALYZE_PROMPT},
        AnimateRequest, CredentialProvider, TransformRequest, TransformationGateway,
    },
};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gateway speaking the Generative Language REST API
pub struct GeminiGateway {
    client: reqwest::Client,
    config: GatewayConfig,
    credentials: Arc<dyn CredentialProvider>,
}

impl GeminiGateway {
    pub fn new(config: GatewayConfig, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self { client, config, credentials })
    }

    async fn key(&self) -> Result<String> {
        self.credentials.api_key().await.ok_or_else(|| {
            GatewayError::MissingCredential { env_var: self.config.api_key_env.clone() }.into()
        })
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.config.base_url.trim_end_matches('/'), model, method)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let key = self.key().await?;
        let resp = self
            .client
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(body)
            .send()
            .await
            .map_err(GatewayError::Http)?;
        Self::read_json(resp).await
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let key = self.key().await?;
        let resp = self
            .client
            .get(url)
            .header(API_KEY_HEADER, key)
            .send()
            .await
            .map_err(GatewayError::Http)?;
        Self::read_json(resp).await
    }

    async fn read_json(resp: reqwest::Response) -> Result<Value> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("API Error: {} {}", status, body);
            return Err(GatewayError::Api { status: status.as_u16(), body }.into());
        }
        Ok(resp.json().await.map_err(GatewayError::Http)?)
    }

    async fn generate_content(&self, model: &str, image: &DataUri, text: &str) -> Result<Value> {
        let body = json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": image.mime(), "data": image.base64() } },
                    { "text": text }
                ]
            }]
        });
        self.post_json(&self.model_url(model, "generateContent"), &body).await
    }

    /// Poll a long-running operation until it reports `done`
    async fn wait_for_operation(&self, name: &str) -> Result<Value> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), name);
        let deadline = Instant::now() + Duration::from_secs(self.config.video_timeout_secs);
        let poll = Duration::from_secs(self.config.video_poll_interval_secs);

        loop {
            let operation = self.get_json(&url).await?;
            if operation["done"].as_bool().unwrap_or(false) {
                return Ok(operation);
            }
            if Instant::now() + poll > deadline {
                return Err(GatewayError::VideoTimeout { seconds: self.config.video_timeout_secs }.into());
            }
            debug!("Video operation {} still running", name);
            sleep(poll).await;
        }
    }

    async fn download(&self, uri: &str) -> Result<Vec<u8>> {
        let key = self.key().await?;
        let resp = self
            .client
            .get(uri)
            .header(API_KEY_HEADER, key)
            .send()
            .await
            .map_err(GatewayError::Http)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Api { status: status.as_u16(), body: "video download failed".to_string() }.into());
        }
        let bytes = resp.bytes().await.map_err(GatewayError::Http)?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TransformationGateway for GeminiGateway {
    async fn analyze(&self, image: &DataUri) -> Result<String> {
        debug!("Analyzing outfit with {}", self.config.analysis_model);
        let response = self.generate_content(&self.config.analysis_model, image, ANALYZE_PROMPT).await?;
        extract_text(&response)
    }

    async fn transform(&self, request: &TransformRequest) -> Result<DataUri> {
        info!("🧵 Transforming outfit with {}", self.config.image_model);
        let prompt = transform_prompt(request);
        let response = self.generate_content(&self.config.image_model, &request.image, &prompt).await?;
        extract_image(&response)
    }

    async fn animate(&self, request: &AnimateRequest) -> Result<DataUri> {
        info!("🎬 Generating video with {}", self.config.video_model);
        let body = json!({
            "instances": [{
                "prompt": animate_prompt(&request.style_name),
                "image": {
                    "bytesBase64Encoded": request.image.base64(),
                    "mimeType": request.image.mime()
                }
            }],
            "parameters": { "aspectRatio": "9:16" }
        });

        let started = self
            .post_json(&self.model_url(&self.config.video_model, "predictLongRunning"), &body)
            .await?;
        let name = started["name"].as_str().ok_or_else(|| GatewayError::EmptyResponse {
            expected: "operation name".to_string(),
        })?;

        let operation = self.wait_for_operation(name).await?;
        let uri = extract_video_uri(&operation)?;
        let bytes = self.download(&uri).await?;
        info!("   ✅ Video ready ({} bytes)", bytes.len());
        Ok(DataUri::new("video/mp4", bytes))
    }
}

fn response_parts(response: &Value) -> impl Iterator<Item = &Value> + '_ {
    response["candidates"][0]["content"]["parts"]
        .as_array()
        .into_iter()
        .flatten()
}

/// Concatenated text parts of a `generateContent` response
pub(crate) fn extract_text(response: &Value) -> Result<String> {
    let text: String = response_parts(response)
        .filter_map(|part| part["text"].as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let text = text.trim();
    if text.is_empty() {
        return Err(GatewayError::EmptyResponse { expected: "text".to_string() }.into());
    }
    Ok(text.to_string())
}

/// First inline image of a `generateContent` response
pub(crate) fn extract_image(response: &Value) -> Result<DataUri> {
    let empty = || GatewayError::EmptyResponse { expected: "image".to_string() };

    let inline = response_parts(response)
        .map(|part| &part["inlineData"])
        .find(|inline| inline["data"].is_string())
        .ok_or_else(empty)?;

    let mime = inline["mimeType"].as_str().unwrap_or("image/png");
    let data = inline["data"].as_str().ok_or_else(empty)?;
    let bytes = BASE64.decode(data).map_err(|_| empty())?;
    Ok(DataUri::new(mime, bytes))
}

/// Video URI of a finished `predictLongRunning` operation
pub(crate) fn extract_video_uri(operation: &Value) -> Result<String> {
    if let Some(error) = operation.get("error") {
        return Err(GatewayError::Api {
            status: error["code"].as_u64().and_then(|code| u16::try_from(code).ok()).unwrap_or(500),
            body: error["message"].as_str().unwrap_or("video generation failed").to_string(),
        }.into());
    }

    operation["response"]["generateVideoResponse"]["generatedSamples"][0]["video"]["uri"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| GatewayError::EmptyResponse { expected: "video".to_string() }.into())
}
