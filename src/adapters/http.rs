use crate::adapters::sse::SseDecoder;
use crate::domain::model::{HealthResponse, SearchRequest, SearchResponse};
use crate::domain::ports::{ConfigProvider, SearchBackend};
use crate::utils::error::{Result, StonewalkerError};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::time::Duration;

pub const SEARCH_PATH: &str = "/api/underfoot/search";
pub const HEALTH_PATH: &str = "/api/underfoot/health";
pub const STREAM_PATH: &str = "/underfoot/stream";

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.api_base(), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 失敗回應：優先取 body 的 message，其次 error
    async fn api_error(response: reqwest::Response) -> StonewalkerError {
        let status = response.status().as_u16();
        let body: Option<serde_json::Value> = response.json().await.ok();

        let message = match body {
            Some(body) => body
                .get("message")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .or_else(|| body.get("error").and_then(|v| v.as_str()).filter(|s| !s.is_empty()))
                .unwrap_or("Search failed")
                .to_string(),
            None => "Request failed".to_string(),
        };

        StonewalkerError::ApiError { status, message }
    }

    /// 訂閱 SSE 串流；每個 data 事件解析成 JSON 後交給 on_message，解析失敗的事件略過
    pub async fn stream_events<F>(&self, message: &str, mut on_message: F) -> Result<usize>
    where
        F: FnMut(serde_json::Value),
    {
        let url = self.url(STREAM_PATH);
        tracing::debug!("Opening SSE stream: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("message", message)])
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| StonewalkerError::StreamError {
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            tracing::error!("SSE error: status {}", response.status());
            return Err(StonewalkerError::StreamError {
                reason: format!("status {}", response.status()),
            });
        }

        let mut decoder = SseDecoder::default();
        let mut delivered = 0;
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| {
                tracing::error!("SSE error: {}", e);
                StonewalkerError::StreamError {
                    reason: e.to_string(),
                }
            })?;

            for data in decoder.feed(&chunk) {
                match serde_json::from_str::<serde_json::Value>(&data) {
                    Ok(value) => {
                        delivered += 1;
                        on_message(value);
                    }
                    Err(e) => tracing::warn!("Failed to parse SSE data: {}", e),
                }
            }
        }

        Ok(delivered)
    }
}

#[async_trait]
impl SearchBackend for ApiClient {
    async fn search(&self, chat_input: &str, force: bool) -> Result<SearchResponse> {
        let url = self.url(SEARCH_PATH);
        tracing::debug!("Making API request to: {}", url);

        let request = SearchRequest {
            chat_input: chat_input.to_string(),
            force: Some(force),
        };
        let response = self.client.post(&url).json(&request).send().await?;
        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(response.json::<SearchResponse>().await?)
    }

    async fn health(&self) -> Result<HealthResponse> {
        let response = self.client.get(self.url(HEALTH_PATH)).send().await?;

        if !response.status().is_success() {
            return Err(StonewalkerError::HealthCheckError {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<HealthResponse>().await?)
    }
}
