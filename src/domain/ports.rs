use crate::domain::model::{HealthResponse, SearchResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn api_base(&self) -> &str;
    fn maps_api_key(&self) -> Option<&str>;
    fn request_timeout(&self) -> Duration;
    fn force_refresh(&self) -> bool;
}

/// 搜尋後端介面，HTTP 實作在 adapters::http
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, chat_input: &str, force: bool) -> Result<SearchResponse>;
    async fn health(&self) -> Result<HealthResponse>;
}
