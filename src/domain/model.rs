use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 預設地圖中心 (lat, lng)
pub const DEFAULT_CENTER: (f64, f64) = (37.2018, -82.0993);
pub const DEFAULT_ZOOM: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub places: Vec<Place>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_data: Option<DebugData>,
}

impl Message {
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ancient,
    #[default]
    Mystical,
    Underground,
    Forgotten,
}

impl Category {
    /// 未知分類一律視為 mystical
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ancient" => Category::Ancient,
            "underground" => Category::Underground,
            "forgotten" => Category::Forgotten,
            _ => Category::Mystical,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Category::Ancient => "🏛️",
            Category::Mystical => "✨",
            Category::Underground => "🕳️",
            Category::Forgotten => "👻",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ancient => "ancient",
            Category::Mystical => "mystical",
            Category::Underground => "underground",
            Category::Forgotten => "forgotten",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub category: Category,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeospatialData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<[f64; 4]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_point: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_radius: Option<f64>,
}

impl GeospatialData {
    pub fn is_empty(&self) -> bool {
        self.bounding_box.is_none() && self.center_point.is_none() && self.search_radius.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugData {
    pub search_query: String,
    pub processing_time: f64,
    pub confidence: f64,
    pub keywords: Vec<String>,
    pub geospatial_data: GeospatialData,
    pub llm_reasoning: String,
    pub data_source: Vec<String>,
}

/// 搜尋請求 body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub chat_input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force: Option<bool>,
}

/// 後端回傳的搜尋結果；places 與 debug 保持鬆散型別，交給 normalize 處理
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub user_intent: String,
    #[serde(default)]
    pub user_location: String,
    #[serde(default)]
    pub response: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub places: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub elapsed_ms: u64,
    #[serde(default)]
    pub dependencies: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}
