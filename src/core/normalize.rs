//! 將後端鬆散的 JSON 轉成嚴格的 [`Place`] / [`DebugData`] 模型。
//!
//! 欄位取值規則比照前端的 `a || b || default`：null、缺少、`""`、`0`、`false`
//! 都視為沒有值，改取下一個候選欄位。

use crate::domain::model::{
    Category, DebugData, GeospatialData, Message, Place, Role, SearchResponse,
};
use crate::utils::error::StonewalkerError;
use crate::utils::format::{generate_id, pluralize};
use chrono::Utc;
use serde_json::Value;

pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const DEFAULT_CONFIDENCE: f64 = 0.5;
/// Google rating 為 0–5 分
const RATING_SCALE: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct ProcessedResponse {
    pub places: Vec<Place>,
    pub debug_data: DebugData,
    pub assistant_message: Message,
}

fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(raw, |node, key| node.get(key))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|f| f.is_finite())
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 依序取第一個「有值」且可轉型的候選欄位
fn first_of<T>(raw: &Value, paths: &[&str], convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
    paths
        .iter()
        .filter_map(|path| lookup(raw, path))
        .filter(|value| is_truthy(value))
        .find_map(convert)
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(as_text).collect()),
        Value::String(s) if !s.is_empty() => Some(vec![s.clone()]),
        _ => None,
    }
}

fn fixed_array<const N: usize>(value: &Value) -> Option<[f64; N]> {
    let items = value.as_array()?;
    if items.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = as_number(item)?;
    }
    Some(out)
}

fn normalize_confidence(raw: &Value) -> f64 {
    if let Some(confidence) = first_of(raw, &["confidence"], as_number) {
        return confidence.clamp(0.0, 1.0);
    }
    if let Some(rating) = first_of(raw, &["rating"], as_number) {
        return (rating / RATING_SCALE).clamp(0.0, 1.0);
    }
    DEFAULT_CONFIDENCE
}

pub fn normalize_place(raw: &Value) -> Place {
    let artifacts = lookup(raw, "artifacts").and_then(|v| match v {
        Value::Array(_) => string_list(v),
        _ => None,
    });

    Place {
        id: first_of(raw, &["place_id"], as_text).unwrap_or_else(generate_id),
        name: first_of(raw, &["name"], as_text).unwrap_or_else(|| UNKNOWN_LOCATION.to_string()),
        description: first_of(raw, &["description", "editorial_summary.overview"], as_text)
            .unwrap_or_default(),
        latitude: first_of(raw, &["geometry.location.lat", "lat"], as_number).unwrap_or(0.0),
        longitude: first_of(raw, &["geometry.location.lng", "lng"], as_number).unwrap_or(0.0),
        category: first_of(raw, &["category"], |v| v.as_str().map(Category::parse_lenient))
            .unwrap_or_default(),
        confidence: normalize_confidence(raw),
        historical_period: first_of(raw, &["historical_period"], as_text),
        artifacts,
        image_url: first_of(raw, &["image_url"], as_text),
        address: first_of(raw, &["formatted_address", "vicinity", "address"], as_text),
    }
}

pub fn fallback_debug(query: &str) -> DebugData {
    DebugData {
        search_query: query.to_string(),
        processing_time: 0.0,
        confidence: 0.8,
        keywords: Vec::new(),
        geospatial_data: GeospatialData::default(),
        llm_reasoning: "Search completed".to_string(),
        data_source: vec!["Backend API".to_string()],
    }
}

fn field<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

fn normalize_geospatial(raw: Option<&Value>) -> GeospatialData {
    let Some(raw) = raw.filter(|v| v.is_object()) else {
        return GeospatialData::default();
    };

    GeospatialData {
        bounding_box: field(raw, &["boundingBox", "bounding_box"]).and_then(fixed_array::<4>),
        center_point: field(raw, &["centerPoint", "center_point"]).and_then(fixed_array::<2>),
        search_radius: field(raw, &["searchRadius", "search_radius"]).and_then(as_number),
    }
}

/// 後端有給 debug 物件時接受 camelCase / snake_case 欄位，缺的欄位用預設值補上
pub fn normalize_debug(raw: Option<&Value>, query: &str) -> DebugData {
    let fallback = fallback_debug(query);
    let Some(raw) = raw.filter(|v| v.is_object()) else {
        return fallback;
    };

    DebugData {
        search_query: field(raw, &["searchQuery", "search_query", "query"])
            .and_then(as_text)
            .unwrap_or(fallback.search_query),
        processing_time: field(
            raw,
            &["processingTime", "processing_time", "execution_time_ms", "elapsed_ms"],
        )
        .and_then(as_number)
        .unwrap_or(fallback.processing_time),
        confidence: field(raw, &["confidence"])
            .and_then(as_number)
            .unwrap_or(fallback.confidence),
        keywords: field(raw, &["keywords"])
            .and_then(string_list)
            .unwrap_or(fallback.keywords),
        geospatial_data: normalize_geospatial(field(raw, &["geospatialData", "geospatial_data"])),
        llm_reasoning: field(raw, &["llmReasoning", "llm_reasoning", "reasoning"])
            .and_then(as_text)
            .unwrap_or(fallback.llm_reasoning),
        data_source: field(raw, &["dataSource", "data_source", "data_sources", "sources"])
            .and_then(string_list)
            .unwrap_or(fallback.data_source),
    }
}

pub fn assistant_summary(places: &[Place]) -> String {
    match places.first() {
        Some(first) => format!(
            "Found {} {}. {} shows strongest resonance.",
            places.len(),
            pluralize(places.len(), "location", None),
            first.name
        ),
        None => "No locations found matching your query.".to_string(),
    }
}

pub fn process_api_response(response: &SearchResponse, query: &str) -> ProcessedResponse {
    let places: Vec<Place> = response.places.iter().map(normalize_place).collect();
    let debug_data = normalize_debug(response.debug.as_ref(), query);

    tracing::debug!(
        places = places.len(),
        request_id = response.request_id.as_deref().unwrap_or("-"),
        "normalized search response"
    );

    let assistant_message = Message {
        id: generate_id(),
        content: assistant_summary(&places),
        role: Role::Assistant,
        timestamp: Utc::now(),
        places: places.clone(),
        debug_data: Some(debug_data.clone()),
    };

    ProcessedResponse {
        places,
        debug_data,
        assistant_message,
    }
}

pub fn error_message(error: &StonewalkerError, query: &str) -> Message {
    let detail = error.to_string();
    let content = if detail.trim().is_empty() {
        "Failed to process search. Check backend connection.".to_string()
    } else {
        format!("Error: {}", detail)
    };

    Message {
        id: generate_id(),
        content,
        role: Role::Assistant,
        timestamp: Utc::now(),
        places: Vec::new(),
        debug_data: Some(DebugData {
            search_query: query.to_string(),
            processing_time: 0.0,
            confidence: 0.0,
            keywords: Vec::new(),
            geospatial_data: GeospatialData::default(),
            llm_reasoning: "Error occurred during search".to_string(),
            data_source: vec!["Error Handler".to_string()],
        }),
    }
}
