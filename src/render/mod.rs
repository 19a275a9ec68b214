//! 終端機文字輸出：訊息、地點卡片、地圖摘要、健康檢查。

pub mod debug_panel;

pub use debug_panel::render_debug_panel;

use crate::core::map::{MapStatus, MapView};
use crate::domain::model::{HealthResponse, Message, Place};
use crate::utils::format::format_timestamp;
use std::fmt::Write;
use url::Url;

pub const LOADING_LINE: &str = "Stonewalker analyzes the quantum resonance patterns...";

pub fn welcome_banner() -> String {
    [
        "🗺️  Stonewalker Oracle",
        "I am Stonewalker, a mystical guide who uncovers hidden places through ancient sight",
        "enhanced by digital networks. Ask me about locations and I will reveal what resonates.",
        "",
        "Type /help for commands.",
    ]
    .join("\n")
}

pub fn help_text() -> &'static str {
    "\
/select N   select the N-th revealed location
/places     list every revealed location
/map        show the map view for the current selection
/center LAT LNG [ZOOM]  move the map
/debug      toggle the debug panel
/health     check backend health
/stream Q   stream raw backend events for a query
/help       show this help
/quit       leave"
}

/// index 為 1-based 的全域編號，供 /select 使用
pub fn render_place_card(place: &Place, index: usize, selected: bool) -> String {
    let marker = if selected { '▶' } else { ' ' };
    let mut out = format!(
        "{} {:>2}. {} {}  ({}%)",
        marker,
        index,
        place.category.icon(),
        place.name,
        (place.confidence * 100.0).round() as i64
    );

    if !place.description.is_empty() {
        let _ = write!(out, "\n      {}", place.description);
    }
    if let Some(period) = &place.historical_period {
        let _ = write!(out, "\n      🕰  {}", period);
    }
    if let Some(artifacts) = place.artifacts.as_ref().filter(|a| !a.is_empty()) {
        let _ = write!(out, "\n      💎 {}", artifacts.join(" • "));
    }
    if let Some(image) = &place.image_url {
        let _ = write!(out, "\n      🖼  {}", image);
    }
    out
}

pub fn render_message(message: &Message, selected: Option<&str>, place_offset: usize) -> String {
    let speaker = if message.is_user() { "You" } else { "Stonewalker" };
    let mut out = format!(
        "[{}] {}\n{}",
        format_timestamp(&message.timestamp),
        speaker,
        message.content
    );

    if !message.places.is_empty() {
        let _ = write!(out, "\n📍 Revealed Locations ({})", message.places.len());
        for (i, place) in message.places.iter().enumerate() {
            let is_selected = selected == Some(place.id.as_str());
            let _ = write!(
                out,
                "\n{}",
                render_place_card(place, place_offset + i + 1, is_selected)
            );
        }
    }
    out
}

pub fn render_places(places: &[Place], selected: Option<&str>) -> String {
    if places.is_empty() {
        return "No locations revealed yet.".to_string();
    }
    places
        .iter()
        .enumerate()
        .map(|(i, p)| render_place_card(p, i + 1, selected == Some(p.id.as_str())))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_map(view: &MapView, status: MapStatus, static_url: Option<&Url>) -> String {
    if status == MapStatus::Loading {
        return "Loading map...".to_string();
    }

    let mut out = format!(
        "🧭 Map center {:.4}, {:.4} · zoom {} · {} marker(s)",
        view.viewport.center.0,
        view.viewport.center.1,
        view.viewport.zoom,
        view.markers.len()
    );
    if let Some(marker) = view.selected_marker() {
        let _ = write!(out, "\n{}", marker.info);
    }
    if let Some(url) = static_url {
        let _ = write!(out, "\n{}", url);
    }
    out
}

pub fn render_health(health: &HealthResponse) -> String {
    let mut out = format!(
        "Backend status: {} ({}ms, {})",
        health.status, health.elapsed_ms, health.timestamp
    );
    if let Some(version) = &health.version {
        let _ = write!(out, " v{}", version);
    }

    let mut names: Vec<&String> = health.dependencies.keys().collect();
    names.sort();
    for name in names {
        let status = health.dependencies[name]
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown");
        let _ = write!(out, "\n  - {}: {}", name, status);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::map::Viewport;
    use crate::domain::model::{Category, Role};
    use chrono::Utc;
    use std::collections::HashMap;

    fn sample_place(id: &str) -> Place {
        Place {
            id: id.to_string(),
            name: "The Forgotten DataForge".to_string(),
            description: "Ruins of the first foundry".to_string(),
            latitude: 51.5126,
            longitude: -0.0991,
            category: Category::Ancient,
            confidence: 0.96,
            historical_period: Some("First Digital Awakening".to_string()),
            artifacts: Some(vec!["Memory Cores".to_string(), "Smithing Tools".to_string()]),
            image_url: None,
            address: None,
        }
    }

    #[test]
    fn test_place_card() {
        let card = render_place_card(&sample_place("a"), 3, true);
        assert!(card.starts_with("▶  3. 🏛️ The Forgotten DataForge  (96%)"));
        assert!(card.contains("First Digital Awakening"));
        assert!(card.contains("Memory Cores • Smithing Tools"));
    }

    #[test]
    fn test_render_message_numbers_places_globally() {
        let message = Message {
            id: "m".to_string(),
            content: "Found 1 location.".to_string(),
            role: Role::Assistant,
            timestamp: Utc::now(),
            places: vec![sample_place("a")],
            debug_data: None,
        };

        let out = render_message(&message, None, 4);
        assert!(out.contains("Stonewalker"));
        assert!(out.contains("Revealed Locations (1)"));
        assert!(out.contains(" 5. "));
    }

    #[test]
    fn test_user_message_has_no_places_section() {
        let message = Message {
            id: "u".to_string(),
            content: "caves".to_string(),
            role: Role::User,
            timestamp: Utc::now(),
            places: Vec::new(),
            debug_data: None,
        };
        let out = render_message(&message, None, 0);
        assert!(out.contains("] You\ncaves"));
        assert!(!out.contains("Revealed Locations"));
    }

    #[test]
    fn test_render_map_loading_and_ready() {
        let places = vec![sample_place("a")];
        let view = MapView::derive(&places, Viewport::default(), Some("a"));

        assert_eq!(render_map(&view, MapStatus::Loading, None), "Loading map...");

        let out = render_map(&view, MapStatus::Ready, None);
        assert!(out.contains("zoom 15"));
        assert!(out.contains("The Forgotten DataForge"));
    }

    #[test]
    fn test_render_health() {
        let mut dependencies = HashMap::new();
        dependencies.insert(
            "supabase".to_string(),
            serde_json::json!({"status": "degraded", "error": "timeout"}),
        );
        let health = HealthResponse {
            status: "healthy".to_string(),
            timestamp: "2024-01-01T00:00:00Z".to_string(),
            elapsed_ms: 12,
            dependencies,
            version: Some("0.1.0".to_string()),
        };

        let out = render_health(&health);
        assert!(out.starts_with("Backend status: healthy (12ms"));
        assert!(out.contains("v0.1.0"));
        assert!(out.contains("- supabase: degraded"));
    }
}
