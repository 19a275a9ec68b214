use crate::domain::model::{Place, DEFAULT_CENTER, DEFAULT_ZOOM};
use crate::utils::error::{Result, StonewalkerError};
use serde::Serialize;
use url::Url;

/// 選取地點時至少放大到這個層級
pub const FOCUS_ZOOM: u8 = 15;
pub const SELECTED_Z_INDEX: u32 = 1000;
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 21;

const STATIC_MAP_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/staticmap";
const STATIC_MAP_SIZE: &str = "640x400";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: (f64, f64),
    pub zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MapStatus {
    Loading,
    Ready,
}

pub fn confidence_color(confidence: f64) -> &'static str {
    if confidence >= 0.9 {
        "#22c55e"
    } else if confidence >= 0.8 {
        "#3b82f6"
    } else if confidence >= 0.7 {
        "#0ea5e9"
    } else if confidence >= 0.6 {
        "#a855f7"
    } else {
        "#64748b"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub place_id: String,
    pub title: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color: &'static str,
    pub width: u32,
    pub height: u32,
    pub z_index: Option<u32>,
    pub selected: bool,
    pub info: String,
}

impl Marker {
    pub fn for_place(place: &Place, selected: bool) -> Self {
        let (width, height) = if selected { (36, 54) } else { (24, 36) };

        Self {
            place_id: place.id.clone(),
            title: place.name.clone(),
            latitude: place.latitude,
            longitude: place.longitude,
            color: confidence_color(place.confidence),
            width,
            height,
            z_index: selected.then_some(SELECTED_Z_INDEX),
            selected,
            info: info_text(place),
        }
    }
}

fn info_text(place: &Place) -> String {
    let detail = place
        .address
        .as_deref()
        .filter(|a| !a.is_empty())
        .unwrap_or(&place.description);

    let mut info = format!("{}\n{}\n[{}]", place.name, detail, place.category);
    if place.confidence > 0.0 {
        info.push_str(&format!(" ⚡ {}%", (place.confidence * 100.0).round() as i64));
    }
    info
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub viewport: Viewport,
    pub markers: Vec<Marker>,
}

impl MapView {
    /// 選取的地點存在時，畫面以它為中心並放大到至少 FOCUS_ZOOM
    pub fn derive(places: &[Place], viewport: Viewport, selected: Option<&str>) -> Self {
        let focused = selected.and_then(|id| places.iter().find(|p| p.id == id));

        let viewport = match focused {
            Some(place) => Viewport {
                center: (place.latitude, place.longitude),
                zoom: viewport.zoom.max(FOCUS_ZOOM),
            },
            None => viewport,
        };

        let markers = places
            .iter()
            .map(|place| Marker::for_place(place, selected == Some(place.id.as_str())))
            .collect();

        Self { viewport, markers }
    }

    pub fn selected_marker(&self) -> Option<&Marker> {
        self.markers.iter().find(|m| m.selected)
    }

    /// 終端機沒有互動地圖，改產生 Static Maps 圖片網址
    pub fn static_map_url(&self, api_key: &str) -> Result<Url> {
        let center = format!("{},{}", self.viewport.center.0, self.viewport.center.1);
        let zoom = self.viewport.zoom.to_string();

        let mut params: Vec<(&str, String)> = vec![
            ("center", center),
            ("zoom", zoom),
            ("size", STATIC_MAP_SIZE.to_string()),
        ];
        for marker in &self.markers {
            let size = if marker.selected { "mid" } else { "small" };
            params.push((
                "markers",
                format!(
                    "color:0x{}|size:{}|{},{}",
                    marker.color.trim_start_matches('#'),
                    size,
                    marker.latitude,
                    marker.longitude
                ),
            ));
        }
        params.push(("key", api_key.to_string()));

        Url::parse_with_params(STATIC_MAP_ENDPOINT, &params).map_err(|e| {
            StonewalkerError::ConfigError {
                message: format!("Failed to build static map URL: {}", e),
            }
        })
    }
}
