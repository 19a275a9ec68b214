use crate::core::map::{MapStatus, MapView, Viewport, MAX_ZOOM, MIN_ZOOM};
use crate::core::normalize::{error_message, process_api_response};
use crate::core::readiness::{wait_until_ready, PollPolicy};
use crate::domain::model::{DebugData, Message, Place, Role, SearchResponse};
use crate::domain::ports::SearchBackend;
use crate::utils::error::Result;
use crate::utils::format::generate_id;
use crate::utils::validation::validate_query;
use chrono::Utc;
use std::time::Duration;

/// 送出中的查詢；resolve 時用 seq 判斷是否為最新一筆
#[derive(Debug)]
pub struct PendingQuery {
    seq: u64,
    query: String,
}

impl PendingQuery {
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// 對話狀態：訊息歷史與由歷史推導出的選取地點、地圖視角、debug 快照。
///
/// 多筆查詢重疊時以最後送出的為準：只有最新一筆會更新 debug 快照並結束 loading，
/// 但每一筆的回覆訊息都會加入歷史。
#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<Message>,
    is_loading: bool,
    selected_place: Option<String>,
    debug_mode: bool,
    current_debug: Option<DebugData>,
    viewport: Viewport,
    map_status: MapStatus,
    force: bool,
    next_seq: u64,
    latest_seq: Option<u64>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl ChatSession {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            messages: Vec::new(),
            is_loading: false,
            selected_place: None,
            debug_mode: false,
            current_debug: None,
            viewport,
            map_status: MapStatus::Loading,
            force: false,
            next_seq: 0,
            latest_seq: None,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn force(&self) -> bool {
        self.force
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    pub fn current_debug(&self) -> Option<&DebugData> {
        self.current_debug.as_ref()
    }

    pub fn selected_place_id(&self) -> Option<&str> {
        self.selected_place.as_deref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn map_status(&self) -> MapStatus {
        self.map_status
    }

    pub fn set_map_status(&mut self, status: MapStatus) {
        self.map_status = status;
    }

    /// 加入使用者訊息並進入 loading；空白輸入回傳 None
    pub fn submit(&mut self, raw: &str) -> Result<Option<PendingQuery>> {
        let Some(query) = validate_query(raw)? else {
            return Ok(None);
        };

        self.messages.push(Message {
            id: generate_id(),
            content: query.to_string(),
            role: Role::User,
            timestamp: Utc::now(),
            places: Vec::new(),
            debug_data: None,
        });

        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_seq = Some(seq);
        self.is_loading = true;

        tracing::debug!(seq, "submitted query");
        Ok(Some(PendingQuery {
            seq,
            query: query.to_string(),
        }))
    }

    pub fn resolve(&mut self, pending: PendingQuery, outcome: Result<SearchResponse>) -> &Message {
        let is_latest = self.latest_seq == Some(pending.seq);

        let message = match outcome {
            Ok(response) => {
                let processed = process_api_response(&response, &pending.query);

                if is_latest {
                    self.current_debug = Some(processed.debug_data);
                } else {
                    tracing::debug!(seq = pending.seq, "stale response, keeping newer debug data");
                }

                if self.selected_place.is_none() {
                    if let Some(first) = processed.places.first() {
                        self.selected_place = Some(first.id.clone());
                    }
                }

                processed.assistant_message
            }
            Err(e) => {
                tracing::error!("Error processing message: {}", e);
                error_message(&e, &pending.query)
            }
        };

        if is_latest {
            self.is_loading = false;
        }

        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub async fn send_message<B>(&mut self, backend: &B, raw: &str) -> Result<Option<&Message>>
    where
        B: SearchBackend + ?Sized,
    {
        let Some(pending) = self.submit(raw)? else {
            return Ok(None);
        };

        let outcome = backend.search(pending.query(), self.force).await;
        Ok(Some(self.resolve(pending, outcome)))
    }

    /// 等後端 health 通過才把地圖標成 Ready；逾時地圖維持 Loading，對話照常可用
    pub async fn wait_for_backend<B>(&mut self, backend: &B, policy: PollPolicy) -> Result<Duration>
    where
        B: SearchBackend + ?Sized,
    {
        let probe = || async move { backend.health().await.is_ok() };
        let elapsed = wait_until_ready("backend", probe, policy).await?;
        self.map_status = MapStatus::Ready;
        Ok(elapsed)
    }

    pub fn all_places(&self) -> Vec<Place> {
        self.messages
            .iter()
            .flat_map(|m| m.places.iter().cloned())
            .collect()
    }

    pub fn selected_place(&self) -> Option<&Place> {
        let id = self.selected_place.as_deref()?;
        self.messages
            .iter()
            .flat_map(|m| m.places.iter())
            .find(|p| p.id == id)
    }

    /// 回傳 false 表示歷史中沒有這個地點
    pub fn select_place(&mut self, place_id: &str) -> bool {
        let known = self
            .messages
            .iter()
            .flat_map(|m| m.places.iter())
            .any(|p| p.id == place_id);

        if known {
            self.selected_place = Some(place_id.to_string());
        }
        known
    }

    /// 1-based，依 all_places 的順序
    pub fn select_place_by_index(&mut self, index: usize) -> Option<&Place> {
        let id = self
            .messages
            .iter()
            .flat_map(|m| m.places.iter())
            .nth(index.checked_sub(1)?)?
            .id
            .clone();

        self.selected_place = Some(id);
        self.selected_place()
    }

    /// zoom 超出範圍時夾到 MIN_ZOOM..=MAX_ZOOM
    pub fn set_viewport(&mut self, center: (f64, f64), zoom: u8) {
        self.viewport = Viewport {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        };
    }

    pub fn toggle_debug(&mut self) -> bool {
        self.debug_mode = !self.debug_mode;
        self.debug_mode
    }

    pub fn close_debug(&mut self) {
        self.debug_mode = false;
    }

    pub fn map_view(&self) -> MapView {
        MapView::derive(&self.all_places(), self.viewport, self.selected_place_id())
    }
}
