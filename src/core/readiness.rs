use crate::utils::error::{Result, StonewalkerError};
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(50),
            timeout: Duration::from_secs(10),
        }
    }
}

/// 反覆呼叫 probe 直到回傳 true；逾時記錄錯誤並回傳 TimeoutError。
/// 期限涵蓋整個輪詢過程，執行中的 probe 到期時會被取消。
pub async fn wait_until_ready<F, Fut>(what: &str, mut probe: F, policy: PollPolicy) -> Result<Duration>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let started = Instant::now();

    let poll = async {
        let mut ticker = tokio::time::interval(policy.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            // 第一次 tick 立即完成
            ticker.tick().await;
            if probe().await {
                return started.elapsed();
            }
        }
    };

    match tokio::time::timeout(policy.timeout, poll).await {
        Ok(elapsed) => {
            tracing::debug!("{} ready after {:?}", what, elapsed);
            Ok(elapsed)
        }
        Err(_) => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            tracing::error!("{} failed to load after {}ms", what, elapsed_ms);
            Err(StonewalkerError::TimeoutError {
                what: what.to_string(),
                elapsed_ms,
            })
        }
    }
}
