use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use super::{RateDecision, RateLimiter};
use crate::config::RateLimitConfig;

/// 滑动窗口日志限流器
///
/// 每个键保存窗口内各次请求的时间点，超出 `max_requests` 即拒绝，
/// 被拒绝的请求不计入窗口。
pub struct SlidingWindowLimiter {
    window: Duration,
    max_requests: u32,
    hits: DashMap<String, VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            window,
            max_requests,
            hits: DashMap::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, Duration::from_secs(config.window_secs))
    }

    /// 以给定时间点判定，便于测试窗口滑动
    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut entry = self.hits.entry(key.to_string()).or_default();
        let log = entry.value_mut();

        while let Some(&oldest) = log.front() {
            if now.saturating_duration_since(oldest) >= self.window {
                log.pop_front();
            } else {
                break;
            }
        }

        if log.len() as u32 >= self.max_requests {
            let retry_after = log
                .front()
                .map(|&oldest| (oldest + self.window).saturating_duration_since(now))
                .unwrap_or(self.window);
            debug!(key, ?retry_after, "请求被限流");
            return RateDecision::Limited { retry_after };
        }

        log.push_back(now);
        RateDecision::Allowed {
            remaining: self.max_requests - log.len() as u32,
        }
    }

    /// 清理窗口已过期的键
    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let before = self.hits.len();
        self.hits.retain(|_, log| {
            log.back()
                .is_some_and(|&last| now.saturating_duration_since(last) < self.window)
        });
        before.saturating_sub(self.hits.len())
    }
}

impl RateLimiter for SlidingWindowLimiter {
    fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn limit(&self) -> u32 {
        self.max_requests
    }

    fn reset(&self) {
        self.hits.clear();
    }

    fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }
}
