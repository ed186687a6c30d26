//! 请求速率限制
//!
//! 限流器在启动时创建并通过 app_data 注入中间件，状态只保存在进程内存中，重启即清空。

pub mod sliding_window;

use std::time::Duration;

pub use sliding_window::SlidingWindowLimiter;

/// 一次限流判定的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// 放行，附带窗口内剩余额度
    Allowed { remaining: u32 },
    /// 拒绝，附带最早可重试的等待时间
    Limited { retry_after: Duration },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }
}

pub trait RateLimiter: Send + Sync {
    /// 记录一次来自 `key` 的请求并给出判定
    fn check(&self, key: &str) -> RateDecision;

    /// 窗口内允许的最大请求数
    fn limit(&self) -> u32;

    /// 清空全部计数
    fn reset(&self);

    /// 丢弃窗口内已无请求的键，返回清理数量
    fn purge_expired(&self) -> usize;
}
