use crate::cache::{MokaObjectCache, ObjectCache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::CreateUserRequest;
use crate::rate_limiter::{RateLimiter, SlidingWindowLimiter};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub rate_limiter: Arc<dyn RateLimiter>,
}

/// 用户表为空时创建管理员，返回新建的账号
async fn seed_admin(storage: &dyn Storage) -> Result<Option<User>> {
    let count = storage.count_users().await?;
    if count > 0 {
        debug!(
            "Database already has {} user(s), skipping admin seed",
            count
        );
        return Ok(None);
    }

    info!("No users found in database, creating default admin account...");
    let admin = storage
        .create_user(CreateUserRequest {
            username: "admin".to_string(),
            display_name: Some("Administrator".to_string()),
            role: UserRole::Admin,
        })
        .await?;

    info!(
        "Default admin account created successfully (ID: {}, username: {})",
        admin.id, admin.username
    );
    Ok(Some(admin))
}

/// 为新建的管理员签发一次性引导令牌并输出到日志
fn log_bootstrap_token(admin: &User) {
    let config = AppConfig::get();
    match JwtUtils::generate_access_token(
        admin.id,
        UserRole::ADMIN,
        config.jwt.bootstrap_token_expiry,
    ) {
        Ok(token) => {
            warn!("==========================================================");
            warn!("  BOOTSTRAP ADMIN TOKEN (valid {} minutes)", config.jwt.bootstrap_token_expiry);
            warn!("  {}", token);
            warn!("  Use it to create teacher and student accounts");
            warn!("==========================================================");
        }
        Err(e) => warn!("Failed to issue bootstrap token: {}", e),
    }
}

/// 按固定周期清理限流器中已过期的键，避免未认证 IP 键无限增长
fn spawn_rate_limit_sweeper(
    limiter: Arc<dyn RateLimiter>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // 首次 tick 立即返回
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = limiter.purge_expired();
            if purged > 0 {
                debug!(purged, "Purged idle rate limit keys");
            }
        }
    })
}

/// 准备服务器启动的上下文：存储、缓存与限流器
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    match seed_admin(storage.as_ref()).await {
        Ok(Some(admin)) => log_bootstrap_token(&admin),
        Ok(None) => {}
        Err(e) => warn!("Failed to seed admin account: {}", e),
    }

    let cache: Arc<dyn ObjectCache> = Arc::new(MokaObjectCache::from_config(&config.cache));
    warn!("Cache backend initialized");

    let rate_limiter: Arc<dyn RateLimiter> =
        Arc::new(SlidingWindowLimiter::from_config(&config.rate_limit));
    debug!(
        window_secs = config.rate_limit.window_secs,
        max_requests = config.rate_limit.max_requests,
        "Rate limiter initialized"
    );
    spawn_rate_limit_sweeper(
        rate_limiter.clone(),
        Duration::from_secs(config.rate_limit.window_secs.max(1)),
    );

    Ok(StartupContext {
        storage,
        cache,
        rate_limiter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limiter::RateDecision;
    use crate::storage::testing::memory_storage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingLimiter {
        purges: AtomicUsize,
    }

    impl RateLimiter for CountingLimiter {
        fn check(&self, _key: &str) -> RateDecision {
            RateDecision::Allowed { remaining: 1 }
        }

        fn limit(&self) -> u32 {
            1
        }

        fn reset(&self) {}

        fn purge_expired(&self) -> usize {
            self.purges.fetch_add(1, Ordering::SeqCst);
            0
        }
    }

    #[tokio::test]
    async fn test_sweeper_purges_periodically() {
        let limiter = Arc::new(CountingLimiter::default());
        let handle = spawn_rate_limit_sweeper(limiter.clone(), Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert!(limiter.purges.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_sweeper_drops_expired_keys() {
        let limiter = Arc::new(SlidingWindowLimiter::new(5, Duration::from_millis(20)));
        for i in 0..50 {
            assert!(limiter.check(&format!("ip:10.0.1.{i}")).is_allowed());
        }
        let handle = spawn_rate_limit_sweeper(limiter.clone(), Duration::from_millis(10));

        tokio::time::sleep(Duration::from_millis(150)).await;
        handle.abort();

        assert_eq!(limiter.purge_expired(), 0);
        // 清理后同一 IP 重新获得完整额度
        assert_eq!(
            limiter.check("ip:10.0.1.0"),
            RateDecision::Allowed { remaining: 4 }
        );
    }

    #[tokio::test]
    async fn test_seed_admin_only_on_empty_database() {
        let storage = memory_storage().await;

        let admin = seed_admin(storage.as_ref()).await.unwrap().unwrap();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.role, UserRole::Admin);

        assert!(seed_admin(storage.as_ref()).await.unwrap().is_none());
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }
}
