use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub distribution: DistributionConfig,
    #[serde(default)]
    pub grading: GradingConfig,
    #[serde(default)]
    pub interest: InterestConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub unix_socket_path: String,
    pub workers: usize,
    pub max_workers: usize,
    pub timeouts: TimeoutConfig,
    pub limits: LimitConfig,
}

/// 超时配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub client_request: u64,
    pub client_disconnect: u64,
    pub keep_alive: u64,
}

/// 限制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitConfig {
    pub max_payload_size: usize,
}

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub secret: String,
    pub access_token_expiry: i64,
    /// 首次启动时为管理员签发的引导令牌有效期（分钟）
    pub bootstrap_token_expiry: i64,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,    // 数据库连接 URL（从 scheme 自动推断类型）
    pub pool_size: u32, // 连接池大小
    pub timeout: u64,   // 连接超时 (秒)
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub default_ttl: u64,
    pub max_capacity: u64,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age: usize,
}

/// 速率限制配置（滑动窗口）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub window_secs: u64,
    pub max_requests: u32,
}

/// 评审分发配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionConfig {
    pub default_evaluations_per_student: i32,
    pub min_evaluations_per_student: i32,
    pub max_evaluations_per_student: i32,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            default_evaluations_per_student: 5,
            min_evaluations_per_student: 1,
            max_evaluations_per_student: 10,
        }
    }
}

/// 成绩分档：平均投资额达到 `min_average` 即落入该档
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GradeBand {
    pub letter: String,
    pub min_average: f64,
    pub percentage: f64,
    pub tier: String,
}

/// 成绩计算配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    pub bands: Vec<GradeBand>,
}

impl Default for GradingConfig {
    fn default() -> Self {
        let band = |letter: &str, min_average: f64, percentage: f64, tier: &str| GradeBand {
            letter: letter.to_string(),
            min_average,
            percentage,
            tier: tier.to_string(),
        };

        Self {
            bands: vec![
                band("A", 30.0, 95.0, "high"),
                band("B", 20.0, 85.0, "median"),
                band("C", 10.0, 75.0, "low"),
                band("D", 0.0, 65.0, "low"),
            ],
        }
    }
}

/// 利息配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestConfig {
    /// 表现档位 -> 利率
    pub tier_rates: std::collections::HashMap<String, f64>,
    /// 利息总和换算为奖励比例的除数
    pub bonus_divisor: f64,
    /// 奖励比例上限
    pub max_bonus: f64,
}

impl Default for InterestConfig {
    fn default() -> Self {
        Self {
            tier_rates: [("high", 0.20), ("median", 0.10), ("low", 0.0)]
                .into_iter()
                .map(|(tier, rate)| (tier.to_string(), rate))
                .collect(),
            bonus_divisor: 100.0,
            max_bonus: 0.20,
        }
    }
}
