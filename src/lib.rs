//! Startup Tycoon - 课堂创业投资游戏后端服务
//!
//! 学生以团队提交作品，再用虚拟代币投资其他团队；成绩由收到的投资决定，
//! 投资表现好的团队还能为投资人带来利息奖励。
//!
//! # 架构
//! - `cache`: 用户缓存（Moka）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权与限流中间件
//! - `models`: 数据模型定义
//! - `rate_limiter`: 滑动窗口限流器
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层（评审分发、成绩计算、利息结算）
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod rate_limiter;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
