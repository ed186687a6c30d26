//! 对象缓存
//!
//! 目前只缓存按令牌解析出的用户，值以 JSON 字符串保存。

pub mod moka;

use async_trait::async_trait;

pub use self::moka::MokaObjectCache;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}
