//! 本地持久化存储
//!
//! `KeyValueStore` 抽象出浏览器 LocalStorage，值以 JSON 序列化保存。
//! 生产环境由 `gloo-storage` 实现，测试中使用 `MemoryStorage`。

use gloo_storage::Storage;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Browser(#[from] gloo_storage::errors::StorageError),
    #[error("序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// 键值存储适配器
pub trait KeyValueStore {
    /// 读取并反序列化，键不存在或内容无法解析时返回 `None`
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    /// 检查键是否存在 (不关心内容能否解析)
    fn contains(&self, key: &str) -> bool;

    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError>;

    fn delete(&self, key: &str);
}

/// 浏览器 LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl KeyValueStore for LocalStorage {
    fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        gloo_storage::LocalStorage::get(key).ok()
    }

    fn contains(&self, key: &str) -> bool {
        gloo_storage::LocalStorage::raw()
            .get_item(key)
            .ok()
            .flatten()
            .is_some()
    }

    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        gloo_storage::LocalStorage::set(key, value)?;
        Ok(())
    }

    fn delete(&self, key: &str) {
        gloo_storage::LocalStorage::delete(key);
    }
}

// =========================================================
// 测试环境实现 (MemoryStorage)
// =========================================================

#[cfg(test)]
pub use memory::MemoryStorage;
