//! 会话持久化
//!
//! `Session` 保证 token 与用户记录同时存在或同时缺失，
//! `SessionStore` 负责把它写入 / 读出持久化存储。

use taskdeck_shared::{AuthResponse, User};

use crate::web::{KeyValueStore, StorageError};

pub const STORAGE_TOKEN_KEY: &str = "token";
pub const STORAGE_USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

impl From<AuthResponse> for Session {
    fn from(resp: AuthResponse) -> Self {
        Self::new(resp.token, resp.user)
    }
}

/// 基于键值存储的会话仓库
#[derive(Debug, Clone, Default)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 从存储中恢复会话
    ///
    /// 只有 token 和用户都能读出时才返回会话；残缺的数据会被清理掉。
    pub fn restore(&self) -> Option<Session> {
        let token = self.storage.get::<String>(STORAGE_TOKEN_KEY);
        let user = self.storage.get::<User>(STORAGE_USER_KEY);

        match (token, user) {
            (Some(token), Some(user)) => {
                log::info!("restored session for {}", user.email);
                Some(Session { token, user })
            }
            (None, None)
                if !self.storage.contains(STORAGE_TOKEN_KEY)
                    && !self.storage.contains(STORAGE_USER_KEY) =>
            {
                None
            }
            _ => {
                log::warn!("discarding incomplete session found in storage");
                self.clear();
                None
            }
        }
    }

    /// 整体写入 token 和用户；任一写入失败时两者都不保留
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let written = self
            .storage
            .set(STORAGE_TOKEN_KEY, &session.token)
            .and_then(|()| self.storage.set(STORAGE_USER_KEY, &session.user));
        if written.is_err() {
            self.clear();
        }
        written
    }

    /// 只替换用户记录，token 不变
    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        self.storage.set(STORAGE_USER_KEY, user)
    }

    pub fn clear(&self) {
        self.storage.delete(STORAGE_TOKEN_KEY);
        self.storage.delete(STORAGE_USER_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MemoryStorage;

    fn ada() -> User {
        User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_save_then_restore() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());

        store.save(&Session::new("tok", ada())).unwrap();
        assert!(storage.contains(STORAGE_TOKEN_KEY));
        assert!(storage.contains(STORAGE_USER_KEY));

        // 模拟页面刷新：新的 store 实例读取同一份存储
        let restored = SessionStore::new(storage).restore().unwrap();
        assert_eq!(restored.token, "tok");
        assert_eq!(restored.user, ada());
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        store.save(&Session::new("tok", ada())).unwrap();

        store.clear();

        assert!(!storage.contains(STORAGE_TOKEN_KEY));
        assert!(!storage.contains(STORAGE_USER_KEY));
        assert_eq!(store.restore(), None);
    }

    #[test]
    fn test_partial_session_is_discarded() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_TOKEN_KEY, "tok").unwrap();
        let store = SessionStore::new(storage.clone());

        assert_eq!(store.restore(), None);
        assert!(!storage.contains(STORAGE_TOKEN_KEY));
    }

    #[test]
    fn test_corrupt_user_is_discarded() {
        let storage = MemoryStorage::new();
        storage.set(STORAGE_TOKEN_KEY, "tok").unwrap();
        storage.put_raw(STORAGE_USER_KEY, "{not json");
        let store = SessionStore::new(storage.clone());

        assert_eq!(store.restore(), None);
        assert!(!storage.contains(STORAGE_USER_KEY));
        assert!(!storage.contains(STORAGE_TOKEN_KEY));
    }

    #[test]
    fn test_failed_user_write_leaves_no_token_behind() {
        let storage = MemoryStorage::new();
        storage.fail_writes_to(STORAGE_USER_KEY);
        let store = SessionStore::new(storage.clone());

        assert!(store.save(&Session::new("tok", ada())).is_err());

        assert!(!storage.contains(STORAGE_TOKEN_KEY));
        assert!(!storage.contains(STORAGE_USER_KEY));
        assert_eq!(store.restore(), None);
    }

    #[test]
    fn test_save_user_keeps_token() {
        let storage = MemoryStorage::new();
        let store = SessionStore::new(storage.clone());
        store.save(&Session::new("tok", ada())).unwrap();

        let renamed = User {
            name: "Ada Lovelace".to_string(),
            ..ada()
        };
        store.save_user(&renamed).unwrap();

        let restored = store.restore().unwrap();
        assert_eq!(restored.token, "tok");
        assert_eq!(restored.user.name, "Ada Lovelace");
    }
}
