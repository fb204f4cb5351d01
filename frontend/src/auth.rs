//! 认证模块
//!
//! 管理用户会话状态，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态；
//! 会话的持久化委托给 `SessionStore`。

use leptos::prelude::*;
use taskdeck_shared::User;

use crate::session::{Session, SessionStore};
use crate::web::{KeyValueStore, LocalStorage};

/// 认证状态
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    /// 当前会话（token 与用户同时存在或同时缺失）
    pub session: Option<Session>,
    /// 是否仍在从存储中恢复会话
    pub is_loading: bool,
}

impl AuthState {
    /// 初始状态：尚未完成恢复
    pub fn restoring() -> Self {
        Self {
            session: None,
            is_loading: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。所有视图读取的是同一个实例。
/// 会话写入的存储由 `S` 决定，浏览器中为 LocalStorage。
pub struct AuthContext<S = LocalStorage> {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
    store: StoredValue<SessionStore<S>>,
}

impl<S> Clone for AuthContext<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for AuthContext<S> {}

impl AuthContext {
    /// 创建基于 LocalStorage 的认证上下文
    pub fn new() -> Self {
        Self::with_store(LocalStorage)
    }
}

impl<S> AuthContext<S>
where
    S: KeyValueStore + Send + Sync + 'static,
{
    pub fn with_store(storage: S) -> Self {
        let (state, set_state) = signal(AuthState::restoring());
        Self {
            state,
            set_state,
            store: StoredValue::new(SessionStore::new(storage)),
        }
    }

    /// 同步地从存储中恢复会话，并结束恢复阶段
    pub fn restore(&self) {
        let session = self.store.with_value(SessionStore::restore);
        self.set_state.set(AuthState {
            session,
            is_loading: false,
        });
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(AuthState::is_authenticated))
    }

    /// 会话是否仍在恢复中
    pub fn is_loading_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.is_loading))
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with_untracked(AuthState::is_authenticated)
    }

    /// 当前 token（不追踪依赖，供请求拦截使用）
    pub fn token(&self) -> Option<String> {
        self.state
            .with_untracked(|s| s.token().map(str::to_string))
    }

    /// 当前用户（追踪依赖，供视图渲染使用）
    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user().cloned())
    }

    /// 登录：整体替换会话并持久化
    pub fn login(&self, session: Session) {
        if let Some(Err(e)) = self.store.try_with_value(|store| store.save(&session)) {
            log::warn!("failed to persist session: {}", e);
        }
        log::info!("signed in as {}", session.user.email);
        self.set_state.update(|state| {
            state.session = Some(session);
            state.is_loading = false;
        });
    }

    /// 注销并清除状态
    ///
    /// 导航将由路由服务的认证状态监听自动处理。
    pub fn logout(&self) {
        self.store.try_with_value(SessionStore::clear);
        self.set_state.update(|state| state.session = None);
    }

    /// 只替换用户记录，token 保持不变
    pub fn update_user(&self, user: User) {
        if !self.is_authenticated() {
            log::warn!("ignoring user update without an active session");
            return;
        }
        if let Some(Err(e)) = self.store.try_with_value(|store| store.save_user(&user)) {
            log::warn!("failed to persist user: {}", e);
        }
        self.set_state.update(|state| {
            if let Some(session) = state.session.as_mut() {
                session.user = user;
            }
        });
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 在首次渲染判定之前同步地从 LocalStorage 恢复会话。
pub fn init_auth(ctx: &AuthContext) {
    ctx.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{STORAGE_TOKEN_KEY, STORAGE_USER_KEY};
    use crate::web::MemoryStorage;

    fn session() -> Session {
        Session::new(
            "tok",
            User {
                id: "u1".to_string(),
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
        )
    }

    #[test]
    fn test_state_starts_restoring_and_anonymous() {
        let state = AuthState::restoring();
        assert!(state.is_loading);
        assert!(!state.is_authenticated());
        assert_eq!(state.token(), None);
    }

    #[test]
    fn test_authenticated_iff_session_present() {
        let state = AuthState {
            session: Some(session()),
            is_loading: false,
        };
        assert!(state.is_authenticated());
        assert_eq!(state.token(), Some("tok"));
        assert_eq!(state.user().map(|u| u.name.as_str()), Some("Ada"));
    }

    fn memory_auth() -> (Owner, MemoryStorage, AuthContext<MemoryStorage>) {
        let owner = Owner::new();
        owner.set();
        let storage = MemoryStorage::new();
        let auth = AuthContext::with_store(storage.clone());
        (owner, storage, auth)
    }

    #[test]
    fn test_restore_reads_persisted_session() {
        let (_owner, storage, auth) = memory_auth();
        SessionStore::new(storage).save(&session()).unwrap();

        assert!(auth.state.get_untracked().is_loading);
        auth.restore();

        let state = auth.state.get_untracked();
        assert!(!state.is_loading);
        assert_eq!(auth.token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_login_then_logout_persists_and_clears() {
        let (_owner, storage, auth) = memory_auth();
        auth.login(session());
        assert!(auth.is_authenticated());
        assert!(storage.contains(STORAGE_TOKEN_KEY));

        auth.logout();
        assert!(!auth.is_authenticated());
        assert!(!storage.contains(STORAGE_TOKEN_KEY));
        assert!(!storage.contains(STORAGE_USER_KEY));
    }

    #[test]
    fn test_update_user_keeps_token() {
        let (_owner, storage, auth) = memory_auth();
        auth.update_user(session().user);
        assert!(!storage.contains(STORAGE_USER_KEY));

        auth.login(session());
        let renamed = User {
            name: "Ada Lovelace".to_string(),
            ..session().user
        };
        auth.update_user(renamed.clone());

        assert_eq!(auth.token().as_deref(), Some("tok"));
        assert_eq!(storage.get::<User>(STORAGE_USER_KEY), Some(renamed));
    }
}
