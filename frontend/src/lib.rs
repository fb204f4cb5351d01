//! TaskDeck 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth` / `session`: 会话状态与持久化
//! - `api`: 带 token 注入与 401 回调的请求客户端
//! - `actions`: 各页面"校验 -> 请求 -> 刷新"流程
//! - `components`: UI 组件层

mod actions;
mod api;
mod auth;
pub mod config;
mod error;
mod session;
mod validation;
mod components {
    pub mod dashboard;
    pub mod field;
    pub mod login;
    pub mod nav;
    pub mod notice;
    pub mod profile;
    pub mod signup;
    pub mod task_dialog;
}

use crate::api::{ApiClient, AppApi};
use crate::auth::{AuthContext, init_auth, use_auth};
use crate::components::dashboard::DashboardPage;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::signup::SignupPage;
use crate::config::AppConfig;

use leptos::prelude::*;

// 浏览器 API 适配层
// HTTP 与存储都以 trait 抽象，生产实现基于 gloo-*，测试使用内存实现。
pub(crate) mod web {
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use http::{FetchTransport, HttpError, HttpRequest, HttpResponse, HttpTransport};
    pub use storage::{KeyValueStore, LocalStorage, StorageError};

    #[cfg(test)]
    pub use http::MockTransport;
    #[cfg(test)]
    pub use storage::MemoryStorage;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet, RouterService, use_router};
use web::{HttpTransport, KeyValueStore};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::Dashboard => view! { <DashboardPage /> }.into_any(),
        AppRoute::Profile => view! { <ProfilePage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to=AppRoute::Dashboard class="btn btn-primary mt-6">"Back to tasks"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 会话失效：清除会话并回到登录页
fn end_session<S>(auth: AuthContext<S>, router: RouterService)
where
    S: KeyValueStore + Send + Sync + 'static,
{
    auth.logout();
    router.redirect_to_login();
}

/// 把客户端接到会话上：token 从认证上下文读取，收到 401 时结束会话
fn bind_session<T, S>(api: ApiClient<T>, auth: AuthContext<S>, router: RouterService) -> ApiClient<T>
where
    T: HttpTransport,
    S: KeyValueStore + Send + Sync + 'static,
{
    api.with_token_source(move || auth.token())
        .on_unauthorized(move || end_session(auth, router))
}

/// 应用外壳
///
/// 位于 `Router` 内部，负责组装 API 客户端。
#[component]
fn Shell() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let config = AppConfig::from_build_env();
    log::info!("using API at {}", config.api_base_url);

    let api: AppApi = bind_session(
        AppApi::new(config.api_base_url, web::FetchTransport),
        auth,
        router,
    );
    provide_context(api);

    view! { <RouterOutlet matcher=route_matcher is_restoring=auth.is_loading_signal() /> }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 初始化认证状态（同步地从 LocalStorage 恢复会话）
    init_auth(&auth_ctx);

    // 3. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 4. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <Shell />
        </Router>
    }
}
