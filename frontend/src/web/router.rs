//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，
//! 守卫判定本身委托给 `AppRoute::guard`。

use leptos::prelude::*;

use super::route::{AppRoute, GuardDecision};

use history::{current_path, push_history_state, replace_history_state, write_history};

/// 对 window.history 的读写
///
/// 非浏览器目标（原生单元测试）下没有 window：路径固定为根路径，写入为空操作。
mod history {
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen::JsValue;

    /// 获取当前浏览器路径
    #[cfg(target_arch = "wasm32")]
    pub fn current_path() -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn current_path() -> String {
        "/".to_string()
    }

    /// 推送 History 状态
    #[cfg(target_arch = "wasm32")]
    pub fn push_history_state(path: &str) {
        if let Some(window) = web_sys::window() {
            if let Ok(history) = window.history() {
                let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn push_history_state(_path: &str) {}

    /// 替换 History 状态（用于重定向）
    #[cfg(target_arch = "wasm32")]
    pub fn replace_history_state(path: &str) {
        if let Some(window) = web_sys::window() {
            if let Ok(history) = window.history() {
                let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn replace_history_state(_path: &str) {}

    pub fn write_history(path: &str, use_push: bool) {
        if use_push {
            push_history_state(path);
        } else {
            replace_history_state(path);
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入认证检查信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态检查（注入的信号，实现解耦）
    is_authenticated: Signal<bool>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// 初始路由同样经过守卫，保证受保护页面不会在重定向前被渲染。
    pub(crate) fn new(is_authenticated: Signal<bool>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let decision = requested.guard(is_authenticated.get_untracked());
        if let GuardDecision::Redirect(target) = decision {
            log::info!("[Router] {} -> {} (initial guard)", requested, target);
            replace_history_state(target.to_path());
        }
        let (current_route, set_route) = signal(decision.route());

        Self {
            current_route,
            set_route,
            is_authenticated,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    /// 强制回到登录页（鉴权失败时由 API 客户端回调触发）
    pub fn redirect_to_login(&self) {
        self.navigate_to_route(AppRoute::auth_failure_redirect(), true);
    }

    /// 导航到指定路由
    ///
    /// # Arguments
    /// * `target_route` - 目标路由
    /// * `use_push` - true 使用 pushState, false 使用 replaceState
    fn navigate_to_route(&self, target_route: AppRoute, use_push: bool) {
        let decision = target_route.guard(self.is_authenticated.get_untracked());
        if let GuardDecision::Redirect(redirect) = decision {
            log::info!("[Router] {} denied, redirecting to {}", target_route, redirect);
        }
        let route = decision.route();

        // 已在目标页面时不重复触发渲染，避免丢失页面内的状态
        if self.current_route.get_untracked() == route {
            replace_history_state(route.to_path());
            return;
        }

        write_history(route.to_path(), use_push);
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    #[cfg(target_arch = "wasm32")]
    fn init_popstate_listener(&self) {
        use wasm_bindgen::prelude::*;

        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());

            // popstate 时也执行守卫逻辑
            match target_route.guard(is_authenticated.get_untracked()) {
                GuardDecision::Allow(route) => set_route.set(route),
                GuardDecision::Redirect(redirect) => {
                    replace_history_state(redirect.to_path());
                    set_route.set(redirect);
                }
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn init_popstate_listener(&self) {}

    /// 设置认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let route = current_route.get_untracked();

            if let GuardDecision::Redirect(redirect) = route.guard(is_auth) {
                log::info!(
                    "[Router] Auth state changed (authenticated: {}), redirecting to {}.",
                    is_auth,
                    redirect
                );
                push_history_state(redirect.to_path());
                set_route.set(redirect);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。会话恢复完成前只渲染加载指示器。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
    /// 会话是否仍在恢复中
    is_restoring: Signal<bool>,
) -> impl IntoView {
    let router = use_router();

    move || {
        if is_restoring.get() {
            return view! {
                <div class="flex items-center justify-center min-h-screen">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                </div>
            }
            .into_any();
        }
        matcher(router.current_route().get())
    }
}

/// 站内链接：拦截点击并经过守卫导航，不刷新页面
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    /// 当前路由等于目标路由时追加的样式
    #[prop(optional)]
    active_class: &'static str,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(to.to_path());
    };

    let class = move || {
        if !active_class.is_empty() && router.current_route().get() == to {
            format!("{class} {active_class}")
        } else {
            class.clone()
        }
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
