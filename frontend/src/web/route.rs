//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性，以及路由守卫的判定函数。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Signup,
    /// 任务面板 (需要认证)
    Dashboard,
    /// 个人资料 (需要认证)
    Profile,
    /// 页面未找到
    NotFound,
}

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// 放行，渲染目标页面
    Allow(AppRoute),
    /// 重定向到另一路由
    Redirect(AppRoute),
}

impl GuardDecision {
    /// 最终要渲染的路由
    pub fn route(&self) -> AppRoute {
        match *self {
            GuardDecision::Allow(route) | GuardDecision::Redirect(route) => route,
        }
    }
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path {
            "" | "/dashboard" => Self::Dashboard,
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/profile" => Self::Profile,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Dashboard => "/dashboard",
            Self::Profile => "/profile",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard | Self::Profile)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 路由守卫：根据认证状态决定放行或重定向
    pub fn guard(self, is_authenticated: bool) -> GuardDecision {
        if self.requires_auth() && !is_authenticated {
            GuardDecision::Redirect(Self::auth_failure_redirect())
        } else if self.should_redirect_when_authenticated() && is_authenticated {
            GuardDecision::Redirect(Self::auth_success_redirect())
        } else {
            GuardDecision::Allow(self)
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
