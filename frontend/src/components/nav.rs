use leptos::prelude::*;

use crate::auth::use_auth;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 已登录页面顶部导航栏
#[component]
pub fn NavBar() -> impl IntoView {
    let auth = use_auth();

    // 注销后路由服务监听到认证变化，自动跳转登录页
    let on_logout = move |_| {
        log::info!("signing out");
        auth.logout();
    };

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <Link to=AppRoute::Dashboard class="btn btn-ghost text-xl">"TaskDeck"</Link>
                <Link to=AppRoute::Dashboard class="btn btn-ghost" active_class="btn-active">"Tasks"</Link>
                <Link to=AppRoute::Profile class="btn btn-ghost" active_class="btn-active">"Profile"</Link>
            </div>
            <div class="flex-none gap-2">
                <span class="hidden md:inline text-sm text-base-content/70">
                    {move || auth.user().map(|u| u.name).unwrap_or_default()}
                </span>
                <button on:click=on_logout class="btn btn-outline btn-error btn-sm">"Log out"</button>
            </div>
        </div>
    }
}
