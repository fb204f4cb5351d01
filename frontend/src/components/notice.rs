//! 通知提示框
//!
//! 成功 / 失败消息，可手动关闭，3 秒后自动消失。

use std::time::Duration;

use leptos::prelude::*;

const AUTO_DISMISS: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

#[component]
pub fn NoticeToast(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    // 只清除计时开始时的那条消息；视图已卸载时 try_update 不做任何事
    Effect::new(move |_| {
        let current = notice.get();
        if current.is_some() {
            set_timeout(
                move || {
                    notice.try_update(|n| {
                        if *n == current {
                            *n = None;
                        }
                    });
                },
                AUTO_DISMISS,
            );
        }
    });

    view! {
        <Show when=move || notice.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    if notice.with(|n| n.as_ref().is_some_and(|n| n.is_error)) {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || notice.with(|n| n.as_ref().map(|n| n.text.clone()).unwrap_or_default())}</span>
                    <button class="btn btn-ghost btn-xs" on:click=move |_| notice.set(None)>"✕"</button>
                </div>
            </div>
        </Show>
    }
}
