//! 表单输入组件
//!
//! 带标签与字段错误提示的输入框，错误来自表单的 `FieldErrors`。

use leptos::prelude::*;

use crate::validation::FieldErrors;

#[component]
pub fn TextField(
    /// 字段名（同时作为 input 的 id / name 与错误查找键）
    name: &'static str,
    label: &'static str,
    value: RwSignal<String>,
    errors: RwSignal<FieldErrors>,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(optional)] placeholder: &'static str,
    #[prop(optional)] autocomplete: &'static str,
) -> impl IntoView {
    let error = move || errors.with(|e| e.get(name).map(str::to_string));

    view! {
        <div class="form-control">
            <label class="label" for=name>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=name
                name=name
                type=input_type
                placeholder=placeholder
                autocomplete=autocomplete
                class=move || {
                    if error().is_some() {
                        "input input-bordered input-error w-full"
                    } else {
                        "input input-bordered w-full"
                    }
                }
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=move || value.get()
            />
            <Show when=move || error().is_some()>
                <label class="label">
                    <span class="label-text-alt text-error">{move || error().unwrap_or_default()}</span>
                </label>
            </Show>
        </div>
    }
}
