mod form_state;

pub use form_state::TaskFormState;

use leptos::prelude::*;
use taskdeck_shared::TaskStatus;

use crate::components::field::TextField;
use crate::validation::{TaskForm, field};

/// 新建 / 编辑任务的模态框
///
/// 提交时先做本地校验，通过后才把表单快照交给 `on_save`；
/// 保存成功后由调用方关闭对话框。
#[component]
pub fn TaskDialog(
    state: TaskFormState,
    open: RwSignal<bool>,
    /// 是否为编辑已有任务
    #[prop(into)]
    is_editing: Signal<bool>,
    #[prop(into)] is_saving: Signal<bool>,
    #[prop(into)] on_save: Callback<TaskForm>,
) -> impl IntoView {
    let dialog_ref = NodeRef::<leptos::html::Dialog>::new();

    Effect::new(move |_| {
        if let Some(dialog) = dialog_ref.get() {
            if open.get() {
                if !dialog.open() {
                    let _ = dialog.show_modal();
                }
            } else if dialog.open() {
                dialog.close();
            }
        }
    });

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = state.snapshot();
        match form.validate() {
            Ok(()) => on_save.run(form),
            Err(errors) => state.errors.set(errors),
        }
    };

    let status_error = move || state.errors.with(|e| e.get(field::STATUS).map(str::to_string));

    view! {
        <dialog class="modal" node_ref=dialog_ref on:close=move |_| open.set(false)>
            <div class="modal-box">
                <h3 class="font-bold text-lg">
                    {move || if is_editing.get() { "Edit task" } else { "New task" }}
                </h3>

                <form on:submit=on_submit class="space-y-4" novalidate>
                    <TextField
                        name=field::TITLE
                        label="Title"
                        placeholder="What needs doing?"
                        value=state.title
                        errors=state.errors
                    />

                    <div class="form-control">
                        <label for="description" class="label">
                            <span class="label-text">"Description"</span>
                        </label>
                        <textarea
                            id="description"
                            class="textarea textarea-bordered w-full"
                            rows="3"
                            on:input=move |ev| state.description.set(event_target_value(&ev))
                            prop:value=move || state.description.get()
                        ></textarea>
                    </div>

                    <div class="form-control">
                        <label for=field::STATUS class="label">
                            <span class="label-text">"Status"</span>
                        </label>
                        <select
                            id=field::STATUS
                            class="select select-bordered w-full"
                            on:change=move |ev| state.status.set(event_target_value(&ev))
                        >
                            {TaskStatus::ALL
                                .into_iter()
                                .map(|status| {
                                    view! {
                                        <option
                                            value=status.as_str()
                                            selected=move || state.status.get() == status.as_str()
                                        >
                                            {status.label()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                        <Show when=move || status_error().is_some()>
                            <label class="label">
                                <span class="label-text-alt text-error">{move || status_error().unwrap_or_default()}</span>
                            </label>
                        </Show>
                    </div>

                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" on:click=move |_| open.set(false)>"Cancel"</button>
                        <button type="submit" disabled=move || is_saving.get() class="btn btn-primary">
                            {move || if is_saving.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Save".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </div>
            <form method="dialog" class="modal-backdrop">
                <button>"close"</button>
            </form>
        </dialog>
    }
}
