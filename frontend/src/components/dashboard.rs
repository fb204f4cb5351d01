mod task_list;

use leptos::prelude::*;
use leptos::task::spawn_local;
use taskdeck_shared::{Task, TaskDraft, TaskStatus};

use crate::actions::{Refreshed, remove_task, save_task};
use crate::api::use_api;
use crate::components::nav::NavBar;
use crate::components::notice::{Notice, NoticeToast};
use crate::components::task_dialog::{TaskDialog, TaskFormState};
use crate::error::SubmitError;
use crate::validation::TaskForm;

use task_list::TaskList;

fn status_badge(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "badge badge-warning",
        TaskStatus::InProgress => "badge badge-info",
        TaskStatus::Completed => "badge badge-success",
    }
}

fn confirm_delete(task: &Task) -> bool {
    window()
        .confirm_with_message(&format!("Delete \"{}\"? This cannot be undone.", task.title))
        .unwrap_or(false)
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = StoredValue::new(use_api());

    let notice = RwSignal::new(Option::<Notice>::None);
    let list = TaskList::new(notice);
    // 搜索词、状态过滤或页码变化时重新拉取
    list.watch(api.get_value());

    let form_state = TaskFormState::new();
    let dialog_open = RwSignal::new(false);
    let editing = RwSignal::new(Option::<String>::None);
    let saving = RwSignal::new(false);

    let open_create = move |_| {
        editing.set(None);
        form_state.reset();
        dialog_open.set(true);
    };

    let open_edit = move |id: String| {
        let api = api.get_value();
        spawn_local(async move {
            match api.get_task(&id).await {
                Ok(task) => {
                    editing.try_set(Some(task.id.clone()));
                    form_state.load(&TaskDraft::from(&task));
                    dialog_open.try_set(true);
                }
                Err(e) => {
                    log::warn!("failed to load task {}: {}", id, e);
                    notice.try_set(Some(Notice::error(e.user_message("Failed to load task"))));
                }
            }
        });
    };

    let on_save = move |form: TaskForm| {
        saving.set(true);
        let editing_id = editing.get_untracked();
        let current = list.query.get_untracked();
        let api = api.get_value();

        spawn_local(async move {
            match save_task(&api, editing_id.as_deref(), &form, &current).await {
                Ok(Refreshed { tasks, .. }) => {
                    dialog_open.try_set(false);
                    let text = if editing_id.is_some() {
                        "Task updated successfully"
                    } else {
                        "Task created successfully"
                    };
                    notice.try_set(Some(Notice::success(text)));
                    list.apply_refresh(tasks);
                }
                Err(SubmitError::Invalid(errors)) => {
                    form_state.errors.try_set(errors);
                }
                Err(SubmitError::Api(e)) => {
                    log::warn!("failed to save task: {}", e);
                    notice.try_set(Some(Notice::error(e.user_message("Failed to save task"))));
                }
            }
            saving.try_set(false);
        });
    };

    let on_delete = move |task: Task| {
        let current = list.query.get_untracked();
        let api = api.get_value();
        spawn_local(async move {
            match remove_task(&api, &task, confirm_delete, &current).await {
                Ok(None) => {}
                Ok(Some(Refreshed { tasks, .. })) => {
                    notice.try_set(Some(Notice::success("Task deleted")));
                    list.apply_refresh(tasks);
                }
                Err(e) => {
                    log::warn!("failed to delete task {}: {}", task.id, e);
                    notice.try_set(Some(Notice::error(e.user_message("Failed to delete task"))));
                }
            }
        });
    };

    let loading = list.loading;
    let task_count = move || list.tasks.with(Vec::len);

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-5xl mx-auto space-y-8">
                <NoticeToast notice=notice />
                <NavBar />

                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0">
                        <div class="flex flex-col md:flex-row md:items-center justify-between gap-4 p-6 pb-2">
                            <div>
                                <h3 class="card-title">"My tasks"</h3>
                                <p class="text-base-content/70 text-sm">"Search, filter and manage your tasks."</p>
                            </div>
                            <button class="btn btn-primary" on:click=open_create>"+ New task"</button>
                        </div>

                        <div class="flex flex-col md:flex-row gap-4 px-6 py-2">
                            <input
                                type="search"
                                placeholder="Search tasks..."
                                class="input input-bordered w-full md:flex-1"
                                prop:value=move || list.query.with(|q| q.search.clone())
                                on:input=move |ev| {
                                    list.set_search(event_target_value(&ev));
                                }
                            />
                            <select
                                class="select select-bordered w-full md:w-48"
                                on:change=move |ev| {
                                    list.set_status_filter(&event_target_value(&ev));
                                }
                            >
                                <option value="" selected=move || list.query.with(|q| q.status.is_none())>"All statuses"</option>
                                {TaskStatus::ALL
                                    .into_iter()
                                    .map(|status| {
                                        view! {
                                            <option
                                                value=status.as_str()
                                                selected=move || list.query.with(|q| q.status == Some(status))
                                            >
                                                {status.label()}
                                            </option>
                                        }
                                    })
                                    .collect_view()}
                            </select>
                        </div>

                        <div class="overflow-x-auto w-full">
                            <table class="table table-zebra w-full">
                                <thead>
                                    <tr>
                                        <th>"Title"</th>
                                        <th class="hidden md:table-cell">"Description"</th>
                                        <th>"Status"</th>
                                        <th class="hidden md:table-cell">"Created"</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    <Show when=move || task_count() == 0 && !loading.get()>
                                        <tr>
                                            <td colspan="5" class="text-center py-8 text-base-content/50">
                                                "No tasks found."
                                            </td>
                                        </tr>
                                    </Show>
                                    <Show when=move || loading.get() && task_count() == 0>
                                        <tr>
                                            <td colspan="5" class="text-center py-8 text-base-content/50">
                                                <span class="loading loading-spinner loading-md"></span> " Loading..."
                                            </td>
                                        </tr>
                                    </Show>
                                    <For
                                        each=move || list.tasks.get()
                                        key=|task| (task.id.clone(), task.updated_at)
                                        children=move |task| {
                                            let id = task.id.clone();
                                            let created = task
                                                .created_at
                                                .map(|at| at.format("%Y-%m-%d").to_string())
                                                .unwrap_or_default();
                                            let to_delete = task.clone();
                                            view! {
                                                <tr>
                                                    <td class="font-bold">{task.title.clone()}</td>
                                                    <td class="hidden md:table-cell text-sm opacity-70">{task.description.clone()}</td>
                                                    <td>
                                                        <span class=status_badge(task.status)>{task.status.label()}</span>
                                                    </td>
                                                    <td class="hidden md:table-cell font-mono text-xs opacity-50">{created}</td>
                                                    <td>
                                                        <div class="flex gap-2 justify-end">
                                                            <button class="btn btn-ghost btn-sm" on:click=move |_| open_edit(id.clone())>
                                                                "Edit"
                                                            </button>
                                                            <button
                                                                class="btn btn-ghost btn-sm text-error"
                                                                on:click=move |_| on_delete(to_delete.clone())
                                                            >
                                                                "Delete"
                                                            </button>
                                                        </div>
                                                    </td>
                                                </tr>
                                            }
                                        }
                                    />
                                </tbody>
                            </table>
                        </div>

                        <div class="flex items-center justify-center gap-2 p-4">
                            <div class="join">
                                <button
                                    class="join-item btn btn-sm"
                                    disabled=move || list.page() <= 1 || loading.get()
                                    on:click=move |_| list.prev_page()
                                >
                                    "«"
                                </button>
                                <button class="join-item btn btn-sm btn-disabled">{move || format!("Page {}", list.page())}</button>
                                <button
                                    class="join-item btn btn-sm"
                                    disabled=move || !list.has_next_page() || loading.get()
                                    on:click=move |_| list.next_page()
                                >
                                    "»"
                                </button>
                            </div>
                        </div>
                    </div>
                </div>
            </div>

            <TaskDialog
                state=form_state
                open=dialog_open
                is_editing=Signal::derive(move || editing.get().is_some())
                is_saving=saving
                on_save=on_save
            />
        </div>
    }
}
