//! 任务表单状态
//!
//! 将各输入框的 signal 整合为 `TaskFormState`，负责：
//! - 数据的持有（含字段错误）
//! - 重置 / 用已有任务预填
//! - 生成提交用的 `TaskForm` 快照

use leptos::prelude::*;
use taskdeck_shared::{TaskDraft, TaskStatus};

use crate::validation::{FieldErrors, TaskForm};

/// 使用 `RwSignal` 因为它实现了 `Copy`，可直接作为 Props 传递。
#[derive(Clone, Copy)]
pub struct TaskFormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    /// 下拉框取值 (`pending` / `in-progress` / `completed`)
    pub status: RwSignal<String>,
    pub errors: RwSignal<FieldErrors>,
}

impl TaskFormState {
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            status: RwSignal::new(TaskStatus::default().as_str().to_string()),
            errors: RwSignal::new(FieldErrors::new()),
        }
    }

    /// 新建任务前清空
    pub fn reset(&self) {
        self.fill(&TaskForm {
            status: TaskStatus::default().as_str().to_string(),
            ..TaskForm::default()
        });
    }

    /// 编辑前用服务端的任务内容预填
    pub fn load(&self, draft: &TaskDraft) {
        self.fill(&TaskForm::from(draft));
    }

    /// 可能在请求返回后调用，此时对话框可能已随页面卸载
    fn fill(&self, form: &TaskForm) {
        self.title.try_set(form.title.clone());
        self.description.try_set(form.description.clone());
        self.status.try_set(form.status.clone());
        self.errors.try_set(FieldErrors::new());
    }

    pub fn snapshot(&self) -> TaskForm {
        TaskForm {
            title: self.title.get_untracked(),
            description: self.description.get_untracked(),
            status: self.status.get_untracked(),
        }
    }
}

impl Default for TaskFormState {
    fn default() -> Self {
        Self::new()
    }
}
