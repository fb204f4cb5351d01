//! 表单校验
//!
//! 每个表单都有一个纯数据快照 (`*Form`)，校验会收集所有字段错误而不是遇错即停。
//! 快照通过 `to_request` 转换成线上请求，`confirm_password` 之类的
//! 纯前端字段在此被丢弃。

use std::collections::BTreeMap;

use lazy_regex::regex_is_match;
use taskdeck_shared::protocol::{LoginRequest, SignupRequest, UpdateProfileRequest};
use taskdeck_shared::{TaskDraft, TaskStatus};

pub const MIN_PASSWORD_LEN: usize = 6;

/// 字段名常量，与输入框的 `name` 保持一致
pub mod field {
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirmPassword";
    pub const TITLE: &str = "title";
    pub const STATUS: &str = "status";
}

/// 字段名 -> 错误消息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同一字段只保留第一条错误
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

// =========================================================
// 规则
// =========================================================

/// 简单的 `local@domain.tld` 形状检查
pub fn is_valid_email(value: &str) -> bool {
    regex_is_match!(r"^[^\s@]+@[^\s@]+\.[^\s@]+$", value)
}

fn check_required(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, message);
        false
    } else {
        true
    }
}

fn check_email(errors: &mut FieldErrors, value: &str) {
    if check_required(errors, field::EMAIL, value, "Email is required")
        && !is_valid_email(value.trim())
    {
        errors.add(field::EMAIL, "Please enter a valid email");
    }
}

fn check_new_password(errors: &mut FieldErrors, value: &str) {
    if value.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            field::PASSWORD,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        );
    }
}

// =========================================================
// 表单快照
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.add(field::PASSWORD, "Password is required");
        }
        errors.into_result()
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, field::NAME, &self.name, "Name is required");
        check_email(&mut errors, &self.email);

        if self.password.is_empty() {
            errors.add(field::PASSWORD, "Password is required");
        } else {
            check_new_password(&mut errors, &self.password);
        }

        if self.confirm_password.is_empty() {
            errors.add(field::CONFIRM_PASSWORD, "Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.add(field::CONFIRM_PASSWORD, "Passwords do not match");
        }
        errors.into_result()
    }

    pub fn to_request(&self) -> SignupRequest {
        SignupRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// 个人资料表单；密码留空表示不修改
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, field::NAME, &self.name, "Name is required");
        check_email(&mut errors, &self.email);

        if !self.password.is_empty() {
            check_new_password(&mut errors, &self.password);
            if self.confirm_password != self.password {
                errors.add(field::CONFIRM_PASSWORD, "Passwords do not match");
            }
        }
        errors.into_result()
    }

    pub fn to_request(&self) -> UpdateProfileRequest {
        UpdateProfileRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// 下拉框的原始取值
    pub status: String,
}

impl TaskForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        check_required(&mut errors, field::TITLE, &self.title, "Title is required");
        if self.status.parse::<TaskStatus>().is_err() {
            errors.add(field::STATUS, "Please choose a valid status");
        }
        errors.into_result()
    }

    /// 仅在 `validate` 通过后调用；无法识别的状态回退为 pending
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            status: self.status.parse().unwrap_or_default(),
        }
    }
}

impl From<&TaskDraft> for TaskForm {
    fn from(draft: &TaskDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status.as_str().to_string(),
        }
    }
}
