use thiserror::Error;

use crate::validation::FieldErrors;
use crate::web::HttpError;

pub type ApiResult<T> = Result<T, ApiError>;

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// API 客户端错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401: 会话失效，已触发全局注销
    #[error("unauthorized{}", message_suffix(.message))]
    Unauthorized { message: Option<String> },
    /// 其他非 2xx 响应
    #[error("request failed with status {status}{}", message_suffix(.message))]
    Status { status: u16, message: Option<String> },
    #[error(transparent)]
    Transport(#[from] HttpError),
    #[error("failed to encode request body: {0}")]
    Encode(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// 服务端返回的 `message` 字段
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { message } | ApiError::Status { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// 展示给用户的文本：优先使用服务端消息，否则使用调用方给出的兜底文案
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
            .to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }
}

/// 表单提交失败：本地校验未通过，或请求失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("validation failed for {} field(s)", .0.len())]
    Invalid(FieldErrors),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SubmitError::Invalid(errors) => Some(errors),
            SubmitError::Api(_) => None,
        }
    }
}
