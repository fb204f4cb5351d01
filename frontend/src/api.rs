//! API 客户端
//!
//! 单一配置的请求发送器：基础地址 + 默认请求头 + 两个拦截点。
//! - 发出前：会话中有 token 时附加 `Authorization: Bearer <token>`
//! - 收到 401：调用注入的 `on_unauthorized` 回调（由应用外壳负责清除会话并跳转登录页），
//!   然后把错误继续抛给调用方
//!
//! 不做重试、退避或缓存。

use std::sync::Arc;

use leptos::prelude::use_context;
use serde::de::DeserializeOwned;
use taskdeck_shared::protocol::{
    ApiRequest, CreateTaskRequest, DeleteTaskRequest, GetProfileRequest, GetTaskRequest,
    ListTasksRequest, LoginRequest, SignupRequest, UpdateProfileRequest, UpdateTaskRequest,
};
use taskdeck_shared::{
    AuthResponse, BEARER_PREFIX, ErrorBody, HEADER_AUTHORIZATION, Task, TaskDraft, TaskQuery, User,
};

use crate::error::{ApiError, ApiResult};
use crate::web::{FetchTransport, HttpRequest, HttpResponse, HttpTransport};

type TokenSource = Arc<dyn Fn() -> Option<String> + Send + Sync>;
type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// 浏览器中使用的客户端类型
pub type AppApi = ApiClient<FetchTransport>;

/// 从 Context 获取应用外壳提供的客户端
pub fn use_api() -> AppApi {
    use_context::<AppApi>().expect("ApiClient should be provided")
}

#[derive(Clone)]
pub struct ApiClient<T> {
    base_url: String,
    transport: T,
    token: TokenSource,
    on_unauthorized: UnauthorizedHook,
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            token: Arc::new(|| None),
            on_unauthorized: Arc::new(|| {}),
        }
    }

    /// 注入当前 token 的读取方式
    pub fn with_token_source(mut self, source: impl Fn() -> Option<String> + Send + Sync + 'static) -> Self {
        self.token = Arc::new(source);
        self
    }

    /// 注入 401 回调
    pub fn on_unauthorized(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Arc::new(hook);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build_request<R: ApiRequest>(&self, req: &R) -> ApiResult<HttpRequest> {
        let mut http = HttpRequest::new(&self.url(&req.path()), R::METHOD)
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json");

        if let Some(token) = (self.token)() {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("{BEARER_PREFIX}{token}"));
        }

        for (key, value) in req.query() {
            http = http.with_query(key, &value);
        }

        if R::METHOD.carries_body() {
            let body = serde_json::to_string(req).map_err(|e| ApiError::Encode(e.to_string()))?;
            http = http.with_body(body);
        }

        Ok(http)
    }

    /// 发送一个类型化请求
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let http = self.build_request(req)?;
        let path = req.path();
        log::debug!("{} {}", R::METHOD.as_str(), path);

        let resp = self.transport.send(http).await.map_err(|e| {
            log::error!("{} {} failed: {}", R::METHOD.as_str(), path, e);
            ApiError::from(e)
        })?;

        if resp.status == 401 {
            log::warn!("{} {} returned 401, tearing down session", R::METHOD.as_str(), path);
            (self.on_unauthorized)();
            return Err(ApiError::Unauthorized {
                message: error_message(&resp),
            });
        }

        if !resp.ok() {
            log::warn!("{} {} returned {}", R::METHOD.as_str(), path, resp.status);
            return Err(ApiError::Status {
                status: resp.status,
                message: error_message(&resp),
            });
        }

        decode(&resp.body).map_err(|e| {
            log::error!("{} {} returned an unexpected body: {}", R::METHOD.as_str(), path, e);
            e
        })
    }

    // =========================================================
    // 端点
    // =========================================================

    pub async fn signup(&self, req: &SignupRequest) -> ApiResult<AuthResponse> {
        self.send(req).await
    }

    pub async fn login(&self, req: &LoginRequest) -> ApiResult<AuthResponse> {
        self.send(req).await
    }

    pub async fn get_profile(&self) -> ApiResult<User> {
        Ok(self.send(&GetProfileRequest).await?.user)
    }

    pub async fn update_profile(&self, req: &UpdateProfileRequest) -> ApiResult<User> {
        Ok(self.send(req).await?.user)
    }

    pub async fn list_tasks(&self, query: &TaskQuery) -> ApiResult<Vec<Task>> {
        let req = ListTasksRequest {
            query: query.clone(),
        };
        Ok(self.send(&req).await?.tasks)
    }

    pub async fn get_task(&self, id: &str) -> ApiResult<Task> {
        let req = GetTaskRequest { id: id.to_string() };
        Ok(self.send(&req).await?.task)
    }

    pub async fn create_task(&self, draft: TaskDraft) -> ApiResult<Task> {
        Ok(self.send(&CreateTaskRequest { draft }).await?.task)
    }

    pub async fn update_task(&self, id: &str, draft: TaskDraft) -> ApiResult<Task> {
        let req = UpdateTaskRequest {
            id: id.to_string(),
            draft,
        };
        Ok(self.send(&req).await?.task)
    }

    pub async fn delete_task(&self, id: &str) -> ApiResult<()> {
        self.send(&DeleteTaskRequest { id: id.to_string() })
            .await
            .map(|_| ())
    }
}

/// 读取非 2xx 响应体中的 `message` 字段
fn error_message(resp: &HttpResponse) -> Option<String> {
    serde_json::from_str::<ErrorBody>(&resp.body)
        .ok()
        .and_then(|b| b.message)
}

/// 空响应体按 `{}` 处理
fn decode<D: DeserializeOwned>(body: &str) -> ApiResult<D> {
    let body = if body.trim().is_empty() { "{}" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
