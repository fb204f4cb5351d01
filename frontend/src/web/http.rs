//! HTTP 传输层
//!
//! 定义与具体实现无关的请求 / 响应结构和 `HttpTransport` 特性，
//! 生产环境使用基于 `gloo-net` (浏览器 fetch) 的 `FetchTransport`，
//! 测试中使用记录请求的 `MockTransport`。

use async_trait::async_trait;
use gloo_net::http::Request;
use taskdeck_shared::protocol::HttpMethod;
use thiserror::Error;

/// HTTP 错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpError {
    /// 请求构建失败
    #[error("请求构建失败: {0}")]
    RequestBuildFailed(String),
    /// 网络请求失败
    #[error("网络错误: {0}")]
    NetworkError(String),
    /// 响应体读取失败
    #[error("响应读取失败: {0}")]
    ResponseReadFailed(String),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    /// 按名称查找请求头 (大小写不敏感)
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 传输特性
///
/// (?Send) 是因为浏览器环境下 fetch 返回的 Future 不是 Send 的。
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 实现层: 浏览器 fetch
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Put => Request::put(&req.url),
            HttpMethod::Delete => Request::delete(&req.url),
        };

        let builder = req
            .headers
            .iter()
            .fold(builder, |b, (k, v)| b.header(k, v));

        let builder = if req.query.is_empty() {
            builder
        } else {
            builder.query(req.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        };

        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| HttpError::RequestBuildFailed(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HttpError::ResponseReadFailed(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockTransport
// =========================================================

#[cfg(test)]
pub use mock::MockTransport;
