use crate::{
    Acknowledged, AuthResponse, ProfileResponse, TaskDraft, TaskListResponse, TaskQuery,
    TaskResponse,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether the request struct is serialized as the JSON body.
    pub fn carries_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The URL path relative to the API base.
    fn path(&self) -> String;

    /// Query string parameters.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// 任务资源路径，id 作为单个路径段进行百分号编码
fn task_path(id: &str) -> String {
    format!("/tasks/{}", urlencoding::encode(id))
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for SignupRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/signup".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

// =========================================================
// Profile
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetProfileRequest;

impl ApiRequest for GetProfileRequest {
    type Response = ProfileResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/profile".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
    /// Omitted when the user keeps the current password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ApiRequest for UpdateProfileRequest {
    type Response = ProfileResponse;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        "/profile".to_string()
    }
}

// =========================================================
// Tasks
// =========================================================

/// List tasks matching the search text and status filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListTasksRequest {
    #[serde(skip)]
    pub query: TaskQuery,
}

impl ApiRequest for ListTasksRequest {
    type Response = TaskListResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/tasks".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.query.to_params()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTaskRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for GetTaskRequest {
    type Response = TaskResponse;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        task_path(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreateTaskRequest {
    pub draft: TaskDraft,
}

impl ApiRequest for CreateTaskRequest {
    type Response = TaskResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/tasks".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub draft: TaskDraft,
}

impl ApiRequest for UpdateTaskRequest {
    type Response = TaskResponse;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        task_path(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTaskRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteTaskRequest {
    type Response = Acknowledged;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        task_path(&self.id)
    }
}
