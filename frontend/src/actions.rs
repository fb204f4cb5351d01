//! 视图动作
//!
//! 各页面的"校验 -> 请求 -> 刷新"流程，与 DOM 无关，便于针对 `MockTransport` 测试。
//! 校验失败时不会发出任何请求。

use taskdeck_shared::{Task, TaskQuery, User};

use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult, SubmitError};
use crate::session::Session;
use crate::validation::{LoginForm, ProfileForm, SignupForm, TaskForm};
use crate::web::HttpTransport;

/// 写操作完成后的结果与随之刷新的任务列表
///
/// 写入成功但刷新失败时，`tasks` 携带刷新错误，写入本身仍视为成功。
#[derive(Debug, Clone, PartialEq)]
pub struct Refreshed<V> {
    pub value: V,
    pub tasks: ApiResult<Vec<Task>>,
}

pub async fn submit_login<T: HttpTransport>(
    api: &ApiClient<T>,
    form: &LoginForm,
) -> Result<Session, SubmitError> {
    form.validate().map_err(SubmitError::Invalid)?;
    let resp = api.login(&form.to_request()).await?;
    Ok(Session::from(resp))
}

pub async fn submit_signup<T: HttpTransport>(
    api: &ApiClient<T>,
    form: &SignupForm,
) -> Result<Session, SubmitError> {
    form.validate().map_err(SubmitError::Invalid)?;
    let resp = api.signup(&form.to_request()).await?;
    Ok(Session::from(resp))
}

pub async fn submit_profile<T: HttpTransport>(
    api: &ApiClient<T>,
    form: &ProfileForm,
) -> Result<User, SubmitError> {
    form.validate().map_err(SubmitError::Invalid)?;
    Ok(api.update_profile(&form.to_request()).await?)
}

/// 创建 (`editing == None`) 或更新任务，完成后重新拉取列表
pub async fn save_task<T: HttpTransport>(
    api: &ApiClient<T>,
    editing: Option<&str>,
    form: &TaskForm,
    query: &TaskQuery,
) -> Result<Refreshed<Task>, SubmitError> {
    form.validate().map_err(SubmitError::Invalid)?;
    let draft = form.to_draft();

    let task = match editing {
        Some(id) => api.update_task(id, draft).await?,
        None => api.create_task(draft).await?,
    };
    log::info!("saved task {}", task.id);

    let tasks = api.list_tasks(query).await;
    Ok(Refreshed { value: task, tasks })
}

/// 删除任务
///
/// `confirm` 在请求前被调用，返回 false 时静默放弃（`Ok(None)`，不发请求）。
pub async fn remove_task<T: HttpTransport>(
    api: &ApiClient<T>,
    task: &Task,
    confirm: impl FnOnce(&Task) -> bool,
    query: &TaskQuery,
) -> Result<Option<Refreshed<()>>, ApiError> {
    if !confirm(task) {
        log::debug!("delete of task {} cancelled", task.id);
        return Ok(None);
    }

    api.delete_task(&task.id).await?;
    log::info!("deleted task {}", task.id);

    let tasks = api.list_tasks(query).await;
    Ok(Some(Refreshed { value: (), tasks }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::field;
    use crate::web::MockTransport;
    use serde_json::json;
    use taskdeck_shared::TaskStatus;
    use taskdeck_shared::protocol::HttpMethod;

    const BASE: &str = "http://api.test/api";

    fn url(path: &str) -> String {
        format!("{BASE}{path}")
    }

    fn api(transport: &MockTransport) -> ApiClient<MockTransport> {
        ApiClient::new(BASE, transport.clone()).with_token_source(|| Some("tok".to_string()))
    }

    fn user_json() -> serde_json::Value {
        json!({"id": "u1", "name": "Ada", "email": "ada@example.com"})
    }

    fn task_json(id: &str, title: &str) -> serde_json::Value {
        json!({"id": id, "title": title, "description": "2%", "status": "pending"})
    }

    fn sample_task() -> Task {
        serde_json::from_value(task_json("t1", "Buy milk")).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_signup_sends_nothing() {
        let transport = MockTransport::new();
        let form = SignupForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "abc12".to_string(),
            confirm_password: "abc12".to_string(),
        };

        let err = submit_signup(&api(&transport), &form).await.unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(
            errors.get(field::PASSWORD),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_login_sends_nothing() {
        let transport = MockTransport::new();
        let form = LoginForm {
            email: String::new(),
            password: String::new(),
        };

        let err = submit_login(&api(&transport), &form).await.unwrap_err();
        assert_eq!(err.field_errors().map(|e| e.len()), Some(2));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_signup_returns_session() {
        let transport = MockTransport::new();
        transport.mock_response(
            HttpMethod::Post,
            &url("/auth/signup"),
            201,
            json!({"token": "fresh", "user": user_json()}),
        );
        let form = SignupForm {
            name: "Ada".to_string(),
            email: " ada@example.com ".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        };

        let session = submit_signup(&api(&transport), &form).await.unwrap();
        assert_eq!(session.token, "fresh");
        assert_eq!(session.user.email, "ada@example.com");

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        let body: serde_json::Value = serde_json::from_str(sent[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"name": "Ada", "email": "ada@example.com", "password": "secret1"})
        );
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_message() {
        let transport = MockTransport::new();
        transport.mock_response(
            HttpMethod::Post,
            &url("/auth/login"),
            400,
            json!({"message": "Invalid credentials"}),
        );
        let form = LoginForm {
            email: "ada@example.com".to_string(),
            password: "wrong-password".to_string(),
        };

        let err = submit_login(&api(&transport), &form).await.unwrap_err();
        match err {
            SubmitError::Api(e) => assert_eq!(e.user_message("Login failed"), "Invalid credentials"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_profile_update_returns_replacement_user() {
        let transport = MockTransport::new();
        transport.mock_response(
            HttpMethod::Put,
            &url("/profile"),
            200,
            json!({"user": {"id": "u1", "name": "Ada Lovelace", "email": "ada@example.com"}}),
        );
        let form = ProfileForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };

        let user = submit_profile(&api(&transport), &form).await.unwrap();
        assert_eq!(user.name, "Ada Lovelace");
        let body: serde_json::Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn test_empty_title_sends_nothing() {
        let transport = MockTransport::new();
        let form = TaskForm {
            title: String::new(),
            description: "2%".to_string(),
            status: "pending".to_string(),
        };

        let err = save_task(&api(&transport), None, &form, &TaskQuery::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.field_errors().and_then(|e| e.get(field::TITLE)),
            Some("Title is required")
        );
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_posts_then_refetches_once() {
        let transport = MockTransport::new();
        transport.mock_response(
            HttpMethod::Post,
            &url("/tasks"),
            201,
            json!({"task": task_json("t1", "Buy milk")}),
        );
        transport.mock_response(
            HttpMethod::Get,
            &url("/tasks"),
            200,
            json!({"tasks": [task_json("t1", "Buy milk")]}),
        );
        let form = TaskForm {
            title: "Buy milk".to_string(),
            description: "2%".to_string(),
            status: "pending".to_string(),
        };
        let query = TaskQuery {
            search: "milk".to_string(),
            ..Default::default()
        };

        let refreshed = save_task(&api(&transport), None, &form, &query).await.unwrap();
        assert_eq!(refreshed.value.title, "Buy milk");
        assert_eq!(refreshed.tasks.unwrap().len(), 1);

        let sent = transport.requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].method, HttpMethod::Post);
        assert_eq!(sent[1].method, HttpMethod::Get);
        assert_eq!(sent[1].query_param("search"), Some("milk"));
        assert_eq!(sent[1].query_param("status"), Some(""));
    }

    #[tokio::test]
    async fn test_update_uses_put_on_task_path() {
        let transport = MockTransport::new();
        transport.mock_response(
            HttpMethod::Put,
            &url("/tasks/t1"),
            200,
            json!({"task": {"id": "t1", "title": "Buy oat milk", "description": "", "status": "completed"}}),
        );
        transport.mock_response(HttpMethod::Get, &url("/tasks"), 200, json!({"tasks": []}));
        let form = TaskForm {
            title: "Buy oat milk".to_string(),
            description: String::new(),
            status: "completed".to_string(),
        };

        let refreshed = save_task(&api(&transport), Some("t1"), &form, &TaskQuery::default())
            .await
            .unwrap();
        assert_eq!(refreshed.value.status, TaskStatus::Completed);
        assert_eq!(transport.requests()[0].url, url("/tasks/t1"));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_successful_write() {
        let transport = MockTransport::new();
        transport.mock_response(
            HttpMethod::Post,
            &url("/tasks"),
            201,
            json!({"task": task_json("t1", "Buy milk")}),
        );
        transport.mock_response(HttpMethod::Get, &url("/tasks"), 500, json!({}));
        let form = TaskForm {
            title: "Buy milk".to_string(),
            description: String::new(),
            status: "pending".to_string(),
        };

        let refreshed = save_task(&api(&transport), None, &form, &TaskQuery::default())
            .await
            .unwrap();
        assert!(matches!(refreshed.tasks, Err(ApiError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let transport = MockTransport::new();
        let task = sample_task();

        let outcome = remove_task(&api(&transport), &task, |_| false, &TaskQuery::default())
            .await
            .unwrap();
        assert_eq!(outcome, None);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_confirmed_delete_then_single_refetch() {
        let transport = MockTransport::new();
        transport.mock_response(HttpMethod::Delete, &url("/tasks/t1"), 200, json!({}));
        transport.mock_response(HttpMethod::Get, &url("/tasks"), 200, json!({"tasks": []}));
        let task = sample_task();

        let outcome = remove_task(&api(&transport), &task, |t| t.id == "t1", &TaskQuery::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome.tasks, Ok(Vec::new()));

        let sent = transport.requests();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].method, HttpMethod::Delete);
        assert_eq!(sent[0].url, url("/tasks/t1"));
        assert_eq!(sent[1].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn test_failed_delete_skips_refetch() {
        let transport = MockTransport::new();
        transport.mock_response(
            HttpMethod::Delete,
            &url("/tasks/t1"),
            404,
            json!({"message": "Task not found"}),
        );
        let task = sample_task();

        let err = remove_task(&api(&transport), &task, |_| true, &TaskQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Task not found"));
        assert_eq!(transport.request_count(), 1);
    }
}
