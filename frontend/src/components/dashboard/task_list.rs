//! 任务列表状态
//!
//! 查询条件、当前页数据与加载标记都放在 `TaskList` 里。
//! 每次拉取登记一个递增的代号，只接受最新代号的响应；
//! 页面卸载后所有更新都变成空操作。

use leptos::prelude::*;
use leptos::task::spawn_local;
use taskdeck_shared::{Task, TaskQuery, TaskStatus};

use crate::api::ApiClient;
use crate::components::notice::Notice;
use crate::error::ApiResult;
use crate::web::HttpTransport;

/// 每页任务数
pub const PAGE_SIZE: u32 = 10;

fn initial_query() -> TaskQuery {
    TaskQuery {
        page: Some(1),
        limit: Some(PAGE_SIZE),
        ..TaskQuery::default()
    }
}

#[derive(Clone, Copy)]
pub struct TaskList {
    pub query: RwSignal<TaskQuery>,
    pub tasks: RwSignal<Vec<Task>>,
    pub loading: RwSignal<bool>,
    notice: RwSignal<Option<Notice>>,
    generation: StoredValue<u64>,
}

impl TaskList {
    /// 加载失败的提示写入 `notice`
    pub fn new(notice: RwSignal<Option<Notice>>) -> Self {
        Self {
            query: RwSignal::new(initial_query()),
            tasks: RwSignal::new(Vec::new()),
            loading: RwSignal::new(true),
            notice,
            generation: StoredValue::new(0),
        }
    }

    /// 查询条件变化时自动重新拉取
    pub fn watch<T>(self, api: ApiClient<T>)
    where
        T: HttpTransport + Clone + 'static,
    {
        Effect::new(move |_| {
            let current = self.query.get();
            self.fetch(api.clone(), current);
        });
    }

    fn fetch<T>(self, api: ApiClient<T>, query: TaskQuery)
    where
        T: HttpTransport + 'static,
    {
        let Some(generation_id) = self.next_generation() else {
            return;
        };
        self.loading.try_set(true);
        spawn_local(async move {
            let result = api.list_tasks(&query).await;
            self.apply(generation_id, result);
        });
    }

    /// 登记一次新的拉取；页面已卸载时返回 `None`
    pub fn next_generation(&self) -> Option<u64> {
        self.generation.try_update_value(|g| {
            *g += 1;
            *g
        })
    }

    /// 写入拉取结果，返回是否被采用（过期或页面已卸载时丢弃）
    pub fn apply(&self, generation_id: u64, result: ApiResult<Vec<Task>>) -> bool {
        if self.generation.try_get_value() != Some(generation_id) {
            log::debug!("dropping stale task list (generation {})", generation_id);
            return false;
        }
        match result {
            Ok(list) => {
                self.tasks.try_set(list);
            }
            Err(e) => {
                log::warn!("failed to load tasks: {}", e);
                self.notice
                    .try_set(Some(Notice::error(e.user_message("Failed to load tasks"))));
            }
        }
        self.loading.try_set(false);
        true
    }

    /// 写操作之后随附的刷新结果
    pub fn apply_refresh(&self, result: ApiResult<Vec<Task>>) {
        if let Some(generation_id) = self.next_generation() {
            self.apply(generation_id, result);
        }
    }

    /// 修改搜索词并回到第一页（同一次更新内完成，只触发一次拉取）
    pub fn set_search(&self, search: String) {
        self.query.update(|q| {
            q.search = search;
            q.page = Some(1);
        });
    }

    /// 下拉框取值为空表示不过滤；无法识别的取值同样视为不过滤
    pub fn set_status_filter(&self, raw: &str) {
        let status = raw.parse::<TaskStatus>().ok();
        self.query.update(|q| {
            q.status = status;
            q.page = Some(1);
        });
    }

    pub fn page(&self) -> u32 {
        self.query.with(|q| q.page.unwrap_or(1))
    }

    pub fn prev_page(&self) {
        self.query
            .update(|q| q.page = Some(q.page.unwrap_or(1).saturating_sub(1).max(1)));
    }

    pub fn next_page(&self) {
        self.query.update(|q| q.page = Some(q.page.unwrap_or(1) + 1));
    }

    /// 返回满页时才认为可能还有下一页
    pub fn has_next_page(&self) -> bool {
        self.tasks.with(Vec::len) >= PAGE_SIZE as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::web::MockTransport;
    use any_spawner::Executor;
    use serde_json::json;
    use taskdeck_shared::protocol::HttpMethod;
    use tokio::task::LocalSet;

    const BASE: &str = "http://api.test/api";

    fn task(id: &str) -> Task {
        serde_json::from_value(json!({"id": id, "title": id, "status": "pending"})).unwrap()
    }

    fn owned_list() -> (Owner, TaskList) {
        let owner = Owner::new();
        owner.set();
        let list = TaskList::new(RwSignal::new(None));
        (owner, list)
    }

    /// 让 Effect 与其派生的本地任务跑完
    async fn settle() {
        for _ in 0..8 {
            Executor::tick().await;
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn test_starts_on_first_page() {
        let (_owner, list) = owned_list();
        let query = list.query.get_untracked();
        assert_eq!(query.page, Some(1));
        assert_eq!(query.limit, Some(PAGE_SIZE));
        assert_eq!(query.search, "");
        assert_eq!(query.status, None);
    }

    #[test]
    fn test_search_and_filter_reset_page() {
        let (_owner, list) = owned_list();
        list.next_page();
        list.next_page();
        assert_eq!(list.query.get_untracked().page, Some(3));

        list.set_search("milk".to_string());
        assert_eq!(list.query.get_untracked().page, Some(1));
        assert_eq!(list.query.get_untracked().search, "milk");

        list.next_page();
        list.set_status_filter("in-progress");
        let query = list.query.get_untracked();
        assert_eq!(query.status, Some(TaskStatus::InProgress));
        assert_eq!(query.page, Some(1));

        list.set_status_filter("");
        assert_eq!(list.query.get_untracked().status, None);
    }

    #[test]
    fn test_prev_page_stops_at_one() {
        let (_owner, list) = owned_list();
        list.prev_page();
        assert_eq!(list.query.get_untracked().page, Some(1));
    }

    #[test]
    fn test_next_page_only_after_full_page() {
        let (_owner, list) = owned_list();
        assert!(!list.has_next_page());

        let almost: Vec<Task> = (1..PAGE_SIZE).map(|i| task(&format!("t{i}"))).collect();
        list.tasks.set(almost);
        assert!(!list.has_next_page());

        list.tasks.update(|t| t.push(task("last")));
        assert!(list.has_next_page());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let (_owner, list) = owned_list();
        let older = list.next_generation().unwrap();
        let newer = list.next_generation().unwrap();

        assert!(list.apply(newer, Ok(vec![task("fresh")])));
        assert!(!list.apply(older, Ok(vec![task("stale")])));

        let ids: Vec<String> = list.tasks.get_untracked().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["fresh".to_string()]);
        assert!(!list.loading.get_untracked());
    }

    #[test]
    fn test_failed_load_raises_notice() {
        let owner = Owner::new();
        owner.set();
        let notice = RwSignal::new(None);
        let list = TaskList::new(notice);

        let generation_id = list.next_generation().unwrap();
        let failed = Err(ApiError::Status {
            status: 500,
            message: Some("db down".to_string()),
        });
        assert!(list.apply(generation_id, failed));

        assert_eq!(notice.get_untracked(), Some(Notice::error("db down")));
        assert!(list.tasks.get_untracked().is_empty());
    }

    #[test]
    fn test_updates_after_unmount_are_ignored() {
        let (owner, list) = owned_list();
        let generation_id = list.next_generation().unwrap();

        owner.cleanup();

        assert_eq!(list.next_generation(), None);
        assert!(!list.apply(generation_id, Ok(vec![task("late")])));
        list.apply_refresh(Ok(vec![task("late")]));
    }

    #[tokio::test]
    async fn test_each_query_change_fetches_once() {
        let _ = Executor::init_tokio();
        LocalSet::new()
            .run_until(async {
                let (_owner, list) = owned_list();
                let transport = MockTransport::new();
                transport.mock_response(
                    HttpMethod::Get,
                    &format!("{BASE}/tasks"),
                    200,
                    json!({"tasks": [{"id": "t1", "title": "Buy milk", "status": "pending"}]}),
                );

                list.watch(ApiClient::new(BASE, transport.clone()));
                settle().await;
                assert_eq!(transport.request_count(), 1);
                assert_eq!(list.tasks.get_untracked().len(), 1);
                assert!(!list.loading.get_untracked());

                list.set_search("milk".to_string());
                settle().await;
                assert_eq!(transport.request_count(), 2);

                list.set_status_filter("completed");
                settle().await;
                assert_eq!(transport.request_count(), 3);

                let last = transport.requests().pop().unwrap();
                assert_eq!(last.method, HttpMethod::Get);
                assert_eq!(last.query_param("search"), Some("milk"));
                assert_eq!(last.query_param("status"), Some("completed"));
                assert_eq!(last.query_param("page"), Some("1"));
                assert_eq!(last.query_param("limit"), Some("10"));
            })
            .await;
    }
}
