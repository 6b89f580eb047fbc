use uuid::Uuid;

use crate::models::{
    CreateTask, SortKey, SortOrder, StatusFilter, TaskFilter, TaskResponse, UpdateTask,
};

use super::api::ApiClient;

/// Partial filter change merged over the active filters by
/// [`TaskStore::set_filters`]. `search` and `tag_ids` carry a second Option
/// layer so they can be cleared as well as set.
#[derive(Debug, Default)]
pub struct FilterPatch {
    pub status: Option<StatusFilter>,
    pub search: Option<Option<String>>,
    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,
    pub tag_ids: Option<Option<Vec<Uuid>>>,
}

/// Client-side mirror of the server's task list: the current page of tasks,
/// loading/error flags and the active filters.
///
/// Only `toggle_completion` is optimistic; every other mutation is applied
/// after the server confirms it.
pub struct TaskStore {
    api: ApiClient,
    pub tasks: Vec<TaskResponse>,
    pub total: i64,
    pub is_loading: bool,
    pub error: Option<String>,
    pub filters: TaskFilter,
}

impl TaskStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            total: 0,
            is_loading: false,
            error: None,
            filters: TaskFilter::default(),
        }
    }

    pub fn api_mut(&mut self) -> &mut ApiClient {
        &mut self.api
    }

    pub async fn fetch_tasks(&mut self) {
        self.is_loading = true;
        self.error = None;

        match self.api.list_tasks(&self.filters).await {
            Ok(page) => {
                self.tasks = page.tasks;
                self.total = page.total;
            }
            Err(e) => self.error = Some(e.to_string()),
        }

        self.is_loading = false;
    }

    pub async fn create_task(&mut self, input: &CreateTask) -> Option<TaskResponse> {
        self.is_loading = true;
        self.error = None;

        let result = match self.api.create_task(input).await {
            Ok(task) => {
                self.tasks.insert(0, task.clone());
                self.total += 1;
                Some(task)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        };

        self.is_loading = false;
        result
    }

    pub async fn update_task(&mut self, id: Uuid, patch: &UpdateTask) -> Option<TaskResponse> {
        self.is_loading = true;
        self.error = None;

        let result = match self.api.update_task(id, patch).await {
            Ok(task) => {
                self.replace_local(id, task.clone());
                Some(task)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        };

        self.is_loading = false;
        result
    }

    pub async fn delete_task(&mut self, id: Uuid) -> bool {
        self.is_loading = true;
        self.error = None;

        let deleted = match self.api.delete_task(id).await {
            Ok(_) => {
                self.tasks.retain(|t| t.id != id);
                self.total -= 1;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        };

        self.is_loading = false;
        deleted
    }

    /// Optimistic: the completed flag flips locally before the request
    /// resolves. On success the local task is reconciled with the server's
    /// object; on failure the flag flips back and the error is recorded.
    pub async fn toggle_completion(&mut self, id: Uuid) -> Option<TaskResponse> {
        self.is_loading = true;
        self.error = None;
        self.flip_local(id);

        let result = match self.api.toggle_task(id).await {
            Ok(task) => {
                self.replace_local(id, task.clone());
                Some(task)
            }
            Err(e) => {
                self.flip_local(id);
                self.error = Some(e.to_string());
                None
            }
        };

        self.is_loading = false;
        result
    }

    /// Merge the patch over the active filters and refetch.
    pub async fn set_filters(&mut self, patch: FilterPatch) {
        if let Some(status) = patch.status {
            self.filters.status = status;
        }
        if let Some(search) = patch.search {
            self.filters.search = search;
        }
        if let Some(sort_by) = patch.sort_by {
            self.filters.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            self.filters.sort_order = sort_order;
        }
        if let Some(tag_ids) = patch.tag_ids {
            self.filters.tag_ids = tag_ids;
        }

        self.fetch_tasks().await;
    }

    pub async fn reset_filters(&mut self) {
        self.filters = TaskFilter::default();
        self.fetch_tasks().await;
    }

    fn flip_local(&mut self, id: Uuid) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.completed = !task.completed;
        }
    }

    fn replace_local(&mut self, id: Uuid, task: TaskResponse) {
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
            *slot = task;
        }
    }
}
