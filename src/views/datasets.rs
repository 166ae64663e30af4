use super::failure_toast;
use crate::api::ApiClient;
use crate::error::DashResult;
use crate::format::{format_count, format_size_mb, pluralize};
use crate::lifetime::Ticket;
use crate::notify::Toast;
use crate::request::HttpClient;
use crate::storage::TokenStorage;
use bidash_shared::date::format_upload_date;
use bidash_shared::{Dataset, DatasetDetail};

pub const LIST_CHANNEL: &str = "datasets.list";
pub const DETAIL_CHANNEL: &str = "datasets.detail";

/// 列表区域显示什么
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDisplay {
    Loading,
    Empty,
    Table,
}

/// 表格中的一行，字段都已格式化
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub id: String,
    pub name: String,
    pub rows: String,
    pub columns: String,
    pub size: String,
    pub uploaded: String,
}

impl From<&Dataset> for DatasetRow {
    fn from(d: &Dataset) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            rows: format_count(d.rows),
            columns: format!("{} cols", d.columns.len()),
            size: format_size_mb(d.size_mb),
            uploaded: format_upload_date(&d.upload_date),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetsState {
    datasets: Vec<Dataset>,
    loading: bool,
    detail: Option<DatasetDetail>,
    detail_loading: Option<String>,
}

impl DatasetsState {
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn apply_list(&mut self, result: DashResult<Vec<Dataset>>) -> Option<Toast> {
        self.loading = false;
        match result {
            Ok(datasets) => {
                self.datasets = datasets;
                None
            }
            Err(e) => failure_toast(&e, "Error", "Failed to load datasets"),
        }
    }

    pub fn display(&self) -> ListDisplay {
        if self.loading && self.datasets.is_empty() {
            ListDisplay::Loading
        } else if self.datasets.is_empty() {
            ListDisplay::Empty
        } else {
            ListDisplay::Table
        }
    }

    pub fn rows(&self) -> Vec<DatasetRow> {
        self.datasets.iter().map(DatasetRow::from).collect()
    }

    pub fn count_label(&self) -> String {
        format!(
            "{} available",
            pluralize(self.datasets.len(), "dataset", "datasets")
        )
    }

    pub fn begin_detail(&mut self, id: &str) {
        self.detail_loading = Some(id.to_string());
    }

    /// 只在票据有效时调用；失败时保留上一次的详情
    pub fn apply_detail(&mut self, result: DashResult<DatasetDetail>) -> Option<Toast> {
        self.detail_loading = None;
        match result {
            Ok(detail) => {
                self.detail = Some(detail);
                None
            }
            Err(e) => failure_toast(&e, "Error", "Failed to load dataset details"),
        }
    }

    pub fn is_detail_loading(&self) -> bool {
        self.detail_loading.is_some()
    }

    pub fn detail(&self) -> Option<&DatasetDetail> {
        self.detail.as_ref()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.detail.as_ref().map(|d| d.id.as_str())
    }
}

pub async fn load_datasets<C: HttpClient, S: TokenStorage>(
    api: &ApiClient<C, S>,
    ticket: Ticket,
) -> Option<DashResult<Vec<Dataset>>> {
    let result = api.list_datasets().await;
    ticket.accept(result)
}

pub async fn load_detail<C: HttpClient, S: TokenStorage>(
    api: &ApiClient<C, S>,
    ticket: Ticket,
    id: &str,
) -> Option<DashResult<DatasetDetail>> {
    let result = api.dataset(id).await;
    ticket.accept(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use crate::lifetime::ViewLifetime;
    use crate::storage::MemoryTokenStorage;
    use serde_json::json;

    fn dataset_json(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "rows": 1500,
            "columns": ["date", "product", "sales"],
            "upload_date": "2024-03-05T10:00:00Z",
            "size_mb": 1.26
        })
    }

    fn detail_json(id: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("{}.csv", id),
            "rows": 10,
            "columns": ["a"],
            "upload_date": "2024-03-05",
            "summary": { "mean": 1.5 }
        })
    }

    #[tokio::test]
    async fn test_empty_list_is_empty_state_not_table() {
        let (api, http) = client_with(MemoryTokenStorage::with_token("t"));
        http.mock_response(&url("/datasets"), 200, json!([]));
        let lifetime = ViewLifetime::new();

        let mut state = DatasetsState::default();
        state.begin_load();
        assert_eq!(state.display(), ListDisplay::Loading);

        let result = load_datasets(&api, lifetime.ticket(LIST_CHANNEL)).await.unwrap();
        assert!(state.apply_list(result).is_none());
        assert_eq!(state.display(), ListDisplay::Empty);
        assert_eq!(state.count_label(), "0 datasets available");
    }

    #[tokio::test]
    async fn test_table_rows_are_formatted() {
        let (api, http) = client_with(MemoryTokenStorage::with_token("t"));
        http.mock_response(&url("/datasets"), 200, json!([dataset_json("d1", "sales.csv")]));
        let lifetime = ViewLifetime::new();

        let mut state = DatasetsState::default();
        let result = load_datasets(&api, lifetime.ticket(LIST_CHANNEL)).await.unwrap();
        state.apply_list(result);

        assert_eq!(state.display(), ListDisplay::Table);
        assert_eq!(state.count_label(), "1 dataset available");
        assert_eq!(
            state.rows(),
            vec![DatasetRow {
                id: "d1".into(),
                name: "sales.csv".into(),
                rows: "1,500".into(),
                columns: "3 cols".into(),
                size: "1.3 MB".into(),
                uploaded: "3/5/2024".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_list_failure_keeps_state_and_toasts() {
        let (api, http) = client_with(MemoryTokenStorage::with_token("t"));
        http.mock_response(&url("/datasets"), 500, json!({}));
        let lifetime = ViewLifetime::new();

        let mut state = DatasetsState::default();
        let before = state.clone();
        state.begin_load();
        let result = load_datasets(&api, lifetime.ticket(LIST_CHANNEL)).await.unwrap();
        let toast = state.apply_list(result).unwrap();

        assert_eq!(toast.message, "Failed to load datasets");
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_superseded_detail_is_dropped() {
        let (api, http) = client_with(MemoryTokenStorage::with_token("t"));
        http.mock_response(&url("/datasets/a"), 200, detail_json("a"));
        http.mock_response(&url("/datasets/b"), 200, detail_json("b"));
        let lifetime = ViewLifetime::new();

        let first = lifetime.ticket(DETAIL_CHANNEL);
        let second = lifetime.ticket(DETAIL_CHANNEL);

        let mut state = DatasetsState::default();
        state.begin_detail("b");
        assert!(state.is_detail_loading());

        assert!(load_detail(&api, first, "a").await.is_none());
        let result = load_detail(&api, second, "b").await.unwrap();
        state.apply_detail(result);

        assert_eq!(state.selected_id(), Some("b"));
        assert!(!state.is_detail_loading());
        assert_eq!(
            state.detail().unwrap().summary_lines(),
            vec![("mean".to_string(), "1.5".to_string())]
        );
    }

    #[tokio::test]
    async fn test_unmounted_view_ignores_response() {
        let (api, http) = client_with(MemoryTokenStorage::with_token("t"));
        http.mock_response(&url("/datasets"), 200, json!([dataset_json("d1", "x")]));
        let lifetime = ViewLifetime::new();

        let ticket = lifetime.ticket(LIST_CHANNEL);
        lifetime.end();
        assert!(load_datasets(&api, ticket).await.is_none());
        assert_eq!(http.request_count(), 1);
    }

    #[tokio::test]
    async fn test_detail_failure_keeps_previous_detail() {
        let (api, http) = client_with(MemoryTokenStorage::with_token("t"));
        http.mock_response(&url("/datasets/a"), 200, detail_json("a"));
        let lifetime = ViewLifetime::new();
        let mut state = DatasetsState::default();

        let result = load_detail(&api, lifetime.ticket(DETAIL_CHANNEL), "a").await.unwrap();
        state.apply_detail(result);

        state.begin_detail("missing");
        let result = load_detail(&api, lifetime.ticket(DETAIL_CHANNEL), "missing")
            .await
            .unwrap();
        let toast = state.apply_detail(result).unwrap();

        assert_eq!(toast.message, "Failed to load dataset details");
        assert_eq!(state.selected_id(), Some("a"));
    }
}
