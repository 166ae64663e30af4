use super::failure_toast;
use crate::api::ApiClient;
use crate::error::{DashError, DashResult};
use crate::format::{format_count, format_file_size};
use crate::lifetime::Ticket;
use crate::notify::Toast;
use crate::request::HttpClient;
use crate::storage::TokenStorage;
use bidash_shared::DatasetMetadata;

pub const UPLOAD_CHANNEL: &str = "upload.submit";

/// 允许上传的 MIME 类型：CSV 与 Excel
pub const ALLOWED_MIME_TYPES: [&str; 3] = [
    "text/csv",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

/// 客户端文件类型检查，只用于快速拒绝，最终以后端为准
pub fn validate_file_type(mime: &str) -> DashResult<()> {
    if ALLOWED_MIME_TYPES.contains(&mime) {
        Ok(())
    } else {
        Err(DashError::validation("Please select a CSV or Excel file")
            .in_op_with("upload.validate", mime))
    }
}

/// 已选中的本地文件
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub mime: String,
    pub size_bytes: u64,
}

impl SelectedFile {
    pub fn size_label(&self) -> String {
        format!("({})", format_file_size(self.size_bytes))
    }
}

/// 上传成功面板的内容
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSummary {
    pub name: String,
    pub rows: String,
    pub columns: String,
}

impl From<&DatasetMetadata> for UploadSummary {
    fn from(meta: &DatasetMetadata) -> Self {
        Self {
            name: meta.name.clone(),
            rows: format_count(meta.rows),
            columns: format_count(meta.columns.len() as u64),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadState {
    selected: Option<SelectedFile>,
    uploading: bool,
    uploaded: Option<DatasetMetadata>,
}

impl UploadState {
    /// 选择文件；类型不符时返回通知，保留原有选择
    pub fn select(&mut self, file: SelectedFile) -> Option<Toast> {
        match validate_file_type(&file.mime) {
            Ok(()) => {
                self.selected = Some(file);
                self.uploaded = None;
                None
            }
            Err(e) => Some(Toast::error("Invalid file type", e.user_message(""))),
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.uploading
    }

    /// 开始提交；没有可提交的文件时返回 false
    pub fn begin_upload(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        self.uploading = true;
        true
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn apply_result(&mut self, result: DashResult<DatasetMetadata>) -> Option<Toast> {
        self.uploading = false;
        match result {
            Ok(meta) => {
                self.uploaded = Some(meta);
                self.selected = None;
                Some(Toast::success("Success", "File uploaded successfully"))
            }
            Err(e) => failure_toast(&e, "Upload failed", "Failed to upload file"),
        }
    }

    pub fn uploaded(&self) -> Option<UploadSummary> {
        self.uploaded.as_ref().map(UploadSummary::from)
    }
}

pub async fn submit_upload<C: HttpClient, S: TokenStorage>(
    api: &ApiClient<C, S>,
    ticket: Ticket,
    file: &SelectedFile,
    bytes: Vec<u8>,
) -> Option<DashResult<DatasetMetadata>> {
    // 提交前再检查一次，防止绕过选择流程
    if let Err(e) = validate_file_type(&file.mime) {
        return ticket.accept(Err(e));
    }
    let result = api.upload_dataset(&file.name, &file.mime, bytes).await;
    ticket.accept(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::*;
    use crate::lifetime::ViewLifetime;
    use crate::notify::ToastKind;
    use crate::storage::MemoryTokenStorage;
    use serde_json::json;

    fn file(mime: &str) -> SelectedFile {
        SelectedFile {
            name: "sales.csv".into(),
            mime: mime.into(),
            size_bytes: 2_621_440,
        }
    }

    #[test]
    fn test_json_rejected_csv_accepted() {
        let mut state = UploadState::default();

        let toast = state.select(file("application/json")).unwrap();
        assert_eq!(toast.title, "Invalid file type");
        assert_eq!(toast.message, "Please select a CSV or Excel file");
        assert!(!state.can_submit());

        assert!(state.select(file("text/csv")).is_none());
        assert!(state.can_submit());
        assert_eq!(state.selected().unwrap().size_label(), "(2.50 MB)");

        assert!(state.select(file("application/vnd.ms-excel")).is_none());
    }

    #[tokio::test]
    async fn test_invalid_type_never_hits_network() {
        let (api, http) = client_with(MemoryTokenStorage::with_token("t"));
        let lifetime = ViewLifetime::new();

        let result = submit_upload(
            &api,
            lifetime.ticket(UPLOAD_CHANNEL),
            &file("application/json"),
            vec![1],
        )
        .await
        .unwrap();

        assert!(result.is_err());
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_upload_flow() {
        let (api, http) = client_with(MemoryTokenStorage::with_token("t"));
        http.mock_response(
            &url("/datasets/upload"),
            200,
            json!({
                "id": "d1",
                "name": "sales.csv",
                "rows": 1200,
                "columns": ["a", "b", "c"],
                "upload_date": "2024-01-01"
            }),
        );
        let lifetime = ViewLifetime::new();
        let mut state = UploadState::default();
        state.select(file("text/csv"));

        assert!(state.begin_upload());
        assert!(!state.can_submit());
        let selected = state.selected().cloned().unwrap();
        let result = submit_upload(&api, lifetime.ticket(UPLOAD_CHANNEL), &selected, vec![0; 8])
            .await
            .unwrap();
        let toast = state.apply_result(result).unwrap();

        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, "File uploaded successfully");
        assert!(state.selected().is_none());
        assert_eq!(
            state.uploaded(),
            Some(UploadSummary {
                name: "sales.csv".into(),
                rows: "1,200".into(),
                columns: "3".into(),
            })
        );

        // 同一个文件可以再次选择并提交
        assert!(!state.can_submit());
        assert!(state.select(file("text/csv")).is_none());
        assert!(state.can_submit());
        assert!(state.uploaded().is_none());
    }

    #[tokio::test]
    async fn test_failed_upload_keeps_selection() {
        let (api, http) = client_with(MemoryTokenStorage::with_token("t"));
        http.mock_response(
            &url("/datasets/upload"),
            400,
            json!({ "detail": "Could not parse file" }),
        );
        let lifetime = ViewLifetime::new();
        let mut state = UploadState::default();
        state.select(file("text/csv"));
        state.begin_upload();

        let selected = state.selected().cloned().unwrap();
        let result = submit_upload(&api, lifetime.ticket(UPLOAD_CHANNEL), &selected, vec![])
            .await
            .unwrap();
        let toast = state.apply_result(result).unwrap();

        assert_eq!(toast.title, "Upload failed");
        assert_eq!(toast.message, "Could not parse file");
        assert!(state.can_submit());
        assert!(state.uploaded().is_none());
    }
}
