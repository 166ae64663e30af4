use crate::{
    AuthResponse, Dataset, DatasetDetail, DatasetMetadata, LoginRequest, RegisterRequest,
    SalesSummary, TopProduct, User,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request itself is sent as the JSON body.
    const SENDS_BODY: bool = false;
    /// The URL path relative to the API base, including any query string.
    fn path(&self) -> String;
}

// =========================================================
// Auth
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const SENDS_BODY: bool = true;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const SENDS_BODY: bool = true;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }
}

/// Fetch the profile of the bearer of the current token
#[derive(Debug, Serialize)]
pub struct ProfileRequest;

impl ApiRequest for ProfileRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/auth/profile".to_string()
    }
}

// =========================================================
// Datasets
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListDatasetsRequest;

impl ApiRequest for ListDatasetsRequest {
    type Response = Vec<Dataset>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/datasets".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct GetDatasetRequest {
    pub id: String,
}

impl ApiRequest for GetDatasetRequest {
    type Response = DatasetDetail;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/datasets/{}", urlencoding::encode(&self.id))
    }
}

/// Multipart upload; the file itself travels outside the JSON body
#[derive(Debug, Serialize)]
pub struct UploadDatasetRequest;

impl ApiRequest for UploadDatasetRequest {
    type Response = DatasetMetadata;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/datasets/upload".to_string()
    }
}

// =========================================================
// KPIs
// =========================================================

#[derive(Debug, Serialize)]
pub struct SalesSummaryRequest {
    pub dataset_id: String,
}

impl ApiRequest for SalesSummaryRequest {
    type Response = SalesSummary;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!(
            "/kpis/sales_summary?dataset_id={}",
            urlencoding::encode(&self.dataset_id)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct TopProductsRequest {
    pub dataset_id: String,
}

impl ApiRequest for TopProductsRequest {
    type Response = Vec<TopProduct>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!(
            "/kpis/top_products?dataset_id={}",
            urlencoding::encode(&self.dataset_id)
        )
    }
}
