use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// Which filter hierarchy the browse UI walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Regular,
    Weighted,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptionsRequest {
    pub mode: FilterMode,
}

/// Regular mode answers with states, weighted mode with datasets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub datasets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterOptionsResponse {
    pub success: bool,
    #[serde(default)]
    pub options: FilterOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountiesResponse {
    pub counties: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetListResponse {
    pub datasets: Vec<String>,
}

/// Selection sent to the fetch-data endpoints. Weighted fetches leave
/// `category`/`dataset` empty and name the weighted dataset instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchDataRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighted_dataset: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchDataResponse {
    #[serde(default)]
    pub data: Vec<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Load a preset (server-known key) or a custom URL, capped at `limit`
/// features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSourceRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSourceResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Json,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_info: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Full-store push; the payload is the serialized project snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProjectsRequest {
    pub projects: Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConfigRequest {
    pub config: Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveConfigResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<String>,
    #[serde(default)]
    pub field_meta_count: u64,
    #[serde(default)]
    pub field_attributes_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactListResponse {
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveArtifactRequest {
    pub name: String,
    pub body: Json,
}
