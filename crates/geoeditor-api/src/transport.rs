use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as Json;
use thiserror::Error;

use crate::types::{
    AckResponse, ArtifactListResponse, CategoriesResponse, CountiesResponse, DatasetListResponse,
    FetchDataRequest, FetchDataResponse, FilterOptionsRequest, FilterOptionsResponse,
    LoadSourceRequest, LoadSourceResponse, SaveArtifactRequest, SaveConfigRequest,
    SaveConfigResponse, SaveProjectsRequest,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server answered {status} for {endpoint}")]
    Status { endpoint: String, status: u16 },
    #[error("malformed response body: {0}")]
    Body(#[from] serde_json::Error),
    #[error("server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// The wire seam. Real hosts back this with their HTTP machinery; tests and
/// the CLI use in-process fakes. Bodies are JSON in both directions.
pub trait Transport {
    fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Json>;
    fn post(&self, endpoint: &str, body: Json) -> Result<Json>;
}

/// Typed wrapper over a transport, one method per server collaborator.
pub struct Client<T: Transport> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    fn post_as<B: Serialize, R: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<R> {
        let raw = self.transport.post(endpoint, serde_json::to_value(body)?)?;
        Ok(serde_json::from_value(raw)?)
    }

    fn get_as<R: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<R> {
        let raw = self.transport.get(endpoint, query)?;
        Ok(serde_json::from_value(raw)?)
    }

    pub fn list_filter_options(
        &self,
        request: &FilterOptionsRequest,
    ) -> Result<FilterOptionsResponse> {
        self.post_as("filter-options", request)
    }

    pub fn list_counties(&self, state: &str) -> Result<CountiesResponse> {
        self.get_as("counties", &[("state", state)])
    }

    pub fn list_categories(&self, state: &str, county: &str) -> Result<CategoriesResponse> {
        self.get_as("categories", &[("state", state), ("county", county)])
    }

    pub fn list_datasets(
        &self,
        state: &str,
        county: &str,
        category: &str,
    ) -> Result<DatasetListResponse> {
        self.get_as(
            "datasets",
            &[("state", state), ("county", county), ("category", category)],
        )
    }

    pub fn fetch_data(&self, request: &FetchDataRequest) -> Result<FetchDataResponse> {
        self.post_as("fetch-data", request)
    }

    pub fn fetch_weighted_data(&self, request: &FetchDataRequest) -> Result<FetchDataResponse> {
        self.post_as("fetch-weighted-data", request)
    }

    pub fn load_source(&self, request: &LoadSourceRequest) -> Result<LoadSourceResponse> {
        self.post_as("load-source", request)
    }

    pub fn save_projects(&self, request: &SaveProjectsRequest) -> Result<AckResponse> {
        self.post_as("save-projects", request)
    }

    pub fn save_configuration(&self, request: &SaveConfigRequest) -> Result<SaveConfigResponse> {
        self.post_as("save-configuration", request)
    }

    pub fn list_artifacts(&self) -> Result<ArtifactListResponse> {
        self.get_as("artifacts", &[])
    }

    pub fn load_artifact(&self, name: &str) -> Result<Json> {
        self.transport.get("artifact", &[("name", name)])
    }

    pub fn save_artifact(&self, request: &SaveArtifactRequest) -> Result<AckResponse> {
        self.post_as("artifact", request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedTransport {
        body: Json,
    }

    impl Transport for CannedTransport {
        fn get(&self, _endpoint: &str, _query: &[(&str, &str)]) -> Result<Json> {
            Ok(self.body.clone())
        }

        fn post(&self, _endpoint: &str, _body: Json) -> Result<Json> {
            Ok(self.body.clone())
        }
    }

    #[test]
    fn client_decodes_typed_envelopes() {
        let client = Client::new(CannedTransport {
            body: serde_json::json!({"counties": ["Linn", "Polk"]}),
        });
        let counties = client.list_counties("Iowa").unwrap();
        assert_eq!(counties.counties, vec!["Linn", "Polk"]);
    }

    #[test]
    fn malformed_body_is_a_body_error() {
        let client = Client::new(CannedTransport {
            body: serde_json::json!({"counties": "not-a-list"}),
        });
        assert!(matches!(
            client.list_counties("Iowa"),
            Err(ApiError::Body(_))
        ));
    }
}
