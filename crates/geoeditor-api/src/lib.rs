#![deny(unsafe_code)]

pub mod transport;
pub mod types;

pub use transport::{ApiError, Client, Result, Transport};
pub use types::{
    AckResponse, ArtifactListResponse, CategoriesResponse, CountiesResponse, DatasetListResponse,
    FetchDataRequest, FetchDataResponse, FilterMode, FilterOptions, FilterOptionsRequest,
    FilterOptionsResponse, LoadSourceRequest, LoadSourceResponse, SaveArtifactRequest,
    SaveConfigRequest, SaveConfigResponse, SaveProjectsRequest,
};
