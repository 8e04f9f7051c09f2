use std::path::Path;

use reqwest::Method;

use super::logging::log_payload;
use super::{ApiResponse, ClientError, KruizeClient, QueryString};
use crate::payload::load_json;

/// Filters for `GET /dsmetadata`.
///
/// `datasource` gates the rest: without it no filter is sent at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataQuery {
    pub datasource: Option<String>,
    pub cluster_name: Option<String>,
    pub namespace: Option<String>,
    pub verbose: Option<String>,
}

impl MetadataQuery {
    pub fn for_datasource(name: impl Into<String>) -> Self {
        Self {
            datasource: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn to_query(&self) -> QueryString {
        let mut query = QueryString::new();
        if let Some(datasource) = &self.datasource {
            query
                .push("datasource", datasource)
                .push_opt("cluster_name", self.cluster_name.as_deref())
                .push_opt("namespace", self.namespace.as_deref())
                .push_opt("verbose", self.verbose.as_deref());
        }
        query
    }
}

impl KruizeClient {
    pub async fn list_datasources(&self, name: Option<&str>) -> Result<ApiResponse, ClientError> {
        let mut query = QueryString::new();
        query.push_opt("name", name);

        let url = self.url("/datasources", &query);
        self.send("datasources", Method::GET, url, None, false, true)
            .await
    }

    /// Import datasource metadata described by the JSON document at `path`.
    pub async fn import_metadata(
        &self,
        path: impl AsRef<Path>,
        invalid_header: bool,
    ) -> Result<ApiResponse, ClientError> {
        let metadata = load_json(path).await?;
        log_payload("dsmetadata", &metadata);

        let url = self.url("/dsmetadata", &QueryString::new());
        self.send(
            "dsmetadata",
            Method::POST,
            url,
            Some(&metadata),
            invalid_header,
            true,
        )
        .await
    }

    /// Delete imported metadata; the file at `path` is sent unchanged.
    pub async fn delete_metadata(
        &self,
        path: impl AsRef<Path>,
        invalid_header: bool,
    ) -> Result<ApiResponse, ClientError> {
        let metadata = load_json(path).await?;

        let url = self.url("/dsmetadata", &QueryString::new());
        self.send(
            "dsmetadata",
            Method::DELETE,
            url,
            Some(&metadata),
            invalid_header,
            true,
        )
        .await
    }

    pub async fn list_metadata(
        &self,
        filter: &MetadataQuery,
        log_body: bool,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url("/dsmetadata", &filter.to_query());
        self.send("dsmetadata", Method::GET, url, None, false, log_body)
            .await
    }
}
