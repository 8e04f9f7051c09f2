use std::path::Path;

use reqwest::Method;
use serde_json::json;

use super::logging::log_payload;
use super::{ApiResponse, ClientError, KruizeClient, QueryString};
use crate::payload::{experiment_name, load_json};

/// Filters for `GET /listExperiments`, sent in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperimentQuery {
    pub experiment_name: Option<String>,
    pub latest: Option<String>,
    pub results: Option<String>,
    pub recommendations: Option<String>,
}

impl ExperimentQuery {
    pub fn to_query(&self) -> QueryString {
        let mut query = QueryString::new();
        query
            .push_opt("experiment_name", self.experiment_name.as_deref())
            .push_opt("latest", self.latest.as_deref())
            .push_opt("results", self.results.as_deref())
            .push_opt("recommendations", self.recommendations.as_deref());
        query
    }
}

impl KruizeClient {
    /// Create the experiments in the JSON array at `path`.
    pub async fn create_experiment(
        &self,
        path: impl AsRef<Path>,
        invalid_header: bool,
    ) -> Result<ApiResponse, ClientError> {
        let experiments = load_json(path).await?;
        log_payload("createExperiment", &experiments);

        let url = self.url("/createExperiment", &QueryString::new());
        self.send(
            "createExperiment",
            Method::POST,
            url,
            Some(&experiments),
            invalid_header,
            true,
        )
        .await
    }

    /// Delete the experiment named by the first entry of the array at `path`.
    ///
    /// Only the name is sent: `[{"experiment_name": ...}]`.
    pub async fn delete_experiment(
        &self,
        path: impl AsRef<Path>,
        invalid_header: bool,
    ) -> Result<ApiResponse, ClientError> {
        let experiments = load_json(path).await?;
        let delete = json!([{ "experiment_name": experiment_name(&experiments)? }]);

        let url = self.url("/createExperiment", &QueryString::new());
        self.send(
            "createExperiment",
            Method::DELETE,
            url,
            Some(&delete),
            invalid_header,
            true,
        )
        .await
    }

    pub async fn list_experiments(
        &self,
        filter: &ExperimentQuery,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url("/listExperiments", &filter.to_query());
        self.send("listExperiments", Method::GET, url, None, false, true)
            .await
    }
}
