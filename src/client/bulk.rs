use std::path::Path;

use reqwest::Method;

use super::{ApiResponse, ClientError, KruizeClient, QueryString};
use crate::payload::load_json;

impl KruizeClient {
    /// Submit a bulk job described by the JSON document at `path`.
    ///
    /// The response body carries the `job_id` to poll with
    /// [`get_bulk_job_status`](Self::get_bulk_job_status).
    pub async fn bulk(&self, path: impl AsRef<Path>) -> Result<ApiResponse, ClientError> {
        let request = load_json(path).await?;
        let url = self.url("/bulk", &QueryString::new());
        self.send("bulk", Method::POST, url, Some(&request), false, true)
            .await
    }

    /// Fetch the status of a bulk job. Empty values are left out of the query.
    pub async fn get_bulk_job_status(
        &self,
        job_id: &str,
        include: Option<&str>,
        experiment_name: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        let mut query = QueryString::new();
        query
            .push_non_empty("job_id", Some(job_id))
            .push_non_empty("experiment_name", experiment_name)
            .push_non_empty("include", include);

        let url = self.url("/bulk", &query);
        self.send("bulk", Method::GET, url, None, false, true).await
    }
}
