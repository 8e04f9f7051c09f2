use std::path::Path;

use reqwest::Method;

use super::{ApiResponse, ClientError, KruizeClient, QueryString};
use crate::payload::{load_json, metric_profile_name};

impl KruizeClient {
    /// Create a metric profile from the JSON document at `path`.
    pub async fn create_metric_profile(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ClientError> {
        let profile = load_json(path).await?;
        let url = self.url("/createMetricProfile", &QueryString::new());
        self.send("createMetricProfile", Method::POST, url, Some(&profile), false, true)
            .await
    }

    /// Delete the metric profile named by `metadata.name` in the file at `path`.
    pub async fn delete_metric_profile(
        &self,
        path: impl AsRef<Path>,
        invalid_header: bool,
    ) -> Result<ApiResponse, ClientError> {
        let profile = load_json(path).await?;
        let mut query = QueryString::new();
        query.push("name", metric_profile_name(&profile)?);

        let url = self.url("/deleteMetricProfile", &query);
        self.send("deleteMetricProfile", Method::DELETE, url, None, invalid_header, true)
            .await
    }

    pub async fn list_metric_profiles(
        &self,
        name: Option<&str>,
        verbose: Option<&str>,
        log_body: bool,
    ) -> Result<ApiResponse, ClientError> {
        let mut query = QueryString::new();
        query.push_opt("name", name).push_opt("verbose", verbose);

        let url = self.url("/listMetricProfiles", &query);
        self.send("listMetricProfiles", Method::GET, url, None, false, log_body)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::test_support::{json_file, MockServer};
    use crate::client::INVALID_CONTENT_TYPE;
    use serde_json::json;

    fn profile() -> serde_json::Value {
        json!({
            "apiVersion": "recommender.com/v1",
            "kind": "KruizePerformanceProfile",
            "metadata": {"name": "resource-optimization-local-monitoring"},
            "profile_version": 1.0,
            "k8s_type": "openshift",
            "slo": {"direction": "minimize", "function_variables": []}
        })
    }

    #[tokio::test]
    async fn create_metric_profile_echo_round_trips_payload() {
        let server = MockServer::start().await;
        let file = json_file(&profile());

        let response = server.client().create_metric_profile(file.path()).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.json().unwrap(), profile());
        let request = server.only_request();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/createMetricProfile");
        assert_eq!(request.content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn delete_metric_profile_sends_name_query_without_body() {
        let server = MockServer::start().await;
        let file = json_file(&profile());

        server.client().delete_metric_profile(file.path(), false).await.unwrap();

        let request = server.only_request();
        assert_eq!(request.method, "DELETE");
        assert_eq!(request.path, "/deleteMetricProfile");
        assert_eq!(
            request.query.as_deref(),
            Some("name=resource-optimization-local-monitoring")
        );
        assert!(request.body.is_empty());
        assert_eq!(request.content_type, None);
    }

    #[tokio::test]
    async fn delete_metric_profile_with_invalid_header() {
        let server = MockServer::start().await;
        let file = json_file(&profile());

        let response = server
            .client()
            .delete_metric_profile(file.path(), true)
            .await
            .unwrap();

        assert_eq!(response.status.as_u16(), 415);
        assert_eq!(
            server.only_request().content_type.as_deref(),
            Some(INVALID_CONTENT_TYPE)
        );
    }

    #[tokio::test]
    async fn delete_metric_profile_without_name_fails_before_sending() {
        let server = MockServer::start().await;
        let file = json_file(&json!({"metadata": {}}));

        let result = server.client().delete_metric_profile(file.path(), false).await;

        assert!(result.is_err());
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn list_metric_profiles_query_combinations() {
        let server = MockServer::start().await;
        let client = server.client();

        client.list_metric_profiles(None, None, true).await.unwrap();
        client.list_metric_profiles(Some("p1"), None, false).await.unwrap();
        client.list_metric_profiles(Some("p1"), Some("true"), true).await.unwrap();
        client.list_metric_profiles(None, Some("false"), true).await.unwrap();

        let queries: Vec<_> = server.requests().into_iter().map(|r| r.query).collect();
        assert_eq!(
            queries,
            vec![
                None,
                Some("name=p1".to_string()),
                Some("name=p1&verbose=true".to_string()),
                Some("verbose=false".to_string()),
            ]
        );
    }
}
