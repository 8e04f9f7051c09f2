use reqwest::Method;

use super::{ApiResponse, ClientError, KruizeClient, QueryString};

/// Filters for `GET /listRecommendations`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationQuery {
    pub experiment_name: Option<String>,
    /// Sent verbatim; the service expects `true` or `false`.
    pub latest: Option<String>,
    pub monitoring_end_time: Option<String>,
}

impl RecommendationQuery {
    pub fn for_experiment(name: impl Into<String>) -> Self {
        Self {
            experiment_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// `latest` and `monitoring_end_time` are alternatives; when both are
    /// set only `latest` is sent.
    pub fn to_query(&self) -> QueryString {
        let mut query = QueryString::new();
        query.push_opt("experiment_name", self.experiment_name.as_deref());
        if let Some(latest) = &self.latest {
            query.push("latest", latest);
        } else if let Some(end_time) = &self.monitoring_end_time {
            query.push("monitoring_end_time", end_time);
        }
        query
    }
}

impl KruizeClient {
    pub async fn list_recommendations(
        &self,
        filter: &RecommendationQuery,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url("/listRecommendations", &filter.to_query());
        self.send("listRecommendations", Method::GET, url, None, false, true)
            .await
    }

    /// Ask the service to generate recommendations for `experiment_name`
    /// over the given interval. Empty values are left out of the query.
    pub async fn update_recommendations(
        &self,
        experiment_name: &str,
        interval_start_time: Option<&str>,
        interval_end_time: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        tracing::info!(
            "Updating the recommendation for {} for dates Start-time: {:?} and End-time: {:?}",
            experiment_name,
            interval_start_time,
            interval_end_time
        );

        let mut query = QueryString::new();
        query
            .push_non_empty("experiment_name", Some(experiment_name))
            .push_non_empty("interval_end_time", interval_end_time)
            .push_non_empty("interval_start_time", interval_start_time);

        let url = self.url("/updateRecommendations", &query);
        self.send("updateRecommendations", Method::POST, url, None, false, true)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::MockServer;

    fn query(filter: RecommendationQuery) -> String {
        filter.to_query().to_string()
    }

    #[test]
    fn latest_wins_over_monitoring_end_time() {
        let end = Some("2023-04-02T08:00:00.000Z".to_string());

        assert_eq!(query(RecommendationQuery::default()), "");
        assert_eq!(
            query(RecommendationQuery {
                latest: Some("true".into()),
                monitoring_end_time: end.clone(),
                ..Default::default()
            }),
            "latest=true"
        );
        assert_eq!(
            query(RecommendationQuery {
                monitoring_end_time: end.clone(),
                ..Default::default()
            }),
            "monitoring_end_time=2023-04-02T08%3A00%3A00.000Z"
        );
        assert_eq!(
            query(RecommendationQuery {
                latest: Some("false".into()),
                monitoring_end_time: end,
                ..RecommendationQuery::for_experiment("exp")
            }),
            "experiment_name=exp&latest=false"
        );
    }

    #[tokio::test]
    async fn list_recommendations_without_filters_has_no_query() {
        let server = MockServer::start().await;
        let client = server.client();

        client
            .list_recommendations(&RecommendationQuery::default())
            .await
            .unwrap();
        client
            .list_recommendations(&RecommendationQuery::for_experiment("exp-1"))
            .await
            .unwrap();
        client
            .list_recommendations(&RecommendationQuery {
                latest: Some("true".into()),
                ..RecommendationQuery::for_experiment("exp-1")
            })
            .await
            .unwrap();

        let requests = server.requests();
        assert!(requests.iter().all(|r| r.method == "GET" && r.path == "/listRecommendations"));
        assert_eq!(requests[0].query, None);
        assert_eq!(requests[1].query.as_deref(), Some("experiment_name=exp-1"));
        assert_eq!(requests[2].query.as_deref(), Some("experiment_name=exp-1&latest=true"));
    }

    #[tokio::test]
    async fn invalid_latest_value_is_sent_verbatim() {
        let server = MockServer::start().await;

        server
            .client()
            .list_recommendations(&RecommendationQuery {
                latest: Some("abc".into()),
                ..RecommendationQuery::for_experiment("exp-1")
            })
            .await
            .unwrap();

        assert_eq!(
            server.only_request().query.as_deref(),
            Some("experiment_name=exp-1&latest=abc")
        );
    }

    #[tokio::test]
    async fn update_recommendations_posts_interval_without_body() {
        let server = MockServer::start().await;

        server
            .client()
            .update_recommendations(
                "exp-1",
                Some("2023-04-01T00:00:00.000Z"),
                Some("2023-04-02T00:00:00.000Z"),
            )
            .await
            .unwrap();

        let request = server.only_request();
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/updateRecommendations");
        assert_eq!(
            request.query.as_deref(),
            Some("experiment_name=exp-1&interval_end_time=2023-04-02T00%3A00%3A00.000Z&interval_start_time=2023-04-01T00%3A00%3A00.000Z")
        );
        assert!(request.body.is_empty());
    }

    #[tokio::test]
    async fn update_recommendations_without_start_time() {
        let server = MockServer::start().await;

        server
            .client()
            .update_recommendations("exp-1", None, Some("2023-04-02T00:00:00.000Z"))
            .await
            .unwrap();

        assert_eq!(
            server.only_request().query.as_deref(),
            Some("experiment_name=exp-1&interval_end_time=2023-04-02T00%3A00%3A00.000Z")
        );
    }
}
