//! Client for the remote users/posts service.
//!
//! Calls are plain GETs with no timeout and no retry; a non-2xx status or a body
//! of the wrong shape surfaces as a `reqwest::Error`.

use metrics::counter;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use service_core::error::AppError;
use service_core::observability::TracedClientExt;

pub struct UpstreamClient {
    client: Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!(
                "Invalid upstream base URL '{}': {}",
                base_url,
                e
            ))
        })?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Upstream base URL '{}' cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /users`
    pub async fn list_users(&self, request_id: Option<&str>) -> Result<Vec<Value>, reqwest::Error> {
        self.get_json("users", &["users"], request_id).await
    }

    /// `GET /users/{id}`; the id is sent as a single escaped path segment.
    pub async fn get_user(&self, id: &str, request_id: Option<&str>) -> Result<Value, reqwest::Error> {
        self.get_json("user", &["users", id], request_id).await
    }

    /// `GET /posts`
    pub async fn list_posts(&self, request_id: Option<&str>) -> Result<Vec<Value>, reqwest::Error> {
        self.get_json("posts", &["posts"], request_id).await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can always carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        segments: &[&str],
        request_id: Option<&str>,
    ) -> Result<T, reqwest::Error> {
        let url = self.endpoint(segments);
        tracing::debug!(resource, url = %url, "Calling upstream service");

        let result = async {
            self.client
                .traced_get(url.clone())
                .send(request_id)
                .await?
                .error_for_status()?
                .json::<T>()
                .await
        }
        .await;

        let labels = request_labels(resource, result.is_ok());
        counter!("upstream_requests_total", &labels).increment(1);

        if let Err(e) = &result {
            tracing::warn!(resource, url = %url, error = %e, "Upstream request failed");
        }

        result
    }
}

/// Labels of `upstream_requests_total`: the upstream endpoint called
/// (`users`, `user`, `posts`) and whether the call succeeded.
fn request_labels(resource: &'static str, ok: bool) -> [(&'static str, &'static str); 2] {
    let outcome = if ok { "success" } else { "error" };
    [("resource", resource), ("outcome", outcome)]
}
