use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Thin wrapper over `reqwest` shared by every view: base URL, bearer token,
/// timeout and uniform status handling.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("taskpilot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Starts a request with auth and correlation headers applied.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, self.url(path))
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, path).query(query);
        let text = self.execute(builder).await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method, path).json(body);
        let text = self.execute(builder).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// POST without a body, for endpoints that only act on the session.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::POST, path)).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path).multipart(form);
        let text = self.execute(builder).await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        log::debug!("event=api_request method={method} path={path} request_id={request_id}");

        let response = self.http.execute(request).await.map_err(|err| {
            log::warn!(
                "event=api_transport_error method={method} path={path} \
                 request_id={request_id} error={err}"
            );
            ApiError::Transport(err)
        })?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            log::warn!(
                "event=api_status_error method={method} path={path} \
                 request_id={request_id} status={}",
                status.as_u16()
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                detail: error_detail(&text),
            });
        }
        log::debug!(
            "event=api_response method={method} path={path} request_id={request_id} status={}",
            status.as_u16()
        );
        Ok(text)
    }
}

/// Pulls the human-readable message out of an error body. FastAPI-style
/// backends send `{"detail": "..."}`; anything else is passed through.
pub fn error_detail(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "no response body".to_string();
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            Some(other) => other.to_string(),
            None => trimmed.to_string(),
        },
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    fn client(token: Option<&str>) -> ApiClient {
        ApiClient::new(
            "http://localhost:8000/api/v1/",
            token.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let client = client(None);
        assert_eq!(client.base_url(), "http://localhost:8000/api/v1");
        assert_eq!(client.url("/tasks"), "http://localhost:8000/api/v1/tasks");
        assert_eq!(
            client.url("schedule/2026-03-02"),
            "http://localhost:8000/api/v1/schedule/2026-03-02"
        );
    }

    #[test]
    fn request_carries_bearer_and_request_id() {
        let request = client(Some("tok"))
            .request(Method::GET, "/tasks")
            .build()
            .unwrap();
        assert_eq!(request.headers().get(AUTHORIZATION).unwrap(), "Bearer tok");
        let request_id = request.headers().get(REQUEST_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(request_id.to_str().unwrap()).is_ok());
    }

    #[test]
    fn anonymous_request_has_no_authorization() {
        let request = client(None).request(Method::DELETE, "/tasks/1").build().unwrap();
        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(request.method(), Method::DELETE);
    }

    #[test]
    fn error_detail_prefers_detail_field() {
        assert_eq!(error_detail(r#"{"detail":"Task not found"}"#), "Task not found");
        assert_eq!(
            error_detail(r#"{"detail":[{"msg":"field required"}]}"#),
            r#"[{"msg":"field required"}]"#
        );
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_detail("  "), "no response body");
    }
}
