//! Shared HTTP client for every service.
//!
//! [`ApiClient`] joins service paths onto the configured base URL, attaches
//! the session's bearer token, turns non-2xx responses into
//! [`ApiError::Status`] and normalizes response envelopes. A 401 on a JSON
//! call clears the session (forced logout); file downloads only fail.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::envelope::{extract_list, extract_one};
use crate::error::{extract_server_message, ApiError, ApiResult};
use crate::session::Session;

/// What a 401 response means for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnUnauthorized {
    /// The token is no longer valid: clear the session.
    ForceLogout,
    /// Report the failure without touching the session (file downloads,
    /// credential checks).
    Fail,
}

/// A file returned by a download endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    /// File name from `Content-Disposition`, when the server sent one.
    pub file_name: Option<String>,
}

/// HTTP client bound to one API base URL and one session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    /// Build a client with a fresh session seeded from `config.token` and
    /// `config.role`.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let session = match &config.token {
            Some(token) => Session::restore(token.clone(), config.role),
            None => Session::new(),
        };
        Self::with_session(config, Arc::new(session))
    }

    /// Build a client sharing an existing session.
    pub fn with_session(config: &ClientConfig, session: Arc<Session>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // ---- JSON verbs ----

    pub async fn get_one<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let value = self.send_json(self.request(Method::GET, path), path).await?;
        extract_one(value)
    }

    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let value = self.send_json(self.request(Method::GET, path), path).await?;
        extract_list(value)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = self.post_value(path, body).await?;
        extract_one(value)
    }

    /// `POST` returning the raw JSON body.
    pub async fn post_value<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let builder = self.request(Method::POST, path).json(body);
        self.send_json(builder, path).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::PUT, path).json(body);
        let value = self.send_json(builder, path).await?;
        extract_one(value)
    }

    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let response = self
            .send(self.request(Method::DELETE, path), path, OnUnauthorized::ForceLogout)
            .await?;
        drop(response);
        Ok(())
    }

    /// `POST` whose 401 means "credentials rejected", not "session expired".
    pub async fn post_credentials<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<Value> {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.send(builder, path, OnUnauthorized::Fail).await?;
        read_json(response).await
    }

    // ---- files ----

    /// Fetch a file. A 401 here does not end the session.
    pub async fn download(&self, path: &str) -> ApiResult<Download> {
        let response = self
            .send(self.request(Method::GET, path), path, OnUnauthorized::Fail)
            .await?;

        let header = |name: reqwest::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(reqwest::header::CONTENT_TYPE);
        let file_name = header(reqwest::header::CONTENT_DISPOSITION)
            .as_deref()
            .and_then(parse_file_name);

        let bytes = response.bytes().await?.to_vec();
        Ok(Download {
            bytes,
            content_type,
            file_name,
        })
    }

    // ---- private helpers ----

    /// Start a request with the bearer token attached when signed in.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_json(&self, builder: RequestBuilder, path: &str) -> ApiResult<Value> {
        let response = self.send(builder, path, OnUnauthorized::ForceLogout).await?;
        read_json(response).await
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        path: &str,
        on_unauthorized: OnUnauthorized,
    ) -> ApiResult<Response> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!(path, error = %e, "API request failed");
            ApiError::Request(e)
        })?;
        let status = response.status();
        tracing::debug!(path, status = status.as_u16(), "API response");

        if status == StatusCode::UNAUTHORIZED && on_unauthorized == OnUnauthorized::ForceLogout {
            self.session.expire();
            return Err(ApiError::SessionExpired);
        }
        ensure_success(response).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish()
    }
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or an [`ApiError::Status`] carrying the server's
/// message on failure.
async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    tracing::debug!(status = status.as_u16(), body = %body, "API error response");
    Err(ApiError::Status {
        status: status.as_u16(),
        message: extract_server_message(&body),
        body,
    })
}

/// Read a JSON body; an empty body reads as `null`.
async fn read_json(response: Response) -> ApiResult<Value> {
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Extract `filename` from a `Content-Disposition` header value.
///
/// Only the final path component is kept so a server cannot direct the
/// file outside the working directory.
fn parse_file_name(disposition: &str) -> Option<String> {
    disposition.split(';').map(str::trim).find_map(|part| {
        let value = part.strip_prefix("filename=")?;
        let value = value.trim_matches('"').trim();
        let base = value.rsplit(['/', '\\']).next()?.trim();
        (!matches!(base, "" | "." | "..")).then(|| base.to_string())
    })
}

#[cfg(test)]
mod tests {
    use sitebook_core::roles::Role;

    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let client = ApiClient::new(&ClientConfig::new("http://localhost:5000/api/")).unwrap();
        assert_eq!(client.url("/labour"), "http://localhost:5000/api/labour");
        assert_eq!(client.url("labour/1"), "http://localhost:5000/api/labour/1");
    }

    #[test]
    fn config_token_seeds_session() {
        let mut config = ClientConfig::new("http://localhost:5000/api");
        config.token = Some("tok".into());
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.session().token().as_deref(), Some("tok"));
        assert_eq!(client.session().role(), Role::Unknown);

        config.role = Some(Role::Accountant);
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.session().role(), Role::Accountant);
    }

    #[test]
    fn file_name_from_disposition() {
        assert_eq!(
            parse_file_name(r#"attachment; filename="attendance-2024-03.xlsx""#),
            Some("attendance-2024-03.xlsx".to_string())
        );
        assert_eq!(parse_file_name("inline"), None);
        assert_eq!(parse_file_name("attachment; filename=\"\""), None);
    }

    #[test]
    fn file_name_strips_directories() {
        assert_eq!(
            parse_file_name(r#"attachment; filename="../../home/user/.bashrc""#),
            Some(".bashrc".to_string())
        );
        assert_eq!(
            parse_file_name(r#"attachment; filename="..\\..\\boot.ini""#),
            Some("boot.ini".to_string())
        );
        assert_eq!(
            parse_file_name("attachment; filename=/etc/passwd"),
            Some("passwd".to_string())
        );
        assert_eq!(parse_file_name(r#"attachment; filename="..""#), None);
        assert_eq!(parse_file_name(r#"attachment; filename="reports/""#), None);
    }
}
