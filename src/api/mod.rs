use crate::models::{Screenplay, UserInfo};
use crate::storage;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// Missing/invalid/expired token (401 or 403).
    Unauthorized,
    /// Opaque 404: not found and not-owned are indistinguishable by contract.
    NotFound,
    /// Rejected request body (400).
    Validation,
    Network,
    Http,
    Parse,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    /// Classify a non-2xx response. `message` should already be the body's
    /// `message` field when present, or a caller-supplied fallback.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        let kind = match status {
            400 => ApiErrorKind::Validation,
            401 | 403 => ApiErrorKind::Unauthorized,
            404 => ApiErrorKind::NotFound,
            _ => ApiErrorKind::Http,
        };
        Self { kind, message }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

/// Pull the human-readable `message` out of a backend error body.
///
/// Every error path in server.js responds with `{"message": "..."}`.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let v: serde_json::Value = serde_json::from_str(body).ok()?;
    v.get("message")
        .and_then(|m| m.as_str())
        .map(|s| s.to_string())
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:5000/api".to_string();

        // Deployment overrides the backend URL via `window.ENV.API_URL`.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn get_api_url() -> String {
    EnvConfig::new().api_url
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AuthRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub token: String,
    pub user: UserInfo,
}

/// Create applies server-side defaults when a field is omitted
/// (title -> "New Screenplay", content -> "").
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct CreateScreenplayRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Full-replace update; the backend has no field-level merge.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct UpdateScreenplayRequest {
    pub title: String,
    pub content: String,
}

#[derive(Clone)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
    pub(crate) token: Option<String>,
}

impl ApiClient {
    #[allow(dead_code)]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            token: None,
        }
    }

    pub fn load_from_storage() -> Self {
        let base_url = get_api_url();
        let token = storage::load_session().map(|s| s.token);

        Self { base_url, token }
    }

    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    pub(crate) fn get_auth_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn with_auth_headers(
        mut req: reqwest::RequestBuilder,
        token: Option<String>,
    ) -> reqwest::RequestBuilder {
        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        req
    }

    async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<reqwest::Response> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.request(method, url);
        req = Self::with_auth_headers(req, self.get_auth_token());

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            Ok(res)
        } else {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            let message =
                extract_message(&body).unwrap_or_else(|| format!("Request failed ({status})"));
            Err(ApiError::from_status(status, message))
        }
    }

    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<T> {
        let res = self.send(method, path, body).await?;
        res.json().await.map_err(ApiError::parse)
    }

    pub async fn register(&self, username: &str, password: &str) -> ApiResult<AuthResponse> {
        self.request_json(
            reqwest::Method::POST,
            "/auth/register",
            Some(&AuthRequest {
                username: username.to_string(),
                password: password.to_string(),
            }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<AuthResponse> {
        self.request_json(
            reqwest::Method::POST,
            "/auth/login",
            Some(&AuthRequest {
                username: username.to_string(),
                password: password.to_string(),
            }),
        )
        .await
    }

    /// Full list for the authenticated user, ordered updated_at desc.
    pub async fn list_screenplays(&self) -> ApiResult<Vec<Screenplay>> {
        self.request_json(reqwest::Method::GET, "/screenplays", None::<&()>)
            .await
    }

    #[allow(dead_code)]
    pub async fn get_screenplay(&self, id: i64) -> ApiResult<Screenplay> {
        self.request_json(
            reqwest::Method::GET,
            &format!("/screenplays/{}", id),
            None::<&()>,
        )
        .await
    }

    pub async fn create_screenplay(
        &self,
        title: Option<String>,
        content: Option<String>,
    ) -> ApiResult<Screenplay> {
        self.request_json(
            reqwest::Method::POST,
            "/screenplays",
            Some(&CreateScreenplayRequest { title, content }),
        )
        .await
    }

    pub async fn update_screenplay(
        &self,
        id: i64,
        title: &str,
        content: &str,
    ) -> ApiResult<Screenplay> {
        self.request_json(
            reqwest::Method::PUT,
            &format!("/screenplays/{}", id),
            Some(&UpdateScreenplayRequest {
                title: title.to_string(),
                content: content.to_string(),
            }),
        )
        .await
    }

    pub async fn delete_screenplay(&self, id: i64) -> ApiResult<()> {
        // 204 No Content on success.
        self.send(
            reqwest::Method::DELETE,
            &format!("/screenplays/{}", id),
            None::<&()>,
        )
        .await?;
        Ok(())
    }

    /// Streams the rendered PDF back as raw bytes.
    pub async fn export_pdf(&self, id: i64) -> ApiResult<Vec<u8>> {
        let res = self
            .send(
                reqwest::Method::GET,
                &format!("/screenplays/{}/pdf", id),
                None::<&()>,
            )
            .await?;
        let bytes = res.bytes().await.map_err(ApiError::network)?;
        Ok(bytes.to_vec())
    }

    pub fn logout(&mut self) {
        self.token = None;
        storage::clear_session();
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
