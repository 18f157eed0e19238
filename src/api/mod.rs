use crate::drafts::DraftPayload;
use crate::models::{PageQuota, DEFAULT_MAX_PAGES};
use crate::storage::TOKEN_KEY;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    Unauthorized,
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

    fn unauthorized() -> Self {
        Self {
            kind: ApiErrorKind::Unauthorized,
            message: "Unauthorized".to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    /// Transient failures are retried by the sync controller; the request
    /// never reached the backend. HTTP-level failures surface immediately.
    pub fn is_transient(&self) -> bool {
        self.kind == ApiErrorKind::Network
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:8787".to_string();

        // We support BOTH `window.ENV.API_URL` (documented in README) and
        // `window.ENV.api_url` (legacy/implementation detail) for compatibility.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    // 1) Prefer README style: API_URL
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self { api_url: url_str };
                        }
                    }

                    // 2) Fallback: api_url
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"api_url".into()) {
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

/// "Replace draft fields" request: always the full canonical payload,
/// never a diff.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct UpdateCardDraftRequest {
    #[serde(rename = "draft-id")]
    pub draft_id: String,

    #[serde(flatten)]
    pub fields: DraftPayload,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct GetCardDraftRequest {
    #[serde(rename = "draft-id")]
    pub draft_id: String,
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
        let token = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(TOKEN_KEY).ok().flatten());

        Self { base_url, token }
    }

    fn get_auth_token(&self) -> Option<String> {
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

    async fn request_api<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&impl serde::Serialize>,
    ) -> ApiResult<T> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);
        let mut req = client.post(url);
        req = Self::with_auth_headers(req, self.get_auth_token());

        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;

        if res.status().is_success() {
            res.json().await.map_err(ApiError::parse)
        } else if res.status().as_u16() == 401 {
            Err(ApiError::unauthorized())
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, "Request failed"))
        }
    }

    /// Start a new draft on the remote store and return its identifier.
    pub async fn create_card_draft(&self, initial: &DraftPayload) -> ApiResult<String> {
        let data: serde_json::Value = self
            .request_api("/lettercard/new-card-draft", Some(initial))
            .await?;

        let id = Self::parse_created_draft_id(&data);
        if id.trim().is_empty() {
            return Err(ApiError::parse(format!(
                "Create draft succeeded but response is missing draft id: {}",
                data
            )));
        }

        Ok(id)
    }

    /// Backend response has been observed with different shapes; accept a
    /// few common forms.
    pub(crate) fn parse_created_draft_id(data: &serde_json::Value) -> String {
        data.get("card-draft")
            .and_then(|d| d.get("id").or_else(|| d.get("draft-id")))
            .or_else(|| data.get("draft-id"))
            .or_else(|| data.get("id"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    }

    pub async fn get_card_draft(&self, draft_id: &str) -> ApiResult<DraftPayload> {
        let data: serde_json::Value = self
            .request_api(
                "/lettercard/get-card-draft",
                Some(&GetCardDraftRequest {
                    draft_id: draft_id.to_string(),
                }),
            )
            .await?;

        Self::parse_draft_response(data)
            .ok_or_else(|| ApiError::parse("Draft response is missing card-draft fields"))
    }

    pub(crate) fn parse_draft_response(data: serde_json::Value) -> Option<DraftPayload> {
        // Preferred: fields wrapped under `card-draft`. Bare records are
        // accepted defensively.
        let obj = data.get("card-draft").cloned().unwrap_or(data);
        serde_json::from_value::<DraftPayload>(obj).ok()
    }

    /// Replace every draft field with the given canonical payload.
    pub async fn update_card_draft(
        &self,
        draft_id: &str,
        payload: &DraftPayload,
    ) -> ApiResult<serde_json::Value> {
        self.request_api(
            "/lettercard/update-card-draft",
            Some(&UpdateCardDraftRequest {
                draft_id: draft_id.to_string(),
                fields: payload.clone(),
            }),
        )
        .await
    }

    pub async fn finalize_card_draft(&self, draft_id: &str) -> ApiResult<serde_json::Value> {
        self.request_api(
            "/lettercard/finalize-card-draft",
            Some(&serde_json::json!({ "draft-id": draft_id })),
        )
        .await
    }

    pub async fn discard_card_draft(&self, draft_id: &str) -> ApiResult<serde_json::Value> {
        self.request_api(
            "/lettercard/discard-card-draft",
            Some(&serde_json::json!({ "draft-id": draft_id })),
        )
        .await
    }

    /// Entitlement check: how many letter pages this account may use.
    pub async fn get_page_quota(&self) -> ApiResult<PageQuota> {
        let data: serde_json::Value = self
            .request_api("/lettercard/get-page-quota", Some(&serde_json::json!({})))
            .await?;

        let max_pages = data
            .get("max-pages")
            .and_then(|v| v.as_u64())
            .unwrap_or(DEFAULT_MAX_PAGES as u64) as usize;

        Ok(PageQuota { max_pages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionState;

    #[test]
    fn test_api_client_new() {
        let client = ApiClient::new("http://localhost:8787".to_string());
        assert_eq!(client.base_url, "http://localhost:8787");
        assert!(client.token.is_none());
    }

    #[test]
    fn test_network_errors_are_transient_http_errors_are_not() {
        let net = ApiError {
            kind: ApiErrorKind::Network,
            message: "connection reset".to_string(),
        };
        let http = ApiError {
            kind: ApiErrorKind::Http,
            message: "Request failed (500): boom".to_string(),
        };
        let auth = ApiError::unauthorized();

        assert!(net.is_transient());
        assert!(!http.is_transient());
        assert!(!auth.is_transient());
    }

    #[test]
    fn test_update_request_flattens_payload_next_to_draft_id() {
        let payload = DraftPayload::from_session(&SessionState {
            letter_pages: vec!["Hello".to_string()],
            recipient_name: "Mai".to_string(),
            ..Default::default()
        });
        let req = UpdateCardDraftRequest {
            draft_id: "d-9".to_string(),
            fields: payload,
        };

        let v = serde_json::to_value(req).expect("should serialize");
        assert_eq!(v["draft-id"], "d-9");
        assert_eq!(v["letter-content"], "Hello");
        assert_eq!(v["recipient-name"], "Mai");
    }

    #[test]
    fn test_parse_created_draft_id_accepts_known_shapes() {
        let wrapped = serde_json::json!({ "card-draft": { "id": "d-1" } });
        let kebab = serde_json::json!({ "draft-id": "d-2" });
        let bare = serde_json::json!({ "id": "d-3" });
        let missing = serde_json::json!({ "ok": true });

        assert_eq!(ApiClient::parse_created_draft_id(&wrapped), "d-1");
        assert_eq!(ApiClient::parse_created_draft_id(&kebab), "d-2");
        assert_eq!(ApiClient::parse_created_draft_id(&bare), "d-3");
        assert_eq!(ApiClient::parse_created_draft_id(&missing), "");
    }

    #[test]
    fn test_parse_draft_response_wrapped_and_bare() {
        let wrapped = serde_json::json!({
            "card-draft": { "letter-content": "Hi", "recipient-name": "Mai" }
        });
        let bare = serde_json::json!({ "letter-content": "Hi" });

        let a = ApiClient::parse_draft_response(wrapped).expect("wrapped should parse");
        assert_eq!(a.letter_content, "Hi");
        assert_eq!(a.recipient_name, "Mai");

        let b = ApiClient::parse_draft_response(bare).expect("bare should parse");
        assert_eq!(b.letter_content, "Hi");
    }
}
