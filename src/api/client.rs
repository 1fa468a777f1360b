use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CACHE_CONTROL};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::auth::principal::{Principal, Role};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::notify::model::Notification;

const PRINCIPAL_PATH: &str = "api/auth/me";
const PERMISSIONS_PATH: &str = "api/permissions";
const NOTIFICATIONS_PATH: &str = "api/notifications";

#[derive(Debug, Deserialize)]
struct PagesResponse {
    pages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NotificationsResponse {
    notifications: Vec<Notification>,
}

/// HTTP client for the RINSR backend.
///
/// Thin and stateless: auth is a bearer token fixed at construction, every
/// call is a single request/response. Retry and fallback policy belong to
/// the callers, which know which failures are fail-closed.
#[derive(Debug, Clone)]
pub struct RinsrClient {
    http: reqwest::Client,
    base: Url,
    notification_limit: u32,
}

impl RinsrClient {
    pub fn new(cfg: &ApiConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&cfg.base_url)
            .map_err(|_| ApiError::BaseUrl(cfg.base_url.clone()))?;

        let mut headers = HeaderMap::new();
        if let Some(token) = &cfg.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::Config("bearer token contains invalid bytes".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Config(format!("http client construction failed: {e}")))?;

        Ok(Self { http, base, notification_limit: cfg.notification_limit })
    }

    /// Build a client from the global application config.
    pub fn from_config() -> Result<Self, ApiError> {
        Self::new(&crate::config::config().api)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|_| ApiError::BaseUrl(format!("{} + {}", self.base, path)))
    }

    /// GET the current principal from the identity endpoint.
    pub async fn fetch_principal(&self) -> Result<Principal, ApiError> {
        let url = self.endpoint(PRINCIPAL_PATH)?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::request(PRINCIPAL_PATH, e))?;

        if !resp.status().is_success() {
            return Err(ApiError::status(resp.status().as_u16(), PRINCIPAL_PATH));
        }

        resp.json::<Principal>()
            .await
            .map_err(|e| ApiError::decode(PRINCIPAL_PATH, e))
    }

    /// GET the allowed page prefixes for a role.
    ///
    /// Permission sets can change between sessions, so every call carries a
    /// fresh timestamp query parameter to defeat intermediate caches.
    pub async fn fetch_role_pages(&self, role: Role) -> Result<Vec<String>, ApiError> {
        let endpoint = format!("{}/{}", PERMISSIONS_PATH, role.as_str());
        let mut url = self.endpoint(&endpoint)?;
        url.query_pairs_mut()
            .append_pair("ts", &Utc::now().timestamp_millis().to_string());

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::request(&endpoint, e))?;

        if !resp.status().is_success() {
            return Err(ApiError::status(resp.status().as_u16(), &endpoint));
        }

        let body = resp
            .json::<PagesResponse>()
            .await
            .map_err(|e| ApiError::decode(&endpoint, e))?;
        Ok(body.pages)
    }

    /// GET the durable notification list, uncached.
    pub async fn fetch_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let mut url = self.endpoint(NOTIFICATIONS_PATH)?;
        url.query_pairs_mut()
            .append_pair("limit", &self.notification_limit.to_string());

        let resp = self
            .http
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| ApiError::request(NOTIFICATIONS_PATH, e))?;

        if !resp.status().is_success() {
            return Err(ApiError::status(resp.status().as_u16(), NOTIFICATIONS_PATH));
        }

        let body = resp
            .json::<NotificationsResponse>()
            .await
            .map_err(|e| ApiError::decode(NOTIFICATIONS_PATH, e))?;
        Ok(body.notifications)
    }

    /// PUT the read flag for one notification. Idempotent on the backend.
    pub async fn mark_notification_read(&self, id: &str) -> Result<(), ApiError> {
        let endpoint = format!("{}/{}/read", NOTIFICATIONS_PATH, id);
        let url = self.endpoint(&endpoint)?;

        let resp = self
            .http
            .put(url)
            .send()
            .await
            .map_err(|e| ApiError::request(&endpoint, e))?;

        if !resp.status().is_success() {
            return Err(ApiError::status(resp.status().as_u16(), &endpoint));
        }
        Ok(())
    }
}
