use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::A1Config;
use crate::constants::endpoints;
use crate::models::{DirectUnreadResponse, GroupUnreadResponse, InboundMessage};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// Timeout, DNS or connection failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Chat API returned HTTP {0}")]
    Status(u16),

    /// Body was not the JSON shape we expect, or `success` was false
    #[error("Unexpected chat API response: {0}")]
    ResponseFormat(String),
}

/// The two unread-message endpoints the poller reads.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn fetch_unread_direct(&self, username: &str) -> Result<Vec<InboundMessage>, ChatError>;

    async fn fetch_unread_groups(&self, username: &str) -> Result<Vec<InboundMessage>, ChatError>;
}

/// [`ChatApi`] over the backend's REST endpoints
pub struct HttpChatApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpChatApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn from_config(config: &A1Config) -> Result<Self, ChatError> {
        Self::new(config.api_base_url.clone(), config.request_timeout())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        action: &str,
        username: &str,
    ) -> Result<T, ChatError> {
        let response = self
            .client
            .get(self.endpoint(path))
            .query(&[("action", action), ("username", username)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ChatError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ChatError::ResponseFormat(e.to_string()))
    }
}

#[async_trait]
impl ChatApi for HttpChatApi {
    async fn fetch_unread_direct(&self, username: &str) -> Result<Vec<InboundMessage>, ChatError> {
        let response: DirectUnreadResponse = self
            .get_json(endpoints::CHAT, endpoints::ACTION_GET_UNREAD, username)
            .await?;
        if !response.success {
            return Err(ChatError::ResponseFormat(
                "get_unread returned success=false".to_string(),
            ));
        }
        Ok(response.messages.into_iter().map(Into::into).collect())
    }

    async fn fetch_unread_groups(&self, username: &str) -> Result<Vec<InboundMessage>, ChatError> {
        let response: GroupUnreadResponse = self
            .get_json(
                endpoints::CHAT_GROUPS,
                endpoints::ACTION_GET_UNREAD_ALL,
                username,
            )
            .await?;
        if !response.success {
            return Err(ChatError::ResponseFormat(
                "get_unread_all returned success=false".to_string(),
            ));
        }
        Ok(response.messages.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    async fn unread(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        if params.get("action").map(String::as_str) != Some("get_unread") {
            return Json(json!({"success": false}));
        }
        let user = params.get("username").cloned().unwrap_or_default();
        Json(json!({
            "success": true,
            "messages": [
                {"id": 11, "from_username": "dave", "message": format!("hi {}", user)},
                {"id": "12", "from_username": "dave", "message": "", "attachment_name": "photo.jpg"}
            ]
        }))
    }

    async fn unread_groups(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        assert_eq!(params.get("action").map(String::as_str), Some("get_unread_all"));
        Json(json!({
            "success": true,
            "messages": [
                {"id": 5, "group_id": 2, "group_name": "Crew", "from_username": "mia",
                 "from_display_name": "Mia R.", "message": "done"}
            ]
        }))
    }

    #[tokio::test]
    async fn test_fetch_unread() {
        let base = serve(
            Router::new()
                .route("/chat", get(unread))
                .route("/chat_groups", get(unread_groups)),
        )
        .await;
        let api = HttpChatApi::new(base, Duration::from_secs(5)).unwrap();

        let direct = api.fetch_unread_direct("alex").await.unwrap();
        assert_eq!(direct.len(), 2);
        assert_eq!(direct[0].text, "hi alex");
        assert_eq!(direct[1].id, 12);
        assert!(direct[1].has_attachment);

        let groups = api.fetch_unread_groups("alex").await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].group_id, Some(2));
        assert_eq!(groups[0].display_name, "Mia R.");
    }

    #[tokio::test]
    async fn test_unsuccessful_response_is_format_error() {
        let base = serve(Router::new().route(
            "/chat",
            get(|| async { Json(json!({"success": false, "error": "no user"})) }),
        ))
        .await;
        let api = HttpChatApi::new(base, Duration::from_secs(5)).unwrap();

        assert!(matches!(
            api.fetch_unread_direct("alex").await,
            Err(ChatError::ResponseFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_html_error_page_is_format_error() {
        let base = serve(Router::new().route("/chat_groups", get(|| async { "<html>oops</html>" })))
            .await;
        let api = HttpChatApi::new(base, Duration::from_secs(5)).unwrap();

        assert!(matches!(
            api.fetch_unread_groups("alex").await,
            Err(ChatError::ResponseFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_http_status_error() {
        let base = serve(Router::new()).await;
        let api = HttpChatApi::new(base, Duration::from_secs(5)).unwrap();

        assert!(matches!(
            api.fetch_unread_direct("alex").await,
            Err(ChatError::Status(404))
        ));
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let base = serve(Router::new().route(
            "/chat",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({"success": true, "messages": []}))
            }),
        ))
        .await;
        let api = HttpChatApi::new(base, Duration::from_millis(100)).unwrap();

        assert!(matches!(
            api.fetch_unread_direct("alex").await,
            Err(ChatError::Network(_))
        ));
    }
}
