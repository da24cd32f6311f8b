use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_REQUEST_TIMEOUT_SECS, WORDPRESS_POSTS_PATH};
use crate::models::Op;

/// Credentials for the WordPress REST API (application password auth)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WordPressConfig {
    pub site_url: String,
    pub username: String,
    pub application_password: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Publish,
    Pending,
    Private,
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "publish" => Ok(PostStatus::Publish),
            "pending" => Ok(PostStatus::Pending),
            "private" => Ok(PostStatus::Private),
            other => Err(format!("unknown post status: {other}")),
        }
    }
}

/// Body of a create/update post request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl PostDraft {
    /// Build a draft whose content is the editor document converted to HTML
    pub fn from_ops(title: impl Into<String>, ops: &[Op]) -> Self {
        Self {
            title: title.into(),
            content: super::convert(ops),
            status: PostStatus::Draft,
            excerpt: None,
            slug: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PublishedPost {
    pub id: u64,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("WordPress request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("WordPress returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected WordPress response: {0}")]
    ResponseFormat(String),
}

/// Client for the `wp/v2/posts` endpoint
pub struct WordPressClient {
    config: WordPressConfig,
    client: reqwest::Client,
}

impl WordPressClient {
    pub fn new(config: WordPressConfig) -> Result<Self, PublishError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS * 3))
            .build()?;
        Ok(Self { config, client })
    }

    fn posts_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.site_url.trim_end_matches('/'),
            WORDPRESS_POSTS_PATH
        )
    }

    pub async fn create_post(&self, draft: &PostDraft) -> Result<PublishedPost, PublishError> {
        self.send(self.posts_url(), draft).await
    }

    pub async fn update_post(
        &self,
        post_id: u64,
        draft: &PostDraft,
    ) -> Result<PublishedPost, PublishError> {
        self.send(format!("{}/{}", self.posts_url(), post_id), draft)
            .await
    }

    async fn send(&self, url: String, draft: &PostDraft) -> Result<PublishedPost, PublishError> {
        tracing::debug!(url = %url, status = ?draft.status, "sending post to WordPress");

        let response = self
            .client
            .post(&url)
            .basic_auth(
                &self.config.username,
                Some(&self.config.application_password),
            )
            .json(draft)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Status { status, body });
        }

        let body = response.text().await?;
        let post: PublishedPost = serde_json::from_str(&body)
            .map_err(|e| PublishError::ResponseFormat(e.to_string()))?;

        tracing::info!(post_id = post.id, link = %post.link, "post saved to WordPress");
        Ok(post)
    }
}
