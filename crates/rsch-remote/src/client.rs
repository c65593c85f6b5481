//! OAuth2 (password-grant) Reddit client, a `reqwest`-based async client
//! following PRAW's `user_agent` convention.

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart;
use rsch_schemas::Flair;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{RedditApiError, RedditErrorItem};
use crate::RedditCapability;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// Credentials the daemon reads out of `[RedditAPI]`.
#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

pub struct RedditClient {
    http: reqwest::Client,
    creds: RedditCredentials,
    user_agent: String,
    token: RwLock<Option<CachedToken>>,
}

impl RedditClient {
    pub fn new(creds: RedditCredentials) -> Self {
        let user_agent = format!(
            "desktop:{}:v0.0.1  (by u/{})",
            creds.client_id, creds.username
        );
        Self {
            http: reqwest::Client::new(),
            creds,
            user_agent,
            token: RwLock::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, RedditApiError> {
        if let Some(tok) = self.token.read().await.as_ref() {
            if tok.expires_at > Instant::now() {
                return Ok(tok.access_token.clone());
            }
        }
        self.refresh_token().await
    }

    async fn refresh_token(&self) -> Result<String, RedditApiError> {
        let mut guard = self.token.write().await;
        if let Some(tok) = guard.as_ref() {
            if tok.expires_at > Instant::now() {
                return Ok(tok.access_token.clone());
            }
        }

        debug!("fetching a fresh reddit access token");
        let resp = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.creds.client_id, Some(&self.creds.client_secret))
            .header("User-Agent", &self.user_agent)
            .form(&[
                ("grant_type", "password"),
                ("username", &self.creds.username),
                ("password", &self.creds.password),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let body: TokenResponse = resp.json().await.map_err(transport_error)?;

        let expires_at = Instant::now() + Duration::from_secs(body.expires_in.saturating_sub(30));
        *guard = Some(CachedToken {
            access_token: body.access_token.clone(),
            expires_at,
        });
        Ok(body.access_token)
    }

    async fn submit(&self, form: &[(&str, &str)]) -> Result<(), RedditApiError> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .post(format!("{API_BASE}/api/submit"))
            .bearer_auth(token)
            .header("User-Agent", &self.user_agent)
            .form(form)
            .send()
            .await
            .map_err(transport_error)?;

        let body: SubmitResponse = resp.json().await.map_err(transport_error)?;
        reply_to_result(body)
    }
}

#[async_trait]
impl RedditCapability for RedditClient {
    async fn submit_text(
        &self,
        subreddit: &str,
        title: &str,
        body: &str,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        let mut form = vec![("sr", subreddit), ("kind", "self"), ("title", title), ("text", body)];
        if let Some(f) = flair_id {
            form.push(("flair_id", f));
        }
        self.submit(&form).await
    }

    async fn submit_poll(
        &self,
        subreddit: &str,
        title: &str,
        options: &[String],
        selftext: &str,
        duration_days: i32,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        let options_json = serde_json::to_string(options).map_err(|e| {
            RedditApiError::single("EncodeError", e.to_string())
        })?;
        let duration_str = duration_days.to_string();
        let mut form = vec![
            ("sr", subreddit),
            ("kind", "poll"),
            ("title", title),
            ("text", selftext),
            ("options", options_json.as_str()),
        ];
        if duration_days > 0 {
            form.push(("duration", duration_str.as_str()));
        }
        if let Some(f) = flair_id {
            form.push(("flair_id", f));
        }
        self.submit(&form).await
    }

    async fn submit_image(
        &self,
        subreddit: &str,
        title: &str,
        image_path: &Path,
        nsfw: bool,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        let bytes = tokio::fs::read(image_path).await.map_err(|e| {
            RedditApiError::single("LocalIoError", format!("reading {}: {e}", image_path.display()))
        })?;
        let file_name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.bin".to_string());

        let token = self.access_token().await?;
        let mut multipart_form = multipart::Form::new()
            .text("sr", subreddit.to_string())
            .text("kind", "image")
            .text("title", title.to_string())
            .text("nsfw", nsfw.to_string())
            .part("image", multipart::Part::bytes(bytes).file_name(file_name));
        if let Some(f) = flair_id {
            multipart_form = multipart_form.text("flair_id", f.to_string());
        }

        let resp = self
            .http
            .post(format!("{API_BASE}/api/submit"))
            .bearer_auth(token)
            .header("User-Agent", &self.user_agent)
            .multipart(multipart_form)
            .send()
            .await
            .map_err(transport_error)?;

        let body: SubmitResponse = resp.json().await.map_err(transport_error)?;
        reply_to_result(body)
    }

    async fn submit_url(
        &self,
        subreddit: &str,
        title: &str,
        url: &str,
        flair_id: Option<&str>,
    ) -> Result<(), RedditApiError> {
        let mut form = vec![("sr", subreddit), ("kind", "link"), ("title", title), ("url", url)];
        if let Some(f) = flair_id {
            form.push(("flair_id", f));
        }
        self.submit(&form).await
    }

    async fn list_user_selectable_flairs(&self, subreddit: &str) -> Result<Vec<Flair>, RedditApiError> {
        let token = self.access_token().await?;
        let resp = self
            .http
            .get(format!("{API_BASE}/r/{subreddit}/api/link_flair_v2"))
            .bearer_auth(token)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(transport_error)?;

        let choices: Vec<FlairChoice> = resp.json().await.map_err(|e| {
            warn!(error = %e, subreddit, "failed to parse flair listing");
            transport_error(e)
        })?;

        Ok(choices
            .into_iter()
            .map(|c| Flair {
                id: c.id,
                text: c.text,
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct FlairChoice {
    id: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    json: SubmitJsonBody,
}

#[derive(Debug, Deserialize)]
struct SubmitJsonBody {
    #[serde(default)]
    errors: Vec<(String, String, String)>,
}

fn reply_to_result(body: SubmitResponse) -> Result<(), RedditApiError> {
    if body.json.errors.is_empty() {
        return Ok(());
    }
    let items = body
        .json
        .errors
        .into_iter()
        .map(|(error_type, message, _field)| RedditErrorItem { error_type, message })
        .collect();
    Err(RedditApiError(items))
}

fn transport_error(e: reqwest::Error) -> RedditApiError {
    RedditApiError::single("TransportError", e.to_string())
}
