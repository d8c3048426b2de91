/// Social graph provider client (Meta Graph API)
///
/// Resolves the business account behind a page token, lists recent media and
/// fetches per-item detail. The detail step is N+1 sequential HTTP calls by
/// design; fine for the handful of recent items a dashboard shows, a known
/// limit at larger scale.
use crate::{
    config::GraphProviderConfig,
    error::{DeskError, DeskResult},
    providers::{build_http_client, decode_json, transport_error},
};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct PagesPayload {
    #[serde(default)]
    pub data: Vec<PagePayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PagePayload {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessAccountPayload {
    pub instagram_business_account: Option<LinkedAccountPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkedAccountPayload {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaListPayload {
    #[serde(default)]
    pub data: Vec<MediaIdPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaIdPayload {
    pub id: String,
}

/// Full media detail: caption, type, url, comments, timestamp
#[derive(Debug, Clone, Deserialize)]
pub struct MediaPayload {
    pub id: String,
    #[serde(default)]
    pub caption: String,
    pub media_type: String,
    #[serde(default)]
    pub media_url: String,
    /// e.g. "2024-01-15T18:04:23+0000"
    pub timestamp: String,
    #[serde(default)]
    pub comments: Option<CommentsPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentsPayload {
    #[serde(default)]
    pub data: Vec<CommentPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPayload {
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub timestamp: String,
}

const MEDIA_DETAIL_FIELDS: &str = "id,caption,media_type,media_url,comments,timestamp";

/// Social graph provider client
#[derive(Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    config: GraphProviderConfig,
}

impl GraphClient {
    pub fn new(config: GraphProviderConfig) -> DeskResult<Self> {
        Ok(Self {
            http: build_http_client()?,
            config,
        })
    }

    /// Resolve the social business account id behind a page token
    ///
    /// Two-step: list the pages the token owns, then read the linked
    /// business-account id from the first page.
    pub async fn fetch_social_account_id(&self, page_token: &str) -> DeskResult<String> {
        let url = format!("{}/me/accounts", self.config.api_url);
        let response = self
            .http
            .get(&url)
            .query(&[("access_token", page_token)])
            .send()
            .await
            .map_err(|e| transport_error("Page list failed", e))?;

        let pages: PagesPayload = decode_json(response).await?;
        let page = pages.data.first().ok_or_else(|| DeskError::RemoteFetch {
            status: 200,
            body: "token owns no pages".to_string(),
        })?;

        let url = format!("{}/{}", self.config.api_url, page.id);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("fields", "instagram_business_account"),
                ("access_token", page_token),
            ])
            .send()
            .await
            .map_err(|e| transport_error("Business account lookup failed", e))?;

        let account: BusinessAccountPayload = decode_json(response).await?;
        let linked = account
            .instagram_business_account
            .ok_or_else(|| DeskError::RemoteFetch {
                status: 200,
                body: format!("page {} has no linked business account", page.id),
            })?;

        Ok(linked.id)
    }

    /// List recent media and fetch full detail per item
    pub async fn fetch_media(
        &self,
        account_id: &str,
        page_token: &str,
    ) -> DeskResult<Vec<MediaPayload>> {
        let url = format!("{}/{}/media", self.config.api_url, account_id);
        let response = self
            .http
            .get(&url)
            .query(&[("access_token", page_token)])
            .send()
            .await
            .map_err(|e| transport_error("Media list failed", e))?;

        let listing: MediaListPayload = decode_json(response).await?;

        let mut media = Vec::with_capacity(listing.data.len());
        for item in &listing.data {
            media.push(self.fetch_media_detail(&item.id, page_token).await?);
        }

        Ok(media)
    }

    /// Fetch the full detail of one media item
    pub async fn fetch_media_detail(
        &self,
        media_id: &str,
        page_token: &str,
    ) -> DeskResult<MediaPayload> {
        let url = format!("{}/{}", self.config.api_url, media_id);
        let response = self
            .http
            .get(&url)
            .query(&[("fields", MEDIA_DETAIL_FIELDS), ("access_token", page_token)])
            .send()
            .await
            .map_err(|e| transport_error("Media detail fetch failed", e))?;

        decode_json(response).await
    }

    /// Publish a reply to a comment
    pub async fn post_comment_reply(
        &self,
        comment_id: &str,
        message: &str,
        page_token: &str,
    ) -> DeskResult<()> {
        let url = format!("{}/{}/replies", self.config.api_url, comment_id);
        let response = self
            .http
            .post(&url)
            .form(&[("message", message), ("access_token", page_token)])
            .send()
            .await
            .map_err(|e| transport_error("Comment reply failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeskError::RemoteFetch {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
