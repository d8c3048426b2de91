/// Business-listing provider client (Google Business Profile)
///
/// Exchanges the user's stored OAuth credential for the listing record and
/// its reviews. The listing lives on the business-information API; reviews
/// still come from the legacy v4 API.
use crate::{
    config::ListingProviderConfig,
    credentials::StoredCredential,
    error::DeskResult,
    providers::{build_http_client, decode_json, transport_error},
};
use serde::Deserialize;

/// Listing list response
#[derive(Debug, Clone, Deserialize)]
pub struct ListingPayload {
    #[serde(default)]
    pub locations: Vec<LocationPayload>,
}

/// One listing entry with nested category/service-type structures
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPayload {
    /// Resource name, e.g. "locations/123456789"
    pub name: String,
    pub title: String,
    pub categories: CategoriesPayload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesPayload {
    pub primary_category: PrimaryCategoryPayload,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryCategoryPayload {
    /// Resource name, e.g. "categories/gcid:restaurant"
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub service_types: Vec<ServiceTypePayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceTypePayload {
    /// e.g. "job_type_id:install_faucet"
    pub service_type_id: String,
    #[serde(default)]
    pub display_name: String,
}

/// Reviews list response
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewsPayload {
    #[serde(default)]
    pub reviews: Vec<ReviewPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub review_id: String,
    #[serde(default)]
    pub reviewer: ReviewerPayload,
    /// Enumerated label, ONE through FIVE
    #[serde(default)]
    pub star_rating: String,
    #[serde(default)]
    pub comment: String,
    /// Present when the owner already answered
    #[serde(default)]
    pub review_reply: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerPayload {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub profile_photo_url: String,
}

/// Business-listing provider client
#[derive(Clone)]
pub struct ListingClient {
    http: reqwest::Client,
    config: ListingProviderConfig,
}

impl ListingClient {
    pub fn new(config: ListingProviderConfig) -> DeskResult<Self> {
        Ok(Self {
            http: build_http_client()?,
            config,
        })
    }

    /// Fetch the listing record for the credential's account
    pub async fn fetch_listing(&self, credential: &StoredCredential) -> DeskResult<ListingPayload> {
        let url = format!(
            "{}/v1/accounts/{}/locations",
            self.config.info_api_url, credential.account_id
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&credential.access_token)
            .query(&[("readMask", "name,title,categories,profile")])
            .send()
            .await
            .map_err(|e| transport_error("Listing fetch failed", e))?;

        decode_json(response).await
    }

    /// Fetch the reviews of one location
    ///
    /// Non-success statuses surface as RemoteFetch with status and body; the
    /// caller decides whether an empty review list is valid.
    pub async fn fetch_reviews(
        &self,
        credential: &StoredCredential,
        location_id: &str,
    ) -> DeskResult<ReviewsPayload> {
        let url = format!(
            "{}/v4/accounts/{}/locations/{}/reviews",
            self.config.reviews_api_url, credential.account_id, location_id
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&credential.access_token)
            .send()
            .await
            .map_err(|e| transport_error("Review fetch failed", e))?;

        decode_json(response).await
    }
}
