/// Sync orchestrator
///
/// Sequences the provider clients, normalization layer and reconciliation
/// store per user-triggered request. Four independent linear flows; no step
/// is retried, and any failure aborts the remaining steps of that flow.
/// There are no transactions spanning multi-step upserts, so a failure
/// mid-flow leaves earlier upserts committed.
use crate::{
    credentials::{CredentialStore, Provider},
    error::{DeskError, DeskResult},
    library::MediaLibrary,
    normalize::{
        normalize_comments, normalize_listing, normalize_post, normalize_review, summarize_engine,
        Annotation,
    },
    providers::{
        graph::GraphClient,
        listing::{ListingClient, LocationPayload, ReviewsPayload},
        vision::{DetectionPayload, RawDetection, VisionClient},
    },
    store::{
        models::{Location, Photo, Review, SocialComment, SocialPost},
        ListingStore, PhotoStore, ReviewStore, SocialStore,
    },
    suggest::{ReplySuggestions, SuggestionGenerator},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Comments persisted per post on one sync, newest first
pub const SYNCED_COMMENT_LIMIT: usize = 25;

/// Sample review used to demo suggestions when a listing has none yet
const SAMPLE_REVIEW: &str =
    "We had a wonderful time at your restaurant, thank you for everything!";

/// Result of a listing sync
#[derive(Debug, Clone, Serialize)]
pub struct ListingSyncOutcome {
    pub location: Location,
    pub reviews: Vec<Review>,
    /// Present when the newest review is unanswered (or the listing has no
    /// reviews at all and a sample was used)
    pub suggestions: Option<ReplySuggestions>,
}

/// One synced post with its persisted comments, newest first
#[derive(Debug, Clone, Serialize)]
pub struct PostWithComments {
    pub post: SocialPost,
    pub comments: Vec<SocialComment>,
}

/// Result of a photo upload
#[derive(Debug, Clone, Serialize)]
pub struct PhotoUploadOutcome {
    pub photo: Photo,
    pub annotations: Vec<Annotation>,
    pub caption: String,
}

/// Context for on-demand reply generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplyContext {
    /// Review reply guided by the owner's stored preferences
    Review { preferences: String },
    /// Comment reply with the post caption as context
    Comment { caption: String },
}

/// The sync orchestrator
#[derive(Clone)]
pub struct SyncService {
    credentials: CredentialStore,
    listing_client: Arc<ListingClient>,
    graph_client: Arc<GraphClient>,
    vision_client: Arc<VisionClient>,
    suggestions: SuggestionGenerator,
    listings: ListingStore,
    reviews: ReviewStore,
    social: SocialStore,
    photos: PhotoStore,
    library: MediaLibrary,
}

impl SyncService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        credentials: CredentialStore,
        listing_client: Arc<ListingClient>,
        graph_client: Arc<GraphClient>,
        vision_client: Arc<VisionClient>,
        suggestions: SuggestionGenerator,
        listings: ListingStore,
        reviews: ReviewStore,
        social: SocialStore,
        photos: PhotoStore,
        library: MediaLibrary,
    ) -> Self {
        Self {
            credentials,
            listing_client,
            graph_client,
            vision_client,
            suggestions,
            listings,
            reviews,
            social,
            photos,
            library,
        }
    }

    // ---- Flow 1: listing sync -------------------------------------------

    /// Fetch the user's listing and reviews, reconcile them locally and
    /// draft suggestions for the newest unanswered review
    pub async fn sync_listing_and_reviews(&self, user: &str) -> DeskResult<ListingSyncOutcome> {
        let credential = self.credentials.get(user, Provider::Google).await?;

        let listing = self.listing_client.fetch_listing(&credential).await?;
        let payload = listing.locations.first().ok_or_else(|| {
            DeskError::Parse("listing response contained no locations".to_string())
        })?;

        let location = self.ingest_listing(payload, user).await?;

        let reviews_payload = self
            .listing_client
            .fetch_reviews(&credential, &location.location_id)
            .await?;
        let (reviews, unanswered) = self
            .ingest_reviews(&reviews_payload, &location.location_id)
            .await?;

        let suggestions = match unanswered {
            Some(comment) => Some(self.suggestions.default_suggestions(&comment).await?),
            None if reviews.is_empty() => {
                Some(self.suggestions.default_suggestions(SAMPLE_REVIEW).await?)
            }
            None => None,
        };

        tracing::info!(
            "Synced location {} with {} review(s) for {}",
            location.location_id,
            reviews.len(),
            user
        );

        Ok(ListingSyncOutcome {
            location,
            reviews,
            suggestions,
        })
    }

    /// Reconcile one listing payload: category, services, location, links
    pub async fn ingest_listing(
        &self,
        payload: &LocationPayload,
        user: &str,
    ) -> DeskResult<Location> {
        let normalized = normalize_listing(payload)?;

        self.listings
            .get_or_create_category(&normalized.category_id, &normalized.category_name)
            .await?;
        for service in &normalized.services {
            self.listings
                .get_or_create_service(&service.service_id, &service.name)
                .await?;
        }

        let (location, _) = self.listings.get_or_create_location(&normalized, user).await?;
        for service in &normalized.services {
            self.listings
                .link_service(&location.location_id, &service.service_id)
                .await?;
        }

        Ok(location)
    }

    /// Reconcile a reviews payload for a location
    ///
    /// Returns the stored reviews plus the comment of the newest review when
    /// it has no owner reply yet.
    pub async fn ingest_reviews(
        &self,
        payload: &ReviewsPayload,
        location_id: &str,
    ) -> DeskResult<(Vec<Review>, Option<String>)> {
        let mut stored = Vec::with_capacity(payload.reviews.len());
        let mut unanswered = None;

        for (index, review_payload) in payload.reviews.iter().enumerate() {
            let normalized = normalize_review(review_payload)?;
            if index == 0 && !normalized.has_reply && !normalized.comment.is_empty() {
                unanswered = Some(normalized.comment.clone());
            }
            stored.push(self.reviews.upsert_review(&normalized, location_id).await?);
        }

        Ok((stored, unanswered))
    }

    // ---- Flow 2: social sync --------------------------------------------

    /// Mirror the user's recent social media posts and comments
    pub async fn sync_social_media(&self, user: &str) -> DeskResult<Vec<PostWithComments>> {
        let credential = self.credentials.get(user, Provider::Facebook).await?;
        let page_token = &credential.access_token;

        let account_id = self.graph_client.fetch_social_account_id(page_token).await?;
        let media = self.graph_client.fetch_media(&account_id, page_token).await?;

        let mut synced = Vec::with_capacity(media.len());
        for payload in &media {
            synced.push(self.ingest_media(payload, user).await?);
        }

        tracing::info!("Synced {} post(s) for {}", synced.len(), user);

        Ok(synced)
    }

    /// Reconcile one media detail payload: the post and its recent comments
    pub async fn ingest_media(
        &self,
        payload: &crate::providers::graph::MediaPayload,
        user: &str,
    ) -> DeskResult<PostWithComments> {
        let normalized = normalize_post(payload)?;
        let post = self.social.upsert_post(&normalized, user).await?;

        let mut comments = normalize_comments(payload)?;
        comments.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        comments.truncate(SYNCED_COMMENT_LIMIT);

        let mut stored = Vec::with_capacity(comments.len());
        for comment in &comments {
            stored.push(self.social.upsert_comment(comment, &post.post_id).await?);
        }

        Ok(PostWithComments {
            post,
            comments: stored,
        })
    }

    /// Recent posts with their newest comments, from the local mirror
    pub async fn recent_posts_with_comments(
        &self,
        user: &str,
        post_limit: i64,
        comment_limit: i64,
    ) -> DeskResult<Vec<PostWithComments>> {
        let posts = self.social.recent_posts(user, post_limit).await?;

        let mut result = Vec::with_capacity(posts.len());
        for post in posts {
            let comments = self
                .social
                .recent_comments(&post.post_id, comment_limit, 0)
                .await?;
            result.push(PostWithComments { post, comments });
        }

        Ok(result)
    }

    /// Paged comments of one mirrored post
    pub async fn comments_page(
        &self,
        post_id: &str,
        limit: i64,
        offset: i64,
    ) -> DeskResult<Vec<SocialComment>> {
        if self.social.get_post(post_id).await?.is_none() {
            return Err(DeskError::NotFound(format!("No such post: {}", post_id)));
        }
        self.social.recent_comments(post_id, limit, offset).await
    }

    // ---- Flow 3: photo upload + annotation ------------------------------

    /// Store an uploaded photo, annotate it and draft a caption
    ///
    /// A duplicate (title, owner) aborts before anything is written; the
    /// conflict message carries the existing record's URL so annotation can
    /// be re-run against it.
    pub async fn upload_photo(
        &self,
        user: &str,
        title: &str,
        file_name: &str,
        data: Vec<u8>,
    ) -> DeskResult<PhotoUploadOutcome> {
        if let Some(existing) = self.photos.find_by_title(user, title).await? {
            return Err(DeskError::Conflict(format!(
                "photo titled {:?} already exists; existing copy at {}",
                title, existing.url
            )));
        }

        // The library takes any file; photos must at least decode
        match image::load_from_memory(&data) {
            Ok(decoded) => {
                tracing::debug!(
                    "Photo {:?} decodes to {}x{}",
                    title,
                    decoded.width(),
                    decoded.height()
                );
            }
            Err(e) => {
                return Err(DeskError::Validation(format!(
                    "upload is not a decodable image: {}",
                    e
                )));
            }
        }

        let path = format!("photos/{}/{}", user, file_name);
        let url = self.library.store(&path, data).await?;
        let photo = self.photos.create_photo(user, title, &url).await?;

        let (annotations, caption) = self.annotate_and_caption(&photo).await?;

        Ok(PhotoUploadOutcome {
            photo,
            annotations,
            caption,
        })
    }

    /// Run detection on a stored photo, persist every raw item and draft a
    /// caption from the deduplicated label summary
    async fn annotate_and_caption(
        &self,
        photo: &Photo,
    ) -> DeskResult<(Vec<Annotation>, String)> {
        let detection = self.vision_client.detect_objects(&photo.url).await;
        let (raw_items, annotations) =
            flatten_detections(detection.as_ref(), self.vision_client.engines());

        for raw in &raw_items {
            self.photos.upsert_detected_object(photo.id, raw).await?;
        }

        let caption = self
            .suggestions
            .caption(&labels_for_caption(&annotations))
            .await?;

        Ok((annotations, caption))
    }

    /// Detection-only annotation of an arbitrary image URL, no persistence
    pub async fn annotate_image(&self, image_url: &str) -> DeskResult<Vec<Annotation>> {
        let detection = self.vision_client.detect_objects(image_url).await;
        let (_, annotations) =
            flatten_detections(detection.as_ref(), self.vision_client.engines());
        Ok(annotations)
    }

    // ---- Flow 4: reply generation ---------------------------------------

    /// Generate a reply for a review or comment; nothing is persisted
    pub async fn generate_reply(&self, text: &str, context: &ReplyContext) -> DeskResult<String> {
        match context {
            ReplyContext::Review { preferences } => {
                self.suggestions.review_reply(text, preferences).await
            }
            ReplyContext::Comment { caption } => {
                self.suggestions.comment_reply(text, caption).await
            }
        }
    }

    /// Draft three-tone suggestions for a review on demand
    pub async fn default_suggestions(&self, review: &str) -> DeskResult<ReplySuggestions> {
        self.suggestions.default_suggestions(review).await
    }

    /// Draft a caption from keywords on demand
    pub async fn caption_from_keywords(&self, keywords: &str) -> DeskResult<String> {
        self.suggestions.caption(keywords).await
    }

    /// Publish a reply to a provider comment
    pub async fn publish_comment_reply(
        &self,
        user: &str,
        comment_id: &str,
        message: &str,
    ) -> DeskResult<()> {
        let credential = self.credentials.get(user, Provider::Facebook).await?;
        self.graph_client
            .post_comment_reply(comment_id, message, &credential.access_token)
            .await
    }

    /// Dashboard summary: newest location, its newest review, newest post
    pub async fn dashboard_snapshot(&self, user: &str) -> DeskResult<DashboardSnapshot> {
        let location = self.listings.last_location_for_owner(user).await?;
        let last_review = match &location {
            Some(location) => {
                self.reviews
                    .latest_for_location(&location.location_id)
                    .await?
            }
            None => None,
        };
        let last_post = self
            .social
            .recent_posts(user, 1)
            .await?
            .into_iter()
            .next();
        let last_comment = match &last_post {
            Some(post) => self
                .social
                .recent_comments(&post.post_id, 1, 0)
                .await?
                .into_iter()
                .next(),
            None => None,
        };

        Ok(DashboardSnapshot {
            location,
            last_review,
            last_post,
            last_comment,
        })
    }
}

/// Newest mirrored records for the dashboard landing view
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub location: Option<Location>,
    pub last_review: Option<Review>,
    pub last_post: Option<SocialPost>,
    pub last_comment: Option<SocialComment>,
}

/// Flatten an optional detection payload into persistable raw items and the
/// deduplicated summary
///
/// Engines are visited in configured order. Raw items are concatenated
/// as-is; summaries dedup by label within each engine and are concatenated
/// across engines, not deduplicated against each other. A missing payload
/// (detection skipped) yields empty lists.
pub fn flatten_detections(
    payload: Option<&DetectionPayload>,
    engines: &[String],
) -> (Vec<RawDetection>, Vec<Annotation>) {
    let Some(payload) = payload else {
        return (Vec::new(), Vec::new());
    };

    let mut raw_items = Vec::new();
    let mut annotations = Vec::new();

    for engine in engines {
        let Some(detections) = payload.engines.get(engine) else {
            continue;
        };
        annotations.extend(summarize_engine(&detections.items));
        raw_items.extend(detections.items.iter().cloned());
    }

    (raw_items, annotations)
}

/// Comma-separated label set handed to caption generation
pub fn labels_for_caption(annotations: &[Annotation]) -> String {
    annotations
        .iter()
        .map(|a| a.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
