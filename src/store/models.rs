/// Domain records persisted by the reconciliation store
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A taxonomy node for a location, shared across locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub category_id: String,
    pub name: String,
}

/// An offering type a location provides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub service_id: String,
    pub name: String,
}

/// A business listing owned by a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub location_id: String,
    pub name: String,
    pub owner: String,
    /// Nulled when the referenced category is deleted
    pub category_id: Option<String>,
}

/// A customer review of a location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub review_id: String,
    pub reviewer_name: String,
    pub reviewer_photo_url: String,
    pub star_rating: i64,
    pub comment: String,
    pub location_id: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// A social media post mirrored from the graph provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPost {
    pub post_id: String,
    pub author: String,
    pub caption: String,
    pub media_type: String,
    pub media_url: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// A comment on a social post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialComment {
    pub comment_id: String,
    pub content: String,
    pub sent_at: Option<DateTime<Utc>>,
    pub post_id: Option<String>,
}

/// A user-uploaded image in the media library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub author: String,
    pub uploaded_at: DateTime<Utc>,
}

/// An annotation produced by object detection on a photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedObject {
    pub id: i64,
    pub label: String,
    pub confidence: f64,
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub is_placed: bool,
    pub photo_id: Option<i64>,
}
