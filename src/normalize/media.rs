/// Social media normalization
use crate::{
    error::{DeskError, DeskResult},
    providers::graph::MediaPayload,
};
use chrono::{DateTime, Utc};

/// Provider timestamp format, e.g. "2024-01-15T18:04:23+0000".
/// The %z specifier also tolerates a colon in the offset.
const PROVIDER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Media type of a social post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
    CarouselAlbum,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "IMAGE",
            MediaType::Video => "VIDEO",
            MediaType::CarouselAlbum => "CAROUSEL_ALBUM",
        }
    }

    /// Parse the provider's media type label
    pub fn from_provider(label: &str) -> DeskResult<Self> {
        match label {
            "IMAGE" => Ok(MediaType::Image),
            "VIDEO" => Ok(MediaType::Video),
            "CAROUSEL_ALBUM" => Ok(MediaType::CarouselAlbum),
            other => Err(DeskError::Parse(format!("unknown media type {:?}", other))),
        }
    }
}

/// Canonical social post record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPost {
    pub post_id: String,
    pub caption: String,
    pub media_type: MediaType,
    pub media_url: String,
    pub published_at: DateTime<Utc>,
}

/// Canonical social comment record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedComment {
    pub comment_id: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// Parse a provider timestamp in the fixed format
pub fn parse_provider_timestamp(raw: &str) -> DeskResult<DateTime<Utc>> {
    DateTime::parse_from_str(raw, PROVIDER_TIMESTAMP_FORMAT)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DeskError::Parse(format!("bad timestamp {:?}: {}", raw, e)))
}

/// Map a media detail payload to the canonical post record
pub fn normalize_post(payload: &MediaPayload) -> DeskResult<NormalizedPost> {
    if payload.id.is_empty() {
        return Err(DeskError::Parse(
            "media item is missing its provider id".to_string(),
        ));
    }

    Ok(NormalizedPost {
        post_id: payload.id.clone(),
        caption: payload.caption.clone(),
        media_type: MediaType::from_provider(&payload.media_type)?,
        media_url: payload.media_url.clone(),
        published_at: parse_provider_timestamp(&payload.timestamp)?,
    })
}

/// Map the comment edge of a media detail payload to canonical records
pub fn normalize_comments(payload: &MediaPayload) -> DeskResult<Vec<NormalizedComment>> {
    let Some(comments) = &payload.comments else {
        return Ok(Vec::new());
    };

    comments
        .data
        .iter()
        .map(|comment| {
            if comment.id.is_empty() {
                return Err(DeskError::Parse(
                    "comment is missing its provider id".to_string(),
                ));
            }
            Ok(NormalizedComment {
                comment_id: comment.id.clone(),
                content: comment.text.clone(),
                sent_at: parse_provider_timestamp(&comment.timestamp)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::graph::{CommentPayload, CommentsPayload};

    fn media_payload() -> MediaPayload {
        MediaPayload {
            id: "17900000001".to_string(),
            caption: "New menu this week".to_string(),
            media_type: "IMAGE".to_string(),
            media_url: "https://cdn.example.com/p1.jpg".to_string(),
            timestamp: "2024-01-15T18:04:23+0000".to_string(),
            comments: Some(CommentsPayload {
                data: vec![CommentPayload {
                    id: "18000000001".to_string(),
                    text: "Looks great".to_string(),
                    timestamp: "2024-01-15T19:30:00+0000".to_string(),
                }],
            }),
        }
    }

    #[test]
    fn test_parse_provider_timestamp() {
        let parsed = parse_provider_timestamp("2024-01-15T18:04:23+0000").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-15T18:04:23+00:00");

        // Offsets are honored
        let offset = parse_provider_timestamp("2024-01-15T18:04:23+0200").unwrap();
        assert_eq!(offset.to_rfc3339(), "2024-01-15T16:04:23+00:00");
    }

    #[test]
    fn test_colon_offsets_are_tolerated() {
        // %z takes both offset spellings, so either provider variant lands
        let parsed = parse_provider_timestamp("2024-01-15T18:04:23+00:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-15T18:04:23+00:00");
    }

    #[test]
    fn test_mismatched_timestamp_format_fails() {
        let err = parse_provider_timestamp("2024-01-15").unwrap_err();
        assert!(matches!(err, DeskError::Parse(_)));

        let err = parse_provider_timestamp("15/01/2024 18:04").unwrap_err();
        assert!(matches!(err, DeskError::Parse(_)));
    }

    #[test]
    fn test_normalize_post_and_comments() {
        let payload = media_payload();

        let post = normalize_post(&payload).unwrap();
        assert_eq!(post.post_id, "17900000001");
        assert_eq!(post.media_type, MediaType::Image);

        let comments = normalize_comments(&payload).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].comment_id, "18000000001");
    }

    #[test]
    fn test_unknown_media_type_fails() {
        let mut payload = media_payload();
        payload.media_type = "REEL".to_string();

        let err = normalize_post(&payload).unwrap_err();
        assert!(matches!(err, DeskError::Parse(_)));
    }

    #[test]
    fn test_media_without_comment_edge_is_empty() {
        let mut payload = media_payload();
        payload.comments = None;
        assert!(normalize_comments(&payload).unwrap().is_empty());
    }
}
