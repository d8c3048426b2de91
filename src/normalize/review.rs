/// Review normalization
use crate::{
    error::{DeskError, DeskResult},
    providers::listing::ReviewPayload,
};

/// Canonical review record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedReview {
    pub review_id: String,
    pub reviewer_name: String,
    pub reviewer_photo_url: String,
    pub star_rating: i64,
    pub comment: String,
    /// Whether the owner already answered this review on the provider side
    pub has_reply: bool,
}

/// Map the provider's enumerated rating label to an integer
///
/// Unknown labels map to 0 rather than rejecting the review. Documented
/// leniency: the provider has shipped unexpected labels before.
pub fn star_rating_from_label(label: &str) -> i64 {
    match label {
        "ONE" => 1,
        "TWO" => 2,
        "THREE" => 3,
        "FOUR" => 4,
        "FIVE" => 5,
        _ => 0,
    }
}

/// Map a review payload to the canonical record
pub fn normalize_review(payload: &ReviewPayload) -> DeskResult<NormalizedReview> {
    if payload.review_id.is_empty() {
        return Err(DeskError::Parse(
            "review is missing its provider id".to_string(),
        ));
    }

    Ok(NormalizedReview {
        review_id: payload.review_id.clone(),
        reviewer_name: payload.reviewer.display_name.clone(),
        reviewer_photo_url: payload.reviewer.profile_photo_url.clone(),
        star_rating: star_rating_from_label(&payload.star_rating),
        comment: payload.comment.clone(),
        has_reply: payload.review_reply.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::listing::ReviewerPayload;

    #[test]
    fn test_star_rating_labels() {
        assert_eq!(star_rating_from_label("ONE"), 1);
        assert_eq!(star_rating_from_label("TWO"), 2);
        assert_eq!(star_rating_from_label("THREE"), 3);
        assert_eq!(star_rating_from_label("FOUR"), 4);
        assert_eq!(star_rating_from_label("FIVE"), 5);
    }

    #[test]
    fn test_unknown_star_rating_defaults_to_zero() {
        assert_eq!(star_rating_from_label("SIX"), 0);
        assert_eq!(star_rating_from_label(""), 0);
        assert_eq!(star_rating_from_label("four"), 0);
    }

    #[test]
    fn test_normalize_review() {
        let payload = ReviewPayload {
            review_id: "rev-1".to_string(),
            reviewer: ReviewerPayload {
                display_name: "Ada".to_string(),
                profile_photo_url: "https://example.com/ada.png".to_string(),
            },
            star_rating: "FOUR".to_string(),
            comment: "Lovely".to_string(),
            review_reply: None,
        };

        let review = normalize_review(&payload).unwrap();
        assert_eq!(review.star_rating, 4);
        assert_eq!(review.reviewer_name, "Ada");
        assert!(!review.has_reply);
    }

    #[test]
    fn test_review_without_provider_id_is_invalid() {
        let payload = ReviewPayload {
            review_id: String::new(),
            reviewer: ReviewerPayload::default(),
            star_rating: "FIVE".to_string(),
            comment: String::new(),
            review_reply: None,
        };

        let err = normalize_review(&payload).unwrap_err();
        assert!(matches!(err, DeskError::Parse(_)));
    }
}
