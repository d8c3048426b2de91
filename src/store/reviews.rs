/// Review store
///
/// Upsert is two explicit steps: get-or-create by provider id, then
/// unconditional overwrite of the mutable fields. Creation alone never
/// refreshes an existing row.
use crate::{
    error::DeskResult,
    normalize::NormalizedReview,
    store::{models::Review, parse_stored_timestamp},
};
use chrono::Utc;
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub struct ReviewStore {
    db: SqlitePool,
}

impl ReviewStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Upsert a review for a location
    pub async fn upsert_review(
        &self,
        review: &NormalizedReview,
        location_id: &str,
    ) -> DeskResult<Review> {
        // Step 1: get or create by provider id only
        let existing = sqlx::query("SELECT received_at FROM review WHERE review_id = ?")
            .bind(&review.review_id)
            .fetch_optional(&self.db)
            .await?;

        let received_at = match existing {
            Some(row) => parse_stored_timestamp(row.get("received_at"))?,
            None => {
                let now = Utc::now();
                sqlx::query("INSERT INTO review (review_id, received_at) VALUES (?, ?)")
                    .bind(&review.review_id)
                    .bind(now.to_rfc3339())
                    .execute(&self.db)
                    .await?;
                now
            }
        };

        // Step 2: overwrite mutable fields
        sqlx::query(
            r#"
            UPDATE review
            SET reviewer_name = ?, reviewer_photo_url = ?, star_rating = ?, comment = ?, location_id = ?
            WHERE review_id = ?
            "#,
        )
        .bind(&review.reviewer_name)
        .bind(&review.reviewer_photo_url)
        .bind(review.star_rating)
        .bind(&review.comment)
        .bind(location_id)
        .bind(&review.review_id)
        .execute(&self.db)
        .await?;

        Ok(Review {
            review_id: review.review_id.clone(),
            reviewer_name: review.reviewer_name.clone(),
            reviewer_photo_url: review.reviewer_photo_url.clone(),
            star_rating: review.star_rating,
            comment: review.comment.clone(),
            location_id: Some(location_id.to_string()),
            received_at,
        })
    }

    /// Reviews of a location, newest first
    pub async fn list_for_location(&self, location_id: &str) -> DeskResult<Vec<Review>> {
        let rows = sqlx::query(
            r#"
            SELECT review_id, reviewer_name, reviewer_photo_url, star_rating, comment, location_id, received_at
            FROM review
            WHERE location_id = ?
            ORDER BY received_at DESC, review_id
            "#,
        )
        .bind(location_id)
        .fetch_all(&self.db)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Review {
                    review_id: row.get("review_id"),
                    reviewer_name: row.get("reviewer_name"),
                    reviewer_photo_url: row.get("reviewer_photo_url"),
                    star_rating: row.get("star_rating"),
                    comment: row.get("comment"),
                    location_id: row.get("location_id"),
                    received_at: parse_stored_timestamp(row.get("received_at"))?,
                })
            })
            .collect()
    }

    /// Most recent review of a location
    pub async fn latest_for_location(&self, location_id: &str) -> DeskResult<Option<Review>> {
        Ok(self.list_for_location(location_id).await?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::memory_pool;
    use crate::normalize::{NormalizedListing, NormalizedReview};
    use crate::store::ListingStore;

    async fn store_with_location() -> (ReviewStore, ListingStore) {
        let pool = memory_pool().await;
        let listings = ListingStore::new(pool.clone());
        listings
            .get_or_create_category("restaurant", "Restaurant")
            .await
            .unwrap();
        listings
            .get_or_create_location(
                &NormalizedListing {
                    location_id: "loc-1".to_string(),
                    title: "Chez Nous".to_string(),
                    category_id: "restaurant".to_string(),
                    category_name: "Restaurant".to_string(),
                    services: Vec::new(),
                },
                "alice",
            )
            .await
            .unwrap();
        (ReviewStore::new(pool), listings)
    }

    fn review(id: &str, rating: i64, comment: &str) -> NormalizedReview {
        NormalizedReview {
            review_id: id.to_string(),
            reviewer_name: "Ada".to_string(),
            reviewer_photo_url: String::new(),
            star_rating: rating,
            comment: comment.to_string(),
            has_reply: false,
        }
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent_by_provider_id() {
        let (reviews, _) = store_with_location().await;

        reviews
            .upsert_review(&review("rev-1", 4, "Nice"), "loc-1")
            .await
            .unwrap();
        reviews
            .upsert_review(&review("rev-1", 4, "Nice"), "loc-1")
            .await
            .unwrap();

        let stored = reviews.list_for_location("loc-1").await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_resync_refreshes_mutable_fields() {
        let (reviews, _) = store_with_location().await;

        let first = reviews
            .upsert_review(&review("rev-1", 3, "Fine"), "loc-1")
            .await
            .unwrap();
        let second = reviews
            .upsert_review(&review("rev-1", 4, "Edited: actually great"), "loc-1")
            .await
            .unwrap();

        // received_at is fixed at creation, mutable fields move
        assert_eq!(first.received_at, second.received_at);

        let stored = reviews.list_for_location("loc-1").await.unwrap();
        assert_eq!(stored[0].star_rating, 4);
        assert_eq!(stored[0].comment, "Edited: actually great");
    }

    #[tokio::test]
    async fn test_latest_for_location() {
        let (reviews, _) = store_with_location().await;

        reviews
            .upsert_review(&review("rev-1", 5, "First"), "loc-1")
            .await
            .unwrap();
        reviews
            .upsert_review(&review("rev-2", 1, "Second"), "loc-1")
            .await
            .unwrap();

        let latest = reviews.latest_for_location("loc-1").await.unwrap().unwrap();
        // Same received_at second resolution is possible; ties break on id
        assert!(latest.review_id == "rev-1" || latest.review_id == "rev-2");

        assert_eq!(reviews.list_for_location("loc-1").await.unwrap().len(), 2);
    }
}
