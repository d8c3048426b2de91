/// Photo and detection store
///
/// Photo uniqueness on (title, author) is enforced here in application
/// logic, not by a database constraint. Detection rows are keyed by
/// (label, photo, confidence): a repeat run reporting the same label at a
/// different confidence creates a new row.
use crate::{
    error::{DeskError, DeskResult},
    normalize::annotation::bounding_box,
    providers::vision::RawDetection,
    store::{models::{DetectedObject, Photo}, parse_stored_timestamp},
};
use chrono::Utc;
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub struct PhotoStore {
    db: SqlitePool,
}

impl PhotoStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Find a photo by (title, author)
    pub async fn find_by_title(&self, author: &str, title: &str) -> DeskResult<Option<Photo>> {
        let row = sqlx::query(
            "SELECT id, title, url, author, uploaded_at FROM photo WHERE author = ? AND title = ?",
        )
        .bind(author)
        .bind(title)
        .fetch_optional(&self.db)
        .await?;

        row.map(|row| {
            Ok(Photo {
                id: row.get("id"),
                title: row.get("title"),
                url: row.get("url"),
                author: row.get("author"),
                uploaded_at: parse_stored_timestamp(row.get("uploaded_at"))?,
            })
        })
        .transpose()
    }

    /// Create a photo record
    ///
    /// A colliding (title, author) is rejected with Conflict; the existing
    /// row stays untouched and its URL is the one downstream annotation
    /// should use.
    pub async fn create_photo(&self, author: &str, title: &str, url: &str) -> DeskResult<Photo> {
        if self.find_by_title(author, title).await?.is_some() {
            return Err(DeskError::Conflict(format!(
                "photo titled {:?} already exists for this user",
                title
            )));
        }

        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO photo (title, url, author, uploaded_at) VALUES (?, ?, ?, ?)",
        )
        .bind(title)
        .bind(url)
        .bind(author)
        .bind(now.to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(Photo {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            url: url.to_string(),
            author: author.to_string(),
            uploaded_at: now,
        })
    }

    /// Upsert one detection row, keyed by (label, photo, confidence)
    pub async fn upsert_detected_object(
        &self,
        photo_id: i64,
        raw: &RawDetection,
    ) -> DeskResult<DetectedObject> {
        let boxed = bounding_box(raw);
        let is_placed = boxed.is_some();

        let existing = sqlx::query(
            "SELECT id FROM detected_object WHERE label = ? AND photo_id = ? AND confidence = ?",
        )
        .bind(&raw.label)
        .bind(photo_id)
        .bind(raw.confidence)
        .fetch_optional(&self.db)
        .await?;

        let id = match existing {
            Some(row) => {
                let id: i64 = row.get("id");
                sqlx::query(
                    r#"
                    UPDATE detected_object
                    SET x_min = ?, x_max = ?, y_min = ?, y_max = ?, width = ?, height = ?, is_placed = ?
                    WHERE id = ?
                    "#,
                )
                .bind(raw.x_min)
                .bind(raw.x_max)
                .bind(raw.y_min)
                .bind(raw.y_max)
                .bind(raw.width)
                .bind(raw.height)
                .bind(is_placed)
                .bind(id)
                .execute(&self.db)
                .await?;
                id
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO detected_object
                        (label, confidence, x_min, x_max, y_min, y_max, width, height, is_placed, photo_id)
                    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&raw.label)
                .bind(raw.confidence)
                .bind(raw.x_min)
                .bind(raw.x_max)
                .bind(raw.y_min)
                .bind(raw.y_max)
                .bind(raw.width)
                .bind(raw.height)
                .bind(is_placed)
                .bind(photo_id)
                .execute(&self.db)
                .await?;
                result.last_insert_rowid()
            }
        };

        Ok(DetectedObject {
            id,
            label: raw.label.clone(),
            confidence: raw.confidence,
            x_min: raw.x_min,
            x_max: raw.x_max,
            y_min: raw.y_min,
            y_max: raw.y_max,
            width: raw.width,
            height: raw.height,
            is_placed,
            photo_id: Some(photo_id),
        })
    }

    /// Detection rows of a photo
    pub async fn list_detected_objects(&self, photo_id: i64) -> DeskResult<Vec<DetectedObject>> {
        let rows = sqlx::query(
            r#"
            SELECT id, label, confidence, x_min, x_max, y_min, y_max, width, height, is_placed, photo_id
            FROM detected_object
            WHERE photo_id = ?
            ORDER BY id
            "#,
        )
        .bind(photo_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .iter()
            .map(|row| DetectedObject {
                id: row.get("id"),
                label: row.get("label"),
                confidence: row.get("confidence"),
                x_min: row.get("x_min"),
                x_max: row.get("x_max"),
                y_min: row.get("y_min"),
                y_max: row.get("y_max"),
                width: row.get("width"),
                height: row.get("height"),
                is_placed: row.get("is_placed"),
                photo_id: row.get("photo_id"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::memory_pool;

    fn detection(label: &str, confidence: f64) -> RawDetection {
        RawDetection {
            label: label.to_string(),
            confidence,
            x_min: Some(0.1),
            x_max: Some(0.9),
            y_min: Some(0.2),
            y_max: Some(0.8),
            width: Some(0.8),
            height: Some(0.6),
        }
    }

    #[tokio::test]
    async fn test_duplicate_title_same_owner_conflicts() {
        let store = PhotoStore::new(memory_pool().await);

        store
            .create_photo("alice", "menu", "http://host/media/menu.jpg")
            .await
            .unwrap();
        let err = store
            .create_photo("alice", "menu", "http://host/media/menu-2.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Conflict(_)));

        // Still exactly one row, with the original URL
        let photo = store.find_by_title("alice", "menu").await.unwrap().unwrap();
        assert_eq!(photo.url, "http://host/media/menu.jpg");
    }

    #[tokio::test]
    async fn test_same_title_different_owner_succeeds() {
        let store = PhotoStore::new(memory_pool().await);

        store
            .create_photo("alice", "menu", "http://host/media/a.jpg")
            .await
            .unwrap();
        store
            .create_photo("bob", "menu", "http://host/media/b.jpg")
            .await
            .unwrap();

        assert!(store.find_by_title("bob", "menu").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_detection_rows_keyed_by_label_photo_confidence() {
        let store = PhotoStore::new(memory_pool().await);
        let photo = store
            .create_photo("alice", "menu", "http://host/media/menu.jpg")
            .await
            .unwrap();

        // Same key twice: one row
        store
            .upsert_detected_object(photo.id, &detection("plate", 0.9))
            .await
            .unwrap();
        store
            .upsert_detected_object(photo.id, &detection("plate", 0.9))
            .await
            .unwrap();
        assert_eq!(store.list_detected_objects(photo.id).await.unwrap().len(), 1);

        // Same label, different confidence: a second row
        store
            .upsert_detected_object(photo.id, &detection("plate", 0.42))
            .await
            .unwrap();
        assert_eq!(store.list_detected_objects(photo.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_is_placed_tracks_bounding_box() {
        let store = PhotoStore::new(memory_pool().await);
        let photo = store
            .create_photo("alice", "menu", "http://host/media/menu.jpg")
            .await
            .unwrap();

        let mut raw = detection("plate", 0.9);
        raw.x_min = None;
        let stored = store.upsert_detected_object(photo.id, &raw).await.unwrap();
        assert!(!stored.is_placed);

        let stored = store
            .upsert_detected_object(photo.id, &detection("fork", 0.8))
            .await
            .unwrap();
        assert!(stored.is_placed);
    }
}
