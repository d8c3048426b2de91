/// Social post and comment store
///
/// Posts refresh caption/media fields on every resync (two-step upsert);
/// comments are immutable in practice but follow the same shape so a
/// provider-side edit would still land.
use crate::{
    error::DeskResult,
    normalize::{NormalizedComment, NormalizedPost},
    store::{
        models::{SocialComment, SocialPost},
        parse_stored_timestamp,
    },
};
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub struct SocialStore {
    db: SqlitePool,
}

impl SocialStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Upsert a post for its author
    pub async fn upsert_post(&self, post: &NormalizedPost, author: &str) -> DeskResult<SocialPost> {
        // Step 1: get or create by provider id and author
        let existing = sqlx::query("SELECT post_id FROM social_post WHERE post_id = ?")
            .bind(&post.post_id)
            .fetch_optional(&self.db)
            .await?;

        if existing.is_none() {
            sqlx::query("INSERT INTO social_post (post_id, author) VALUES (?, ?)")
                .bind(&post.post_id)
                .bind(author)
                .execute(&self.db)
                .await?;
        }

        // Step 2: overwrite mutable fields
        sqlx::query(
            r#"
            UPDATE social_post
            SET caption = ?, media_type = ?, media_url = ?, published_at = ?
            WHERE post_id = ?
            "#,
        )
        .bind(&post.caption)
        .bind(post.media_type.as_str())
        .bind(&post.media_url)
        .bind(post.published_at.to_rfc3339())
        .bind(&post.post_id)
        .execute(&self.db)
        .await?;

        Ok(SocialPost {
            post_id: post.post_id.clone(),
            author: author.to_string(),
            caption: post.caption.clone(),
            media_type: post.media_type.as_str().to_string(),
            media_url: post.media_url.clone(),
            published_at: Some(post.published_at),
        })
    }

    /// Upsert a comment under a post
    pub async fn upsert_comment(
        &self,
        comment: &NormalizedComment,
        post_id: &str,
    ) -> DeskResult<SocialComment> {
        let existing = sqlx::query("SELECT comment_id FROM social_comment WHERE comment_id = ?")
            .bind(&comment.comment_id)
            .fetch_optional(&self.db)
            .await?;

        if existing.is_none() {
            sqlx::query("INSERT INTO social_comment (comment_id) VALUES (?)")
                .bind(&comment.comment_id)
                .execute(&self.db)
                .await?;
        }

        sqlx::query(
            r#"
            UPDATE social_comment
            SET content = ?, sent_at = ?, post_id = ?
            WHERE comment_id = ?
            "#,
        )
        .bind(&comment.content)
        .bind(comment.sent_at.to_rfc3339())
        .bind(post_id)
        .bind(&comment.comment_id)
        .execute(&self.db)
        .await?;

        Ok(SocialComment {
            comment_id: comment.comment_id.clone(),
            content: comment.content.clone(),
            sent_at: Some(comment.sent_at),
            post_id: Some(post_id.to_string()),
        })
    }

    /// Most recent posts of an author, newest first
    pub async fn recent_posts(&self, author: &str, limit: i64) -> DeskResult<Vec<SocialPost>> {
        let rows = sqlx::query(
            r#"
            SELECT post_id, author, caption, media_type, media_url, published_at
            FROM social_post
            WHERE author = ?
            ORDER BY published_at DESC
            LIMIT ?
            "#,
        )
        .bind(author)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        rows.iter().map(|row| self.map_post(row)).collect()
    }

    /// Comments of a post, newest first, with paging
    pub async fn recent_comments(
        &self,
        post_id: &str,
        limit: i64,
        offset: i64,
    ) -> DeskResult<Vec<SocialComment>> {
        let rows = sqlx::query(
            r#"
            SELECT comment_id, content, sent_at, post_id
            FROM social_comment
            WHERE post_id = ?
            ORDER BY sent_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(post_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        rows.iter()
            .map(|row| {
                let sent_at: Option<String> = row.get("sent_at");
                Ok(SocialComment {
                    comment_id: row.get("comment_id"),
                    content: row.get("content"),
                    sent_at: sent_at.as_deref().map(parse_stored_timestamp).transpose()?,
                    post_id: row.get("post_id"),
                })
            })
            .collect()
    }

    /// Fetch a post by provider id
    pub async fn get_post(&self, post_id: &str) -> DeskResult<Option<SocialPost>> {
        let row = sqlx::query(
            r#"
            SELECT post_id, author, caption, media_type, media_url, published_at
            FROM social_post
            WHERE post_id = ?
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.db)
        .await?;

        row.map(|row| self.map_post(&row)).transpose()
    }

    fn map_post(&self, row: &sqlx::sqlite::SqliteRow) -> DeskResult<SocialPost> {
        let published_at: Option<String> = row.get("published_at");
        Ok(SocialPost {
            post_id: row.get("post_id"),
            author: row.get("author"),
            caption: row.get("caption"),
            media_type: row.get("media_type"),
            media_url: row.get("media_url"),
            published_at: published_at
                .as_deref()
                .map(parse_stored_timestamp)
                .transpose()?,
        })
    }
}
