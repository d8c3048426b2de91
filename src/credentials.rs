/// Stored OAuth credentials per (user, provider)
///
/// The session/connection flow lives outside this core; it writes tokens
/// here and the sync flows look them up by (user, provider).
use crate::error::{DeskError, DeskResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

/// Providers a user can connect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Facebook,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
        }
    }
}

/// A stored OAuth credential
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredential {
    pub user: String,
    pub provider: Provider,
    pub access_token: String,
    pub refresh_token: String,
    /// Provider-side account id (e.g. the listing account uid)
    pub account_id: String,
}

/// Credential store
#[derive(Clone)]
pub struct CredentialStore {
    db: SqlitePool,
}

impl CredentialStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Look up the stored credential for a user and provider
    ///
    /// Fails with CredentialMissing if the user never connected the provider.
    pub async fn get(&self, user: &str, provider: Provider) -> DeskResult<StoredCredential> {
        let row = sqlx::query(
            r#"
            SELECT access_token, refresh_token, account_id
            FROM provider_credential
            WHERE user = ? AND provider = ?
            "#,
        )
        .bind(user)
        .bind(provider.as_str())
        .fetch_optional(&self.db)
        .await?;

        let row = row.ok_or_else(|| {
            DeskError::CredentialMissing(format!(
                "user {} has no {} credential",
                user,
                provider.as_str()
            ))
        })?;

        Ok(StoredCredential {
            user: user.to_string(),
            provider,
            access_token: row.get("access_token"),
            refresh_token: row.get("refresh_token"),
            account_id: row.get("account_id"),
        })
    }

    /// Store or replace a credential
    pub async fn put(&self, credential: &StoredCredential) -> DeskResult<()> {
        sqlx::query(
            r#"
            INSERT INTO provider_credential (user, provider, access_token, refresh_token, account_id, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (user, provider) DO UPDATE SET
                access_token = excluded.access_token,
                refresh_token = excluded.refresh_token,
                account_id = excluded.account_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&credential.user)
        .bind(credential.provider.as_str())
        .bind(&credential.access_token)
        .bind(&credential.refresh_token)
        .bind(&credential.account_id)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::memory_pool;

    #[tokio::test]
    async fn test_missing_credential_is_an_error() {
        let store = CredentialStore::new(memory_pool().await);

        let err = store.get("alice", Provider::Google).await.unwrap_err();
        assert!(matches!(err, DeskError::CredentialMissing(_)));
    }

    #[tokio::test]
    async fn test_put_then_get_roundtrip() {
        let store = CredentialStore::new(memory_pool().await);

        store
            .put(&StoredCredential {
                user: "alice".to_string(),
                provider: Provider::Facebook,
                access_token: "page-token".to_string(),
                refresh_token: String::new(),
                account_id: "12345".to_string(),
            })
            .await
            .unwrap();

        let cred = store.get("alice", Provider::Facebook).await.unwrap();
        assert_eq!(cred.access_token, "page-token");
        assert_eq!(cred.account_id, "12345");

        // Google credential is still missing for the same user
        let err = store.get("alice", Provider::Google).await.unwrap_err();
        assert!(matches!(err, DeskError::CredentialMissing(_)));
    }

    #[tokio::test]
    async fn test_put_replaces_existing_tokens() {
        let store = CredentialStore::new(memory_pool().await);

        let mut cred = StoredCredential {
            user: "bob".to_string(),
            provider: Provider::Google,
            access_token: "old".to_string(),
            refresh_token: "refresh-old".to_string(),
            account_id: "acc-1".to_string(),
        };
        store.put(&cred).await.unwrap();

        cred.access_token = "new".to_string();
        store.put(&cred).await.unwrap();

        let fetched = store.get("bob", Provider::Google).await.unwrap();
        assert_eq!(fetched.access_token, "new");
    }
}
