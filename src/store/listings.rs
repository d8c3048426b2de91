/// Listing store: categories, services, locations and their links
///
/// Category, Service and Location are bare get-or-create: an existing row is
/// returned untouched and its fields are NOT refreshed on resync. The
/// Location/Service association is additive-only.
use crate::{
    error::DeskResult,
    normalize::NormalizedListing,
    store::models::{Category, Location, Service},
};
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub struct ListingStore {
    db: SqlitePool,
}

impl ListingStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Get or create a category by provider id
    ///
    /// Returns the record and whether it was created.
    pub async fn get_or_create_category(
        &self,
        category_id: &str,
        name: &str,
    ) -> DeskResult<(Category, bool)> {
        let row = sqlx::query("SELECT category_id, name FROM category WHERE category_id = ?")
            .bind(category_id)
            .fetch_optional(&self.db)
            .await?;

        if let Some(row) = row {
            return Ok((
                Category {
                    category_id: row.get("category_id"),
                    name: row.get("name"),
                },
                false,
            ));
        }

        sqlx::query("INSERT INTO category (category_id, name) VALUES (?, ?)")
            .bind(category_id)
            .bind(name)
            .execute(&self.db)
            .await?;

        Ok((
            Category {
                category_id: category_id.to_string(),
                name: name.to_string(),
            },
            true,
        ))
    }

    /// Get or create a service by provider id
    pub async fn get_or_create_service(
        &self,
        service_id: &str,
        name: &str,
    ) -> DeskResult<(Service, bool)> {
        let row = sqlx::query("SELECT service_id, name FROM service WHERE service_id = ?")
            .bind(service_id)
            .fetch_optional(&self.db)
            .await?;

        if let Some(row) = row {
            return Ok((
                Service {
                    service_id: row.get("service_id"),
                    name: row.get("name"),
                },
                false,
            ));
        }

        sqlx::query("INSERT INTO service (service_id, name) VALUES (?, ?)")
            .bind(service_id)
            .bind(name)
            .execute(&self.db)
            .await?;

        Ok((
            Service {
                service_id: service_id.to_string(),
                name: name.to_string(),
            },
            true,
        ))
    }

    /// Get or create a location from a normalized listing
    ///
    /// The referenced category must already exist.
    pub async fn get_or_create_location(
        &self,
        listing: &NormalizedListing,
        owner: &str,
    ) -> DeskResult<(Location, bool)> {
        if let Some(existing) = self.get_location(&listing.location_id).await? {
            return Ok((existing, false));
        }

        sqlx::query(
            "INSERT INTO location (location_id, name, owner, category_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&listing.location_id)
        .bind(&listing.title)
        .bind(owner)
        .bind(&listing.category_id)
        .execute(&self.db)
        .await?;

        Ok((
            Location {
                location_id: listing.location_id.clone(),
                name: listing.title.clone(),
                owner: owner.to_string(),
                category_id: Some(listing.category_id.clone()),
            },
            true,
        ))
    }

    /// Associate a service with a location
    ///
    /// Additive-only: sync never removes a link the provider stopped
    /// reporting.
    pub async fn link_service(&self, location_id: &str, service_id: &str) -> DeskResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO location_service (location_id, service_id) VALUES (?, ?)",
        )
        .bind(location_id)
        .bind(service_id)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Fetch a location by provider id
    pub async fn get_location(&self, location_id: &str) -> DeskResult<Option<Location>> {
        let row = sqlx::query(
            "SELECT location_id, name, owner, category_id FROM location WHERE location_id = ?",
        )
        .bind(location_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|row| Location {
            location_id: row.get("location_id"),
            name: row.get("name"),
            owner: row.get("owner"),
            category_id: row.get("category_id"),
        }))
    }

    /// Service ids linked to a location
    pub async fn linked_service_ids(&self, location_id: &str) -> DeskResult<Vec<String>> {
        let rows = sqlx::query(
            "SELECT service_id FROM location_service WHERE location_id = ? ORDER BY service_id",
        )
        .bind(location_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.iter().map(|row| row.get("service_id")).collect())
    }

    /// Most recently created location for an owner
    pub async fn last_location_for_owner(&self, owner: &str) -> DeskResult<Option<Location>> {
        let row = sqlx::query(
            r#"
            SELECT location_id, name, owner, category_id
            FROM location
            WHERE owner = ?
            ORDER BY rowid DESC
            LIMIT 1
            "#,
        )
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|row| Location {
            location_id: row.get("location_id"),
            name: row.get("name"),
            owner: row.get("owner"),
            category_id: row.get("category_id"),
        }))
    }
}
