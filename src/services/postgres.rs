use std::collections::HashMap;
use std::time::Duration;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::models::{GuardianPlayerLink, GuardianRecord, LinkStatus, LinkedPlayer, PlayerRecord};
use crate::services::GuardianLinkRepository;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// Link status as stored in the `link_status` enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "link_status", rename_all = "lowercase")]
pub enum DbLinkStatus {
    Active,
    Pending,
    Declined,
}

impl From<DbLinkStatus> for LinkStatus {
    fn from(value: DbLinkStatus) -> Self {
        match value {
            DbLinkStatus::Active => LinkStatus::Active,
            DbLinkStatus::Pending => LinkStatus::Pending,
            DbLinkStatus::Declined => LinkStatus::Declined,
        }
    }
}

/// PostgreSQL-backed guardian directory and link repository
///
/// Reads the tables written by the club import pipeline. Nothing here writes
/// guardian, player or link rows.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Fetch guardian records by id, oldest first
    ///
    /// Unknown ids are skipped.
    pub async fn get_guardians_by_ids(&self, ids: &[String]) -> Result<Vec<GuardianRecord>, PostgresError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = r#"
            SELECT id, first_name, last_name, email, phone, postcode, address, town,
                   claimed_by, created_at, updated_at
            FROM guardian_identities
            WHERE id = ANY($1)
            ORDER BY created_at, id
        "#;

        let rows = sqlx::query(query).bind(ids).fetch_all(&self.pool).await?;

        let guardians = rows
            .iter()
            .map(guardian_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!("Loaded {} of {} requested guardians", guardians.len(), ids.len());

        Ok(guardians)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Active and pending links joined with their players
///
/// Served by the `guardian_player_links_guardian_idx` index.
const LINKS_BY_GUARDIANS_QUERY: &str = r#"
    SELECT l.guardian_id, l.player_id, l.status, l.created_at AS linked_at,
           p.first_name, p.last_name, p.date_of_birth, p.postcode, p.address
    FROM guardian_player_links l
    JOIN player_identities p ON p.id = l.player_id
    WHERE l.guardian_id = ANY($1)
      AND l.status IN ('active', 'pending')
    ORDER BY l.guardian_id, l.created_at, l.player_id
"#;

impl GuardianLinkRepository for PostgresClient {
    type Error = PostgresError;

    async fn find_links_by_guardian_ids(
        &self,
        guardian_ids: &[String],
    ) -> Result<HashMap<String, Vec<LinkedPlayer>>, PostgresError> {
        let mut links_by_guardian: HashMap<String, Vec<LinkedPlayer>> = HashMap::new();
        if guardian_ids.is_empty() {
            return Ok(links_by_guardian);
        }

        let rows = sqlx::query(LINKS_BY_GUARDIANS_QUERY)
            .bind(guardian_ids)
            .fetch_all(&self.pool)
            .await?;

        for row in &rows {
            let linked = linked_player_from_row(row)?;
            links_by_guardian
                .entry(linked.link.guardian_id.clone())
                .or_default()
                .push(linked);
        }

        tracing::debug!(
            "Fetched {} links for {} guardians in one query",
            rows.len(),
            guardian_ids.len()
        );

        Ok(links_by_guardian)
    }

    async fn find_links_by_guardian_id(&self, guardian_id: &str) -> Result<Vec<LinkedPlayer>, PostgresError> {
        let rows = sqlx::query(LINKS_BY_GUARDIANS_QUERY)
            .bind(vec![guardian_id.to_string()])
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| linked_player_from_row(row).map_err(PostgresError::from))
            .collect()
    }
}

fn guardian_from_row(row: &PgRow) -> Result<GuardianRecord, sqlx::Error> {
    Ok(GuardianRecord {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        postcode: row.try_get("postcode")?,
        address: row.try_get("address")?,
        town: row.try_get("town")?,
        claimed_by: row.try_get("claimed_by")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn linked_player_from_row(row: &PgRow) -> Result<LinkedPlayer, sqlx::Error> {
    let status: DbLinkStatus = row.try_get("status")?;
    let player_id: String = row.try_get("player_id")?;

    Ok(LinkedPlayer {
        link: GuardianPlayerLink {
            guardian_id: row.try_get("guardian_id")?,
            player_id: player_id.clone(),
            status: status.into(),
            created_at: row.try_get("linked_at")?,
        },
        player: PlayerRecord {
            id: player_id,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            date_of_birth: row.try_get("date_of_birth")?,
            postcode: row.try_get("postcode")?,
            address: row.try_get("address")?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_status_conversion() {
        assert_eq!(LinkStatus::from(DbLinkStatus::Active), LinkStatus::Active);
        assert_eq!(LinkStatus::from(DbLinkStatus::Pending), LinkStatus::Pending);
        assert_eq!(LinkStatus::from(DbLinkStatus::Declined), LinkStatus::Declined);
    }

    #[test]
    fn test_links_query_excludes_declined() {
        assert!(LINKS_BY_GUARDIANS_QUERY.contains("l.status IN ('active', 'pending')"));
        assert!(LINKS_BY_GUARDIANS_QUERY.contains("l.guardian_id = ANY($1)"));
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL"]
    async fn test_batch_lookup_against_database() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let client = PostgresClient::from_settings(&url, Some(2), Some(1), None, None)
            .await
            .expect("Failed to connect");

        assert!(client.health_check().await.unwrap());

        let links = client
            .find_links_by_guardian_ids(&["missing-guardian".to_string()])
            .await
            .unwrap();
        assert!(links.is_empty());
    }
}
