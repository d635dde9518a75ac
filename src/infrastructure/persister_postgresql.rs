use anyhow::Context;
use chrono::{DateTime, Utc};
use log::info;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    AuditStamps, RepositoryDetails, RepositoryKey, RepositoryPersister, RepositoryRecord,
    StdResult,
};

type RepositoryRow = (
    i64,
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    i32,
    Option<DateTime<Utc>>,
    String,
    DateTime<Utc>,
    String,
    DateTime<Utc>,
);

/// A persister that stores repository records in a PostgreSQL database.
pub struct PostgresSqlPersister {
    pool: PgPool,
}

impl PostgresSqlPersister {
    /// Creates a new `PostgresSqlPersister` instance and makes sure its table exists.
    pub async fn try_new(connection_string: &str, max_connections: u32) -> StdResult<Self> {
        let persister = Self {
            pool: PgPoolOptions::new()
                .max_connections(max_connections)
                .connect(connection_string)
                .await
                .with_context(|| "Failed to connect to PostgreSQL")?,
        };
        persister.create_schema().await?;

        Ok(persister)
    }

    async fn create_schema(&self) -> StdResult<()> {
        sqlx::query("CREATE SCHEMA IF NOT EXISTS github")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            r#"
CREATE TABLE IF NOT EXISTS github.repository_details (
    id BIGSERIAL PRIMARY KEY,
    owner TEXT NOT NULL,
    repo_name TEXT NOT NULL,
    full_name TEXT NOT NULL,
    description TEXT,
    clone_url TEXT,
    stars INTEGER NOT NULL CHECK (stars >= 0),
    created_at TIMESTAMPTZ,
    created_by TEXT NOT NULL,
    create_time TIMESTAMPTZ NOT NULL,
    updated_by TEXT NOT NULL,
    update_time TIMESTAMPTZ NOT NULL,
    UNIQUE (owner, repo_name)
);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn record_from_row(row: RepositoryRow) -> StdResult<RepositoryRecord> {
    let (
        id,
        owner,
        repo_name,
        full_name,
        description,
        clone_url,
        stars,
        created_at,
        created_by,
        create_time,
        updated_by,
        update_time,
    ) = row;
    let key = RepositoryKey::try_new(&owner, &repo_name)?;
    let stars = u32::try_from(stars).with_context(|| format!("Invalid stars for {key}"))?;

    Ok(RepositoryRecord::new(
        id,
        RepositoryDetails::new(&key, &full_name, description, clone_url, stars, created_at),
        AuditStamps {
            created_by,
            create_time,
            updated_by,
            update_time,
        },
    ))
}

#[async_trait::async_trait]
impl RepositoryPersister for PostgresSqlPersister {
    async fn save(&self, details: &RepositoryDetails, actor: &str) -> StdResult<RepositoryRecord> {
        let stars = i32::try_from(**details.stars())
            .with_context(|| format!("Too many stars for {details}"))?;
        let (id, created_by, create_time, updated_by, update_time, inserted): (
            i64,
            String,
            DateTime<Utc>,
            String,
            DateTime<Utc>,
            bool,
        ) = sqlx::query_as(
            r#"
INSERT INTO github.repository_details (owner, repo_name, full_name, description, clone_url, stars, created_at, created_by, create_time, updated_by, update_time)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $8, $9)
ON CONFLICT (owner, repo_name) DO UPDATE
SET full_name = EXCLUDED.full_name,
    description = EXCLUDED.description,
    clone_url = EXCLUDED.clone_url,
    stars = EXCLUDED.stars,
    created_at = EXCLUDED.created_at,
    updated_by = EXCLUDED.updated_by,
    update_time = EXCLUDED.update_time
RETURNING id, created_by, create_time, updated_by, update_time, xmax = 0 AS inserted;
            "#,
        )
        .bind(details.owner().as_str())
        .bind(details.repo_name().as_str())
        .bind(details.full_name())
        .bind(details.description())
        .bind(details.clone_url())
        .bind(stars)
        .bind(details.created_at().copied())
        .bind(actor)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        let record = RepositoryRecord::new(
            id,
            details.to_owned(),
            AuditStamps {
                created_by,
                create_time,
                updated_by,
                update_time,
            },
        );
        if inserted {
            info!("Inserted {record}");
        } else {
            info!("Updated {record}");
        }

        Ok(record)
    }

    async fn find_by_owner_and_name(
        &self,
        key: &RepositoryKey,
    ) -> StdResult<Option<RepositoryRecord>> {
        let row: Option<RepositoryRow> = sqlx::query_as(
            r#"
SELECT id, owner, repo_name, full_name, description, clone_url, stars, created_at, created_by, create_time, updated_by, update_time
FROM github.repository_details
WHERE owner = $1 AND repo_name = $2;
            "#,
        )
        .bind(key.owner().as_str())
        .bind(key.name().as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(record_from_row).transpose()
    }
}
