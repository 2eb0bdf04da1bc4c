use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use livewatch_common::models::{ManualOverride, TrackedChannel};
use livewatch_common::traits::repository_traits::ContentStore;

use crate::Error;

/// Reads the roster and override tables created by `migrations/`.
#[derive(Clone)]
pub struct PostgresContentStore {
    pub pool: Pool<Postgres>,
}

impl PostgresContentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PostgresContentStore {
    async fn list_enabled_tracked_channels(&self) -> Result<Vec<TrackedChannel>, Error> {
        let rows = sqlx::query_as::<_, TrackedChannel>(
            r#"
            SELECT
                id,
                name,
                platform,
                channel_id,
                channel_url,
                is_owner,
                priority,
                enabled
            FROM tracked_channels
            WHERE enabled = TRUE
            ORDER BY created_at, id
            "#,
        )
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_manual_override(&self) -> Result<Option<ManualOverride>, Error> {
        let row = sqlx::query_as::<_, ManualOverride>(
            r#"
            SELECT
                is_live,
                platform,
                stream_url,
                stream_title,
                thumbnail
            FROM manual_override
            WHERE override_id = 1
            "#,
        )
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
