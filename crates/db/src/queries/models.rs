// crates/db/src/queries/models.rs
// Per-model request reads.

use copilot_dash_core::{ModelUsage, Timeframe};

use super::row_types::{model_from_row, ModelRow};
use super::UsageTable;
use crate::{Database, DbResult};

impl Database {
    /// Model rows in the trailing `timeframe` window, ordered by date then model.
    pub async fn get_model_usage(&self, timeframe: Timeframe) -> DbResult<Vec<ModelUsage>> {
        let Some(window) = self.window_for(UsageTable::ModelUsage, timeframe).await? else {
            return Ok(Vec::new());
        };

        let rows: Vec<ModelRow> = sqlx::query_as(
            r#"
            SELECT date, model_name, requests
            FROM model_usage
            WHERE date BETWEEN ?1 AND ?2
            ORDER BY date ASC, model_name ASC
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(model_from_row).collect())
    }

    /// Every model name ever ingested, alphabetical.
    pub async fn list_model_names(&self) -> DbResult<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT model_name FROM model_usage ORDER BY model_name ASC")
                .fetch_all(self.pool())
                .await?;
        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}
