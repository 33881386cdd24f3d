// crates/db/src/queries/adoption.rs
// Agent adoption reads.

use copilot_dash_core::{AgentAdoption, Timeframe};

use super::row_types::{adoption_from_row, AdoptionRow};
use super::UsageTable;
use crate::{Database, DbResult};

impl Database {
    /// Agent adoption rows in the trailing `timeframe` window, oldest first.
    pub async fn get_agent_adoption(&self, timeframe: Timeframe) -> DbResult<Vec<AgentAdoption>> {
        let Some(window) = self
            .window_for(UsageTable::AgentAdoption, timeframe)
            .await?
        else {
            return Ok(Vec::new());
        };

        let rows: Vec<AdoptionRow> = sqlx::query_as(
            r#"
            SELECT date, total_active_users, agent_users
            FROM agent_adoption
            WHERE date BETWEEN ?1 AND ?2
            ORDER BY date ASC
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(adoption_from_row).collect())
    }
}
