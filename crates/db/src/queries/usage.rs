// crates/db/src/queries/usage.rs
// Daily and weekly usage reads.

use copilot_dash_core::{DailyUsage, DateWindow, Timeframe, WeeklyUsage};

use super::row_types::{daily_from_row, weekly_from_row, UsageRow};
use super::UsageTable;
use crate::{Database, DbResult};

impl Database {
    /// Daily rows within `window`, oldest first.
    pub async fn get_daily_usage_between(&self, window: DateWindow) -> DbResult<Vec<DailyUsage>> {
        let rows: Vec<UsageRow> = sqlx::query_as(
            r#"
            SELECT date, active_users, total_suggestions, accepted_suggestions,
                   chat_requests, agent_requests
            FROM daily_usage
            WHERE date BETWEEN ?1 AND ?2
            ORDER BY date ASC
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(daily_from_row).collect())
    }

    /// Daily rows in the trailing `timeframe` window. Empty when no data exists.
    pub async fn get_daily_usage(&self, timeframe: Timeframe) -> DbResult<Vec<DailyUsage>> {
        match self.window_for(UsageTable::DailyUsage, timeframe).await? {
            Some(window) => self.get_daily_usage_between(window).await,
            None => Ok(Vec::new()),
        }
    }

    /// Weekly rows covering `timeframe` (7 → 1 week, 14 → 2, 28 → 4), oldest first.
    pub async fn get_weekly_usage(&self, timeframe: Timeframe) -> DbResult<Vec<WeeklyUsage>> {
        let Some(window) = self.window_for(UsageTable::WeeklyUsage, timeframe).await? else {
            return Ok(Vec::new());
        };

        let rows: Vec<UsageRow> = sqlx::query_as(
            r#"
            SELECT week_start, active_users, total_suggestions, accepted_suggestions,
                   chat_requests, agent_requests
            FROM weekly_usage
            WHERE week_start BETWEEN ?1 AND ?2
            ORDER BY week_start ASC
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(self.pool())
        .await?;

        Ok(rows.into_iter().map(weekly_from_row).collect())
    }
}
