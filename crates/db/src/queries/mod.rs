// crates/db/src/queries/mod.rs
// Windowed reads over the usage tables.

pub(crate) mod row_types;
mod adoption;
mod chat_modes;
mod dashboard;
mod models;
mod usage;

use chrono::NaiveDate;
use copilot_dash_core::{DateWindow, Timeframe};

use crate::{Database, DbResult};

/// The stored tables, each keyed by a date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageTable {
    DailyUsage,
    WeeklyUsage,
    ChatModeRequests,
    ModelUsage,
    AgentAdoption,
}

impl UsageTable {
    pub const ALL: [UsageTable; 5] = [
        UsageTable::DailyUsage,
        UsageTable::WeeklyUsage,
        UsageTable::ChatModeRequests,
        UsageTable::ModelUsage,
        UsageTable::AgentAdoption,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UsageTable::DailyUsage => "daily_usage",
            UsageTable::WeeklyUsage => "weekly_usage",
            UsageTable::ChatModeRequests => "chat_mode_requests",
            UsageTable::ModelUsage => "model_usage",
            UsageTable::AgentAdoption => "agent_adoption",
        }
    }

    fn date_column(self) -> &'static str {
        match self {
            UsageTable::WeeklyUsage => "week_start",
            _ => "date",
        }
    }
}

impl Database {
    /// Most recent date stored in `table`, or `None` when it is empty.
    pub async fn latest_date(&self, table: UsageTable) -> DbResult<Option<NaiveDate>> {
        let sql = format!(
            "SELECT MAX({}) FROM {}",
            table.date_column(),
            table.name()
        );
        let (latest,): (Option<NaiveDate>,) = sqlx::query_as(&sql).fetch_one(self.pool()).await?;
        Ok(latest)
    }

    /// The trailing window for `table`, anchored to its most recent date.
    pub async fn window_for(
        &self,
        table: UsageTable,
        timeframe: Timeframe,
    ) -> DbResult<Option<DateWindow>> {
        let latest = self.latest_date(table).await?;
        Ok(latest.map(|date| match table {
            UsageTable::WeeklyUsage => timeframe.week_window_ending(date),
            _ => timeframe.window_ending(date),
        }))
    }

    /// Row count per table, for startup logging and the import summary.
    pub async fn table_counts(&self) -> DbResult<Vec<(UsageTable, i64)>> {
        let mut counts = Vec::with_capacity(UsageTable::ALL.len());
        for table in UsageTable::ALL {
            let sql = format!("SELECT COUNT(*) FROM {}", table.name());
            let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(self.pool()).await?;
            counts.push((table, count));
        }
        Ok(counts)
    }
}
