// crates/db/src/ingest.rs
// Insert-only ingestion of usage bundles.

use chrono::NaiveDate;
use copilot_dash_core::{demo, UsageBundle};
use serde::Serialize;
use tracing::info;

use crate::{Database, DbResult, UsageTable};

/// Rows inserted and skipped (already present) for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableIngest {
    pub inserted: u64,
    pub skipped: u64,
}

impl TableIngest {
    fn record(&mut self, rows_affected: u64) {
        if rows_affected > 0 {
            self.inserted += rows_affected;
        } else {
            self.skipped += 1;
        }
    }
}

/// Outcome of one `ingest_bundle` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub daily_usage: TableIngest,
    pub weekly_usage: TableIngest,
    pub chat_mode_requests: TableIngest,
    pub model_usage: TableIngest,
    pub agent_adoption: TableIngest,
}

impl IngestReport {
    pub fn table(&self, table: UsageTable) -> TableIngest {
        match table {
            UsageTable::DailyUsage => self.daily_usage,
            UsageTable::WeeklyUsage => self.weekly_usage,
            UsageTable::ChatModeRequests => self.chat_mode_requests,
            UsageTable::ModelUsage => self.model_usage,
            UsageTable::AgentAdoption => self.agent_adoption,
        }
    }

    pub fn inserted(&self) -> u64 {
        UsageTable::ALL.iter().map(|t| self.table(*t).inserted).sum()
    }

    pub fn skipped(&self) -> u64 {
        UsageTable::ALL.iter().map(|t| self.table(*t).skipped).sum()
    }
}

impl Database {
    /// Validate and insert every row of `bundle` in a single transaction.
    ///
    /// Stored rows are never modified: a row whose key already exists is
    /// counted as skipped. Any invalid row rejects the whole bundle before
    /// anything is written.
    pub async fn ingest_bundle(&self, bundle: &UsageBundle) -> DbResult<IngestReport> {
        bundle.validate()?;

        let mut report = IngestReport::default();
        let mut tx = self.pool().begin().await?;

        for row in &bundle.daily_usage {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO daily_usage
                    (date, active_users, total_suggestions, accepted_suggestions,
                     chat_requests, agent_requests)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(row.date)
            .bind(row.active_users)
            .bind(row.total_suggestions)
            .bind(row.accepted_suggestions)
            .bind(row.chat_requests)
            .bind(row.agent_requests)
            .execute(&mut *tx)
            .await?;
            report.daily_usage.record(result.rows_affected());
        }

        for row in &bundle.weekly_usage {
            let result = sqlx::query(
                r#"
                INSERT OR IGNORE INTO weekly_usage
                    (week_start, active_users, total_suggestions, accepted_suggestions,
                     chat_requests, agent_requests)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(row.week_start)
            .bind(row.active_users)
            .bind(row.total_suggestions)
            .bind(row.accepted_suggestions)
            .bind(row.chat_requests)
            .bind(row.agent_requests)
            .execute(&mut *tx)
            .await?;
            report.weekly_usage.record(result.rows_affected());
        }

        for row in &bundle.chat_mode_requests {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO chat_mode_requests (date, mode, requests) VALUES (?1, ?2, ?3)",
            )
            .bind(row.date)
            .bind(row.mode.as_str())
            .bind(row.requests)
            .execute(&mut *tx)
            .await?;
            report.chat_mode_requests.record(result.rows_affected());
        }

        for row in &bundle.model_usage {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO model_usage (date, model_name, requests) VALUES (?1, ?2, ?3)",
            )
            .bind(row.date)
            .bind(&row.model_name)
            .bind(row.requests)
            .execute(&mut *tx)
            .await?;
            report.model_usage.record(result.rows_affected());
        }

        for row in &bundle.agent_adoption {
            let result = sqlx::query(
                "INSERT OR IGNORE INTO agent_adoption (date, total_active_users, agent_users) VALUES (?1, ?2, ?3)",
            )
            .bind(row.date)
            .bind(row.total_active_users)
            .bind(row.agent_users)
            .execute(&mut *tx)
            .await?;
            report.agent_adoption.record(result.rows_affected());
        }

        tx.commit().await?;

        info!(
            inserted = report.inserted(),
            skipped = report.skipped(),
            "ingested usage bundle"
        );
        Ok(report)
    }

    /// Generate `days` days of demo data ending at `end` and ingest it.
    pub async fn seed_demo(&self, end: NaiveDate, days: u32) -> DbResult<IngestReport> {
        let bundle = demo::generate(end, days);
        self.ingest_bundle(&bundle).await
    }
}
