// crates/db/src/queries/chat_modes.rs
// Chat-mode request reads.

use copilot_dash_core::{ChatModeRequest, Timeframe};

use super::row_types::{chat_mode_from_row, ChatModeRow};
use super::UsageTable;
use crate::{Database, DbResult};

impl Database {
    /// Chat-mode rows in the trailing `timeframe` window, ordered by date then mode.
    pub async fn get_chat_mode_requests(
        &self,
        timeframe: Timeframe,
    ) -> DbResult<Vec<ChatModeRequest>> {
        let Some(window) = self
            .window_for(UsageTable::ChatModeRequests, timeframe)
            .await?
        else {
            return Ok(Vec::new());
        };

        let rows: Vec<ChatModeRow> = sqlx::query_as(
            r#"
            SELECT date, mode, requests
            FROM chat_mode_requests
            WHERE date BETWEEN ?1 AND ?2
            ORDER BY date ASC, mode ASC
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter().map(chat_mode_from_row).collect()
    }
}
