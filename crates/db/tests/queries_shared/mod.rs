//! Fixture builders shared by the query integration tests.
#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use copilot_dash_core::{
    AgentAdoption, ChatMode, ChatModeRequest, DailyUsage, ModelUsage, UsageBundle,
};
use copilot_dash_db::Database;

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Consecutive days ending at `end`, oldest first.
pub fn days_ending(end: NaiveDate, n: i64) -> Vec<NaiveDate> {
    (0..n).rev().map(|back| end - Duration::days(back)).collect()
}

pub fn make_daily(date: NaiveDate, active_users: i64) -> DailyUsage {
    DailyUsage {
        date,
        active_users,
        total_suggestions: active_users * 10,
        accepted_suggestions: active_users * 3,
        chat_requests: active_users * 2,
        agent_requests: active_users / 2,
    }
}

pub fn make_adoption(date: NaiveDate, total_active_users: i64, agent_users: i64) -> AgentAdoption {
    AgentAdoption {
        date,
        total_active_users,
        agent_users,
    }
}

pub fn make_model(date: NaiveDate, name: &str, requests: i64) -> ModelUsage {
    ModelUsage {
        date,
        model_name: name.to_string(),
        requests,
    }
}

pub fn make_mode(date: NaiveDate, mode: ChatMode, requests: i64) -> ChatModeRequest {
    ChatModeRequest {
        date,
        mode,
        requests,
    }
}

/// In-memory database loaded with `bundle`.
pub async fn db_with(bundle: UsageBundle) -> Database {
    let db = Database::new_in_memory().await.unwrap();
    db.ingest_bundle(&bundle).await.unwrap();
    db
}
