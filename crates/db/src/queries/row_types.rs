// crates/db/src/queries/row_types.rs
// Raw SQL tuples and their conversion into domain types.

use chrono::NaiveDate;
use copilot_dash_core::{
    AgentAdoption, ChatMode, ChatModeRequest, DailyUsage, ModelUsage, WeeklyUsage,
};

use crate::DbResult;

/// (date, active_users, total_suggestions, accepted_suggestions, chat_requests, agent_requests)
pub(crate) type UsageRow = (NaiveDate, i64, i64, i64, i64, i64);

/// (date, mode, requests)
pub(crate) type ChatModeRow = (NaiveDate, String, i64);

/// (date, model_name, requests)
pub(crate) type ModelRow = (NaiveDate, String, i64);

/// (date, total_active_users, agent_users)
pub(crate) type AdoptionRow = (NaiveDate, i64, i64);

pub(crate) fn daily_from_row(row: UsageRow) -> DailyUsage {
    let (date, active_users, total_suggestions, accepted_suggestions, chat_requests, agent_requests) =
        row;
    DailyUsage {
        date,
        active_users,
        total_suggestions,
        accepted_suggestions,
        chat_requests,
        agent_requests,
    }
}

pub(crate) fn weekly_from_row(row: UsageRow) -> WeeklyUsage {
    let (
        week_start,
        active_users,
        total_suggestions,
        accepted_suggestions,
        chat_requests,
        agent_requests,
    ) = row;
    WeeklyUsage {
        week_start,
        active_users,
        total_suggestions,
        accepted_suggestions,
        chat_requests,
        agent_requests,
    }
}

pub(crate) fn chat_mode_from_row((date, mode, requests): ChatModeRow) -> DbResult<ChatModeRequest> {
    Ok(ChatModeRequest {
        date,
        mode: mode.parse::<ChatMode>()?,
        requests,
    })
}

pub(crate) fn model_from_row((date, model_name, requests): ModelRow) -> ModelUsage {
    ModelUsage {
        date,
        model_name,
        requests,
    }
}

pub(crate) fn adoption_from_row((date, total_active_users, agent_users): AdoptionRow) -> AgentAdoption {
    AgentAdoption {
        date,
        total_active_users,
        agent_users,
    }
}
