//! Deterministic demo dataset used by `copilot-dash seed`.
//!
//! Values follow a weekly rhythm (quieter weekends) plus a slow upward
//! drift, and every generated row satisfies the ingestion invariants:
//! per-day chat-mode requests sum to the day's `chat_requests`, and
//! `agent_requests` equals the agent-mode requests.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::types::{
    AgentAdoption, ChatMode, ChatModeRequest, DailyUsage, ModelUsage, UsageBundle, WeeklyUsage,
};

const MODELS: &[(&str, i64)] = &[
    ("gpt-4o", 40),
    ("claude-sonnet-4", 30),
    ("gpt-4.1", 15),
    ("gemini-2.5-pro", 10),
    ("o3-mini", 5),
];

/// Build `days` days of data ending at (and including) `end`.
pub fn generate(end: NaiveDate, days: u32) -> UsageBundle {
    let mut bundle = UsageBundle::default();
    if days == 0 {
        return bundle;
    }
    let start = end - Duration::days(i64::from(days) - 1);

    for offset in 0..i64::from(days) {
        let date = start + Duration::days(offset);
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        let base = 120 + offset * 2 + (offset * 7) % 11;
        let active_users = if weekend { base / 3 } else { base };

        let total_suggestions = active_users * 45 + (offset * 13) % 50;
        let accepted_suggestions = total_suggestions * (28 + offset % 7) / 100;

        let modes = [
            (ChatMode::Edit, active_users * 3 / 2),
            (ChatMode::Ask, active_users * 2),
            (ChatMode::Agent, active_users * (5 + offset / 4) / 10),
            (ChatMode::Custom, active_users / 8),
            (ChatMode::Inline, active_users),
        ];
        let chat_requests: i64 = modes.iter().map(|(_, n)| n).sum();
        let agent_requests = modes[2].1;

        bundle.daily_usage.push(DailyUsage {
            date,
            active_users,
            total_suggestions,
            accepted_suggestions,
            chat_requests,
            agent_requests,
        });

        bundle
            .chat_mode_requests
            .extend(modes.iter().map(|(mode, requests)| ChatModeRequest {
                date,
                mode: *mode,
                requests: *requests,
            }));

        // Model shares add up to 100, so the sum only drifts from
        // chat_requests by integer rounding.
        bundle
            .model_usage
            .extend(MODELS.iter().map(|(name, share)| ModelUsage {
                date,
                model_name: name.to_string(),
                requests: chat_requests * share / 100,
            }));

        let agent_users = (active_users * (15 + offset) / 100).min(active_users);
        bundle.agent_adoption.push(AgentAdoption {
            date,
            total_active_users: active_users,
            agent_users,
        });
    }

    bundle.weekly_usage = roll_up_weeks(&bundle.daily_usage);
    bundle
}

/// Sum daily rows into ISO weeks. Active users take the week's peak day.
pub fn roll_up_weeks(daily: &[DailyUsage]) -> Vec<WeeklyUsage> {
    let mut weeks: Vec<WeeklyUsage> = Vec::new();
    for row in daily {
        let week_start =
            row.date - Duration::days(i64::from(row.date.weekday().num_days_from_monday()));
        match weeks.iter_mut().find(|w| w.week_start == week_start) {
            Some(week) => {
                week.active_users = week.active_users.max(row.active_users);
                week.total_suggestions += row.total_suggestions;
                week.accepted_suggestions += row.accepted_suggestions;
                week.chat_requests += row.chat_requests;
                week.agent_requests += row.agent_requests;
            }
            None => weeks.push(WeeklyUsage {
                week_start,
                active_users: row.active_users,
                total_suggestions: row.total_suggestions,
                accepted_suggestions: row.accepted_suggestions,
                chat_requests: row.chat_requests,
                agent_requests: row.agent_requests,
            }),
        }
    }
    weeks.sort_by_key(|w| w.week_start);
    weeks
}
