// crates/core/src/types.rs
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::CoreError;
use crate::timeframe::Timeframe;

// ============================================================================
// Chat modes
// ============================================================================

/// Category of a Copilot chat interaction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, ToSchema,
)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    Edit,
    Ask,
    Agent,
    Custom,
    Inline,
}

impl ChatMode {
    pub const ALL: [ChatMode; 5] = [
        ChatMode::Edit,
        ChatMode::Ask,
        ChatMode::Agent,
        ChatMode::Custom,
        ChatMode::Inline,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChatMode::Edit => "edit",
            ChatMode::Ask => "ask",
            ChatMode::Agent => "agent",
            ChatMode::Custom => "custom",
            ChatMode::Inline => "inline",
        }
    }
}

impl FromStr for ChatMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "edit" => Ok(ChatMode::Edit),
            "ask" => Ok(ChatMode::Ask),
            "agent" => Ok(ChatMode::Agent),
            "custom" => Ok(ChatMode::Custom),
            "inline" => Ok(ChatMode::Inline),
            other => Err(CoreError::UnknownChatMode(other.to_string())),
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Stored entities
// ============================================================================

/// One calendar day of IDE usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DailyUsage {
    pub date: NaiveDate,
    #[ts(type = "number")]
    pub active_users: i64,
    #[ts(type = "number")]
    pub total_suggestions: i64,
    #[ts(type = "number")]
    pub accepted_suggestions: i64,
    #[ts(type = "number")]
    pub chat_requests: i64,
    #[ts(type = "number")]
    pub agent_requests: i64,
}

/// One ISO week of IDE usage. `week_start` is always a Monday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyUsage {
    pub week_start: NaiveDate,
    #[ts(type = "number")]
    pub active_users: i64,
    #[ts(type = "number")]
    pub total_suggestions: i64,
    #[ts(type = "number")]
    pub accepted_suggestions: i64,
    #[ts(type = "number")]
    pub chat_requests: i64,
    #[ts(type = "number")]
    pub agent_requests: i64,
}

/// Chat requests for a single mode on a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ChatModeRequest {
    pub date: NaiveDate,
    pub mode: ChatMode,
    #[ts(type = "number")]
    pub requests: i64,
}

/// Requests served by a single model on a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsage {
    pub date: NaiveDate,
    pub model_name: String,
    #[ts(type = "number")]
    pub requests: i64,
}

/// Agent feature uptake on a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AgentAdoption {
    pub date: NaiveDate,
    #[ts(type = "number")]
    pub total_active_users: i64,
    #[ts(type = "number")]
    pub agent_users: i64,
}

fn check_non_negative(
    table: &'static str,
    date: NaiveDate,
    fields: &[(&str, i64)],
) -> Result<(), CoreError> {
    for (name, value) in fields {
        if *value < 0 {
            return Err(CoreError::invalid_row(
                table,
                date,
                format!("{name} must be >= 0 (got {value})"),
            ));
        }
    }
    Ok(())
}

impl DailyUsage {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_non_negative(
            "daily_usage",
            self.date,
            &[
                ("active_users", self.active_users),
                ("total_suggestions", self.total_suggestions),
                ("accepted_suggestions", self.accepted_suggestions),
                ("chat_requests", self.chat_requests),
                ("agent_requests", self.agent_requests),
            ],
        )?;
        if self.accepted_suggestions > self.total_suggestions {
            return Err(CoreError::invalid_row(
                "daily_usage",
                self.date,
                "accepted_suggestions exceeds total_suggestions",
            ));
        }
        Ok(())
    }
}

impl WeeklyUsage {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_non_negative(
            "weekly_usage",
            self.week_start,
            &[
                ("active_users", self.active_users),
                ("total_suggestions", self.total_suggestions),
                ("accepted_suggestions", self.accepted_suggestions),
                ("chat_requests", self.chat_requests),
                ("agent_requests", self.agent_requests),
            ],
        )?;
        if self.accepted_suggestions > self.total_suggestions {
            return Err(CoreError::invalid_row(
                "weekly_usage",
                self.week_start,
                "accepted_suggestions exceeds total_suggestions",
            ));
        }
        if chrono::Datelike::weekday(&self.week_start) != chrono::Weekday::Mon {
            return Err(CoreError::invalid_row(
                "weekly_usage",
                self.week_start,
                "week_start must be a Monday",
            ));
        }
        Ok(())
    }
}

impl ChatModeRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_non_negative("chat_mode_requests", self.date, &[("requests", self.requests)])
    }
}

impl ModelUsage {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.model_name.trim().is_empty() {
            return Err(CoreError::invalid_row(
                "model_usage",
                self.date,
                "model_name must not be empty",
            ));
        }
        check_non_negative("model_usage", self.date, &[("requests", self.requests)])
    }
}

impl AgentAdoption {
    pub fn validate(&self) -> Result<(), CoreError> {
        check_non_negative(
            "agent_adoption",
            self.date,
            &[
                ("total_active_users", self.total_active_users),
                ("agent_users", self.agent_users),
            ],
        )?;
        if self.agent_users > self.total_active_users {
            return Err(CoreError::invalid_row(
                "agent_adoption",
                self.date,
                "agent_users exceeds total_active_users",
            ));
        }
        Ok(())
    }
}

/// A batch of rows handed over by an ingestion job. Every table is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UsageBundle {
    pub daily_usage: Vec<DailyUsage>,
    pub weekly_usage: Vec<WeeklyUsage>,
    pub chat_mode_requests: Vec<ChatModeRequest>,
    pub model_usage: Vec<ModelUsage>,
    pub agent_adoption: Vec<AgentAdoption>,
}

impl UsageBundle {
    /// Check every row's invariants; stops at the first violation.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.daily_usage.iter().try_for_each(DailyUsage::validate)?;
        self.weekly_usage.iter().try_for_each(WeeklyUsage::validate)?;
        self.chat_mode_requests
            .iter()
            .try_for_each(ChatModeRequest::validate)?;
        self.model_usage.iter().try_for_each(ModelUsage::validate)?;
        self.agent_adoption
            .iter()
            .try_for_each(AgentAdoption::validate)?;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.daily_usage.len()
            + self.weekly_usage.len()
            + self.chat_mode_requests.len()
            + self.model_usage.len()
            + self.agent_adoption.len()
    }
}

// ============================================================================
// Response payloads
// ============================================================================

/// Agent adoption over a window: summed counts and their ratio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AgentAdoptionStats {
    /// agent_users / total_active_users × 100, one decimal, within [0, 100].
    pub percentage: f64,
    #[ts(type = "number")]
    pub agent_users: i64,
    #[ts(type = "number")]
    pub total_active_users: i64,
}

/// Summed requests for one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ModelUsageTotal {
    pub name: String,
    #[ts(type = "number")]
    pub requests: i64,
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub timeframe: Timeframe,
    /// Active users on the latest day of the window.
    #[ts(type = "number")]
    pub ide_active_users: i64,
    /// Mean daily active users over the window, one decimal.
    pub average_active_users: f64,
    pub agent_adoption: AgentAdoptionStats,
    pub most_used_chat_model: Option<ModelUsageTotal>,
    /// accepted / total suggestions × 100, one decimal.
    pub acceptance_rate: f64,
    pub window_start: Option<NaiveDate>,
    pub window_end: Option<NaiveDate>,
}

/// A single point on a line/bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
pub struct ChartDataPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Per-mode chat requests for one day, for stacked charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
pub struct StackedChartDataPoint {
    pub date: NaiveDate,
    #[ts(type = "number")]
    pub edit: i64,
    #[ts(type = "number")]
    pub ask: i64,
    #[ts(type = "number")]
    pub agent: i64,
    #[ts(type = "number")]
    pub custom: i64,
    #[ts(type = "number")]
    pub inline: i64,
}

impl StackedChartDataPoint {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            edit: 0,
            ask: 0,
            agent: 0,
            custom: 0,
            inline: 0,
        }
    }

    pub fn add(&mut self, mode: ChatMode, requests: i64) {
        let slot = match mode {
            ChatMode::Edit => &mut self.edit,
            ChatMode::Ask => &mut self.ask,
            ChatMode::Agent => &mut self.agent,
            ChatMode::Custom => &mut self.custom,
            ChatMode::Inline => &mut self.inline,
        };
        *slot = slot.saturating_add(requests);
    }

    pub fn get(&self, mode: ChatMode) -> i64 {
        match mode {
            ChatMode::Edit => self.edit,
            ChatMode::Ask => self.ask,
            ChatMode::Agent => self.agent,
            ChatMode::Custom => self.custom,
            ChatMode::Inline => self.inline,
        }
    }

    pub fn total(&self) -> i64 {
        [self.edit, self.ask, self.agent, self.custom, self.inline]
            .into_iter()
            .fold(0, i64::saturating_add)
    }
}

/// Chat requests per mode summed over a window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
pub struct ChatModeTotals {
    #[ts(type = "number")]
    pub edit: i64,
    #[ts(type = "number")]
    pub ask: i64,
    #[ts(type = "number")]
    pub agent: i64,
    #[ts(type = "number")]
    pub custom: i64,
    #[ts(type = "number")]
    pub inline: i64,
    #[ts(type = "number")]
    pub total: i64,
}

impl ChatModeTotals {
    /// The mode with the most requests; ties resolve to the earlier mode in `ChatMode::ALL`.
    pub fn top_mode(&self) -> Option<(ChatMode, i64)> {
        if self.total == 0 {
            return None;
        }
        let counts = [self.edit, self.ask, self.agent, self.custom, self.inline];
        ChatMode::ALL
            .into_iter()
            .zip(counts)
            .fold(None, |best: Option<(ChatMode, i64)>, (mode, n)| match best {
                Some((_, best_n)) if best_n >= n => best,
                _ => Some((mode, n)),
            })
    }
}

/// Metrics that can be plotted with `series(metric, timeframe)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub enum UsageMetric {
    ActiveUsers,
    TotalSuggestions,
    AcceptedSuggestions,
    AcceptanceRate,
    ChatRequests,
    AgentRequests,
    AgentUsers,
    AgentAdoption,
}

/// Which table a metric is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricSource {
    DailyUsage,
    AgentAdoption,
}

impl UsageMetric {
    pub const ALL: [UsageMetric; 8] = [
        UsageMetric::ActiveUsers,
        UsageMetric::TotalSuggestions,
        UsageMetric::AcceptedSuggestions,
        UsageMetric::AcceptanceRate,
        UsageMetric::ChatRequests,
        UsageMetric::AgentRequests,
        UsageMetric::AgentUsers,
        UsageMetric::AgentAdoption,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UsageMetric::ActiveUsers => "activeUsers",
            UsageMetric::TotalSuggestions => "totalSuggestions",
            UsageMetric::AcceptedSuggestions => "acceptedSuggestions",
            UsageMetric::AcceptanceRate => "acceptanceRate",
            UsageMetric::ChatRequests => "chatRequests",
            UsageMetric::AgentRequests => "agentRequests",
            UsageMetric::AgentUsers => "agentUsers",
            UsageMetric::AgentAdoption => "agentAdoption",
        }
    }

    pub fn source(self) -> MetricSource {
        match self {
            UsageMetric::AgentUsers | UsageMetric::AgentAdoption => MetricSource::AgentAdoption,
            _ => MetricSource::DailyUsage,
        }
    }
}

impl FromStr for UsageMetric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UsageMetric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| CoreError::UnknownMetric(s.to_string()))
    }
}

impl fmt::Display for UsageMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, day).unwrap()
    }

    #[test]
    fn test_chat_mode_round_trips_through_str() {
        for mode in ChatMode::ALL {
            assert_eq!(mode.as_str().parse::<ChatMode>().unwrap(), mode);
        }
        assert!("voice".parse::<ChatMode>().is_err());
    }

    #[test]
    fn test_daily_usage_rejects_accepted_above_total() {
        let row = DailyUsage {
            date: d(1),
            active_users: 5,
            total_suggestions: 10,
            accepted_suggestions: 11,
            chat_requests: 0,
            agent_requests: 0,
        };
        let err = row.validate().unwrap_err();
        assert!(err.to_string().contains("accepted_suggestions exceeds"));
    }

    #[test]
    fn test_agent_adoption_rejects_agent_users_above_total() {
        let row = AgentAdoption {
            date: d(1),
            total_active_users: 3,
            agent_users: 4,
        };
        assert!(row.validate().is_err());

        let ok = AgentAdoption {
            date: d(1),
            total_active_users: 4,
            agent_users: 4,
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_negative_counts_rejected() {
        let row = ModelUsage {
            date: d(2),
            model_name: "gpt-4o".to_string(),
            requests: -1,
        };
        assert!(row.validate().unwrap_err().to_string().contains("requests must be >= 0"));
    }

    #[test]
    fn test_weekly_usage_requires_monday() {
        // 2024-04-02 is a Tuesday
        let row = WeeklyUsage {
            week_start: d(2),
            active_users: 1,
            total_suggestions: 1,
            accepted_suggestions: 1,
            chat_requests: 0,
            agent_requests: 0,
        };
        assert!(row.validate().is_err());
        let monday = WeeklyUsage {
            week_start: d(1),
            ..row
        };
        assert!(monday.validate().is_ok());
    }

    #[test]
    fn test_bundle_deserializes_with_missing_tables() {
        let bundle: UsageBundle = serde_json::from_str(
            r#"{"modelUsage":[{"date":"2024-04-01","modelName":"gpt-4o","requests":3}]}"#,
        )
        .unwrap();
        assert_eq!(bundle.row_count(), 1);
        assert!(bundle.daily_usage.is_empty());
        assert!(bundle.validate().is_ok());
    }

    #[test]
    fn test_metric_parsing() {
        assert_eq!(
            "acceptanceRate".parse::<UsageMetric>().unwrap(),
            UsageMetric::AcceptanceRate
        );
        assert_eq!(
            "tokens".parse::<UsageMetric>(),
            Err(CoreError::UnknownMetric("tokens".to_string()))
        );
        assert_eq!(UsageMetric::AgentUsers.source(), MetricSource::AgentAdoption);
        assert_eq!(UsageMetric::ChatRequests.source(), MetricSource::DailyUsage);
    }

    #[test]
    fn test_stacked_point_accumulates_modes() {
        let mut point = StackedChartDataPoint::empty(d(3));
        point.add(ChatMode::Ask, 4);
        point.add(ChatMode::Ask, 1);
        point.add(ChatMode::Inline, 2);
        assert_eq!(point.get(ChatMode::Ask), 5);
        assert_eq!(point.total(), 7);
    }

    #[test]
    fn test_top_mode_tie_prefers_declaration_order() {
        let totals = ChatModeTotals {
            edit: 3,
            ask: 5,
            agent: 5,
            custom: 0,
            inline: 1,
            total: 14,
        };
        assert_eq!(totals.top_mode(), Some((ChatMode::Ask, 5)));
        assert_eq!(ChatModeTotals::default().top_mode(), None);
    }
}
