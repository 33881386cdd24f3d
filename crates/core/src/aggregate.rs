//! Window reductions computed on read (nothing here touches storage).
//!
//! Callers hand in rows that already belong to one trailing window; every
//! function is deterministic in its input order and tolerates empty slices
//! by returning zeroed results.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::timeframe::Timeframe;
use crate::types::{
    AgentAdoption, AgentAdoptionStats, ChartDataPoint, ChatModeRequest, ChatModeTotals,
    DailyUsage, DashboardSummary, ModelUsage, ModelUsageTotal, StackedChartDataPoint, UsageMetric,
};

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Sum of counts; saturates at `i64::MAX` instead of overflowing.
pub fn saturating_sum(values: impl IntoIterator<Item = i64>) -> i64 {
    values.into_iter().fold(0, i64::saturating_add)
}

/// `numerator / denominator × 100`, one decimal. Returns 0 when `denominator` is 0.
pub fn percentage(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    round1(numerator as f64 / denominator as f64 * 100.0)
}

/// Active users on the most recent day in `rows`.
pub fn latest_active_users(rows: &[DailyUsage]) -> i64 {
    rows.iter()
        .max_by_key(|r| r.date)
        .map(|r| r.active_users)
        .unwrap_or(0)
}

/// Mean daily active users, one decimal.
pub fn average_active_users(rows: &[DailyUsage]) -> f64 {
    if rows.is_empty() {
        return 0.0;
    }
    let sum = saturating_sum(rows.iter().map(|r| r.active_users));
    round1(sum as f64 / rows.len() as f64)
}

/// Summed suggestion acceptance over the window.
pub fn acceptance_rate(rows: &[DailyUsage]) -> f64 {
    let accepted = saturating_sum(rows.iter().map(|r| r.accepted_suggestions));
    let total = saturating_sum(rows.iter().map(|r| r.total_suggestions));
    percentage(accepted, total)
}

pub fn agent_adoption(rows: &[AgentAdoption]) -> AgentAdoptionStats {
    let agent_users = saturating_sum(rows.iter().map(|r| r.agent_users));
    let total_active_users = saturating_sum(rows.iter().map(|r| r.total_active_users));
    AgentAdoptionStats {
        percentage: percentage(agent_users, total_active_users).clamp(0.0, 100.0),
        agent_users,
        total_active_users,
    }
}

/// Per-model request totals, highest first; ties broken by name ascending.
pub fn model_totals(rows: &[ModelUsage]) -> Vec<ModelUsageTotal> {
    let mut sums: HashMap<&str, i64> = HashMap::new();
    for row in rows {
        let sum = sums.entry(row.model_name.as_str()).or_default();
        *sum = sum.saturating_add(row.requests);
    }
    let mut totals: Vec<ModelUsageTotal> = sums
        .into_iter()
        .map(|(name, requests)| ModelUsageTotal {
            name: name.to_string(),
            requests,
        })
        .collect();
    totals.sort_by(|a, b| b.requests.cmp(&a.requests).then_with(|| a.name.cmp(&b.name)));
    totals
}

pub fn most_used_model(rows: &[ModelUsage]) -> Option<ModelUsageTotal> {
    model_totals(rows).into_iter().next()
}

/// Build the dashboard summary from the rows of each table's window.
pub fn summarize(
    timeframe: Timeframe,
    daily: &[DailyUsage],
    adoption: &[AgentAdoption],
    models: &[ModelUsage],
) -> DashboardSummary {
    DashboardSummary {
        timeframe,
        ide_active_users: latest_active_users(daily),
        average_active_users: average_active_users(daily),
        agent_adoption: agent_adoption(adoption),
        most_used_chat_model: most_used_model(models),
        acceptance_rate: acceptance_rate(daily),
        window_start: daily.iter().map(|r| r.date).min(),
        window_end: daily.iter().map(|r| r.date).max(),
    }
}

/// Chronological `{date, value}` points for a metric.
///
/// Rows sharing a date are merged (counts summed) so the output never
/// contains duplicate dates; rates are recomputed from the merged counts.
pub fn metric_series(
    metric: UsageMetric,
    daily: &[DailyUsage],
    adoption: &[AgentAdoption],
) -> Vec<ChartDataPoint> {
    match metric {
        UsageMetric::AgentUsers | UsageMetric::AgentAdoption => {
            let mut by_date: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
            for row in adoption {
                let entry = by_date.entry(row.date).or_default();
                entry.0 = entry.0.saturating_add(row.agent_users);
                entry.1 = entry.1.saturating_add(row.total_active_users);
            }
            by_date
                .into_iter()
                .map(|(date, (agents, total))| ChartDataPoint {
                    date,
                    value: if metric == UsageMetric::AgentUsers {
                        agents as f64
                    } else {
                        percentage(agents, total)
                    },
                })
                .collect()
        }
        _ => {
            let mut by_date: BTreeMap<NaiveDate, DailyUsage> = BTreeMap::new();
            for row in daily {
                by_date
                    .entry(row.date)
                    .and_modify(|acc| {
                        acc.active_users = acc.active_users.saturating_add(row.active_users);
                        acc.total_suggestions =
                            acc.total_suggestions.saturating_add(row.total_suggestions);
                        acc.accepted_suggestions =
                            acc.accepted_suggestions.saturating_add(row.accepted_suggestions);
                        acc.chat_requests = acc.chat_requests.saturating_add(row.chat_requests);
                        acc.agent_requests = acc.agent_requests.saturating_add(row.agent_requests);
                    })
                    .or_insert_with(|| row.clone());
            }
            by_date
                .into_values()
                .map(|row| ChartDataPoint {
                    date: row.date,
                    value: daily_metric_value(metric, &row),
                })
                .collect()
        }
    }
}

fn daily_metric_value(metric: UsageMetric, row: &DailyUsage) -> f64 {
    match metric {
        UsageMetric::ActiveUsers => row.active_users as f64,
        UsageMetric::TotalSuggestions => row.total_suggestions as f64,
        UsageMetric::AcceptedSuggestions => row.accepted_suggestions as f64,
        UsageMetric::AcceptanceRate => percentage(row.accepted_suggestions, row.total_suggestions),
        UsageMetric::ChatRequests => row.chat_requests as f64,
        UsageMetric::AgentRequests => row.agent_requests as f64,
        // Adoption metrics are served from the agent_adoption table.
        UsageMetric::AgentUsers | UsageMetric::AgentAdoption => 0.0,
    }
}

/// One stacked point per date present in `rows`; absent modes stay 0.
pub fn stack_chat_modes(rows: &[ChatModeRequest]) -> Vec<StackedChartDataPoint> {
    let mut by_date: BTreeMap<NaiveDate, StackedChartDataPoint> = BTreeMap::new();
    for row in rows {
        by_date
            .entry(row.date)
            .or_insert_with(|| StackedChartDataPoint::empty(row.date))
            .add(row.mode, row.requests);
    }
    by_date.into_values().collect()
}

pub fn chat_mode_totals(rows: &[ChatModeRequest]) -> ChatModeTotals {
    let mut acc = StackedChartDataPoint::empty(NaiveDate::MIN);
    for row in rows {
        acc.add(row.mode, row.requests);
    }
    ChatModeTotals {
        edit: acc.edit,
        ask: acc.ask,
        agent: acc.agent,
        custom: acc.custom,
        inline: acc.inline,
        total: acc.total(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMode;
    use pretty_assertions::assert_eq;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn daily(day: u32, active: i64) -> DailyUsage {
        DailyUsage {
            date: d(day),
            active_users: active,
            total_suggestions: 100,
            accepted_suggestions: 30,
            chat_requests: 10,
            agent_requests: 2,
        }
    }

    fn model(day: u32, name: &str, requests: i64) -> ModelUsage {
        ModelUsage {
            date: d(day),
            model_name: name.to_string(),
            requests,
        }
    }

    #[test]
    fn test_percentage_handles_zero_denominator() {
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(4, 4), 100.0);
    }

    #[test]
    fn test_ide_active_users_is_latest_value() {
        let rows: Vec<DailyUsage> = [10, 12, 11, 13, 14, 15, 16]
            .iter()
            .enumerate()
            .map(|(i, n)| daily(i as u32 + 1, *n))
            .collect();
        let summary = summarize(Timeframe::Week, &rows, &[], &[]);
        assert_eq!(summary.ide_active_users, 16);
        assert_eq!(summary.average_active_users, 13.0);
        assert_eq!(summary.window_start, Some(d(1)));
        assert_eq!(summary.window_end, Some(d(7)));
    }

    #[test]
    fn test_latest_ignores_input_order() {
        let rows = vec![daily(5, 50), daily(7, 70), daily(6, 60)];
        assert_eq!(latest_active_users(&rows), 70);
    }

    #[test]
    fn test_empty_window_is_zeroed() {
        let summary = summarize(Timeframe::FourWeeks, &[], &[], &[]);
        assert_eq!(
            summary,
            DashboardSummary {
                timeframe: Timeframe::FourWeeks,
                ..DashboardSummary::default()
            }
        );
    }

    #[test]
    fn test_agent_adoption_sums_window() {
        let rows = vec![
            AgentAdoption {
                date: d(1),
                total_active_users: 10,
                agent_users: 2,
            },
            AgentAdoption {
                date: d(2),
                total_active_users: 10,
                agent_users: 3,
            },
        ];
        let stats = agent_adoption(&rows);
        assert_eq!(stats.agent_users, 5);
        assert_eq!(stats.total_active_users, 20);
        assert_eq!(stats.percentage, 25.0);
    }

    #[test]
    fn test_most_used_model_dominates_all_others() {
        let rows = vec![
            model(1, "gpt-4o", 10),
            model(2, "gpt-4o", 5),
            model(1, "claude-sonnet", 12),
            model(2, "o3-mini", 1),
        ];
        let top = most_used_model(&rows).unwrap();
        assert_eq!(top.name, "gpt-4o");
        assert_eq!(top.requests, 15);
        for other in model_totals(&rows) {
            assert!(top.requests >= other.requests);
        }
    }

    #[test]
    fn test_model_tie_breaks_by_name() {
        let rows = vec![model(1, "zeta", 4), model(1, "alpha", 4)];
        assert_eq!(most_used_model(&rows).unwrap().name, "alpha");
        assert_eq!(most_used_model(&[]), None);
    }

    #[test]
    fn test_series_is_strictly_ascending_without_duplicates() {
        let rows = vec![daily(3, 3), daily(1, 1), daily(2, 2), daily(2, 5)];
        let series = metric_series(UsageMetric::ActiveUsers, &rows, &[]);
        let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(1), d(2), d(3)]);
        assert_eq!(series[1].value, 7.0);
    }

    #[test]
    fn test_acceptance_rate_series() {
        let series = metric_series(UsageMetric::AcceptanceRate, &[daily(1, 1)], &[]);
        assert_eq!(series[0].value, 30.0);
    }

    #[test]
    fn test_adoption_series_reads_adoption_rows() {
        let adoption = vec![AgentAdoption {
            date: d(4),
            total_active_users: 8,
            agent_users: 2,
        }];
        let pct = metric_series(UsageMetric::AgentAdoption, &[daily(4, 8)], &adoption);
        assert_eq!(pct, vec![ChartDataPoint { date: d(4), value: 25.0 }]);
        let users = metric_series(UsageMetric::AgentUsers, &[], &adoption);
        assert_eq!(users[0].value, 2.0);
    }

    #[test]
    fn test_stacked_series_defaults_missing_modes_to_zero() {
        let rows = vec![
            ChatModeRequest {
                date: d(2),
                mode: ChatMode::Ask,
                requests: 4,
            },
            ChatModeRequest {
                date: d(1),
                mode: ChatMode::Edit,
                requests: 3,
            },
            ChatModeRequest {
                date: d(2),
                mode: ChatMode::Agent,
                requests: 6,
            },
        ];
        let stacked = stack_chat_modes(&rows);
        assert_eq!(stacked.len(), 2);
        assert_eq!(
            stacked[0],
            StackedChartDataPoint {
                date: d(1),
                edit: 3,
                ask: 0,
                agent: 0,
                custom: 0,
                inline: 0,
            }
        );
        assert_eq!(stacked[1].total(), 10);

        let totals = chat_mode_totals(&rows);
        assert_eq!(totals.total, 13);
        assert_eq!(totals.top_mode(), Some((ChatMode::Agent, 6)));
    }

    #[test]
    fn test_huge_counts_saturate_instead_of_overflowing() {
        let big = i64::MAX / 2 + 1;
        let rows = vec![daily(1, big), daily(2, big), daily(2, big)];
        let summary = summarize(Timeframe::Week, &rows, &[], &[]);
        assert_eq!(summary.ide_active_users, big);
        assert!(summary.average_active_users > 0.0);

        let series = metric_series(UsageMetric::ActiveUsers, &rows, &[]);
        assert_eq!(series[1].value, i64::MAX as f64);

        let models = vec![model(1, "gpt-4o", i64::MAX), model(2, "gpt-4o", 1)];
        assert_eq!(most_used_model(&models).unwrap().requests, i64::MAX);

        let modes = vec![
            ChatModeRequest {
                date: d(1),
                mode: ChatMode::Ask,
                requests: i64::MAX,
            },
            ChatModeRequest {
                date: d(1),
                mode: ChatMode::Ask,
                requests: 1,
            },
            ChatModeRequest {
                date: d(1),
                mode: ChatMode::Edit,
                requests: 1,
            },
        ];
        let totals = chat_mode_totals(&modes);
        assert_eq!(totals.ask, i64::MAX);
        assert_eq!(totals.total, i64::MAX);
    }
}
