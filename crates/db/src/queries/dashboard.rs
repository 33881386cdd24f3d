// crates/db/src/queries/dashboard.rs
// Dashboard aggregations: summary cards, chart series, model breakdown.

use copilot_dash_core::aggregate;
use copilot_dash_core::{
    ChartDataPoint, ChatModeTotals, DashboardSummary, MetricSource, ModelUsageTotal,
    StackedChartDataPoint, Timeframe, UsageMetric,
};
use tracing::debug;

use crate::{Database, DbResult};

impl Database {
    /// Headline numbers for the dashboard cards.
    ///
    /// Each table contributes from its own trailing window, so a table that
    /// lags behind the others still reports its most recent days.
    pub async fn get_usage_summary(&self, timeframe: Timeframe) -> DbResult<DashboardSummary> {
        let daily = self.get_daily_usage(timeframe).await?;
        let adoption = self.get_agent_adoption(timeframe).await?;
        let models = self.get_model_usage(timeframe).await?;

        debug!(
            timeframe = timeframe.as_str(),
            daily = daily.len(),
            adoption = adoption.len(),
            models = models.len(),
            "summarizing usage window"
        );

        Ok(aggregate::summarize(timeframe, &daily, &adoption, &models))
    }

    /// Chronological points for one metric.
    pub async fn get_usage_series(
        &self,
        metric: UsageMetric,
        timeframe: Timeframe,
    ) -> DbResult<Vec<ChartDataPoint>> {
        let points = match metric.source() {
            MetricSource::DailyUsage => {
                let daily = self.get_daily_usage(timeframe).await?;
                aggregate::metric_series(metric, &daily, &[])
            }
            MetricSource::AgentAdoption => {
                let adoption = self.get_agent_adoption(timeframe).await?;
                aggregate::metric_series(metric, &[], &adoption)
            }
        };
        Ok(points)
    }

    /// Per-day chat requests split by mode.
    pub async fn get_chat_mode_series(
        &self,
        timeframe: Timeframe,
    ) -> DbResult<Vec<StackedChartDataPoint>> {
        let rows = self.get_chat_mode_requests(timeframe).await?;
        Ok(aggregate::stack_chat_modes(&rows))
    }

    /// Chat requests per mode summed over the window.
    pub async fn get_chat_mode_totals(&self, timeframe: Timeframe) -> DbResult<ChatModeTotals> {
        let rows = self.get_chat_mode_requests(timeframe).await?;
        Ok(aggregate::chat_mode_totals(&rows))
    }

    /// Requests per model over the window, most used first.
    pub async fn get_model_breakdown(
        &self,
        timeframe: Timeframe,
    ) -> DbResult<Vec<ModelUsageTotal>> {
        let rows = self.get_model_usage(timeframe).await?;
        Ok(aggregate::model_totals(&rows))
    }
}
