//! Answers chat messages by routing the detected intent to a dashboard query.

use copilot_dash_core::chat::{
    ActiveUsersAnswer, AgentAdoptionAnswer, ChatModesAnswer, HelpAnswer, ModelsAnswer,
    SuggestionsAnswer,
};
use copilot_dash_core::{ChatPayload, ChatRequest, ChatResponse, Intent, Timeframe, UsageMetric};
use copilot_dash_db::{Database, DbResult};

/// Resolve the request, detect its intent, and run the matching query.
pub async fn answer(db: &Database, request: &ChatRequest) -> crate::ApiResult<ChatResponse> {
    let (message, timeframe) = request.resolve()?;
    let intent = Intent::detect(&message);

    tracing::debug!(intent = intent.as_str(), timeframe = timeframe.as_str(), "chat intent");

    let data = payload_for(db, intent, timeframe).await?;
    Ok(ChatResponse::new(intent, timeframe, data))
}

async fn payload_for(db: &Database, intent: Intent, timeframe: Timeframe) -> DbResult<ChatPayload> {
    let payload = match intent {
        Intent::Models => {
            let models = db.get_model_breakdown(timeframe).await?;
            ChatPayload::Models(ModelsAnswer {
                most_used_chat_model: models.first().cloned(),
                models,
            })
        }
        Intent::ChatModes => ChatPayload::ChatModes(ChatModesAnswer {
            totals: db.get_chat_mode_totals(timeframe).await?,
            series: db.get_chat_mode_series(timeframe).await?,
        }),
        Intent::AgentAdoption => {
            let summary = db.get_usage_summary(timeframe).await?;
            ChatPayload::AgentAdoption(AgentAdoptionAnswer {
                agent_adoption: summary.agent_adoption,
                series: db
                    .get_usage_series(UsageMetric::AgentAdoption, timeframe)
                    .await?,
            })
        }
        Intent::Suggestions => {
            let summary = db.get_usage_summary(timeframe).await?;
            ChatPayload::Suggestions(SuggestionsAnswer {
                acceptance_rate: summary.acceptance_rate,
                series: db
                    .get_usage_series(UsageMetric::AcceptanceRate, timeframe)
                    .await?,
            })
        }
        Intent::ActiveUsers => {
            let summary = db.get_usage_summary(timeframe).await?;
            ChatPayload::ActiveUsers(ActiveUsersAnswer {
                ide_active_users: summary.ide_active_users,
                average_active_users: summary.average_active_users,
                series: db
                    .get_usage_series(UsageMetric::ActiveUsers, timeframe)
                    .await?,
            })
        }
        Intent::Summary => ChatPayload::Summary(db.get_usage_summary(timeframe).await?),
        Intent::Help => ChatPayload::Help(HelpAnswer::default()),
    };
    Ok(payload)
}
