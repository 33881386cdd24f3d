//! Keyword-driven chat over the dashboard reports.
//!
//! A message is lowercased, split into alphanumeric words, and matched
//! against an ordered phrase table. Matching is word-level so "model"
//! never matches "mode". The first intent with a matching phrase wins.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::error::CoreError;
use crate::timeframe::Timeframe;
use crate::types::{
    AgentAdoptionStats, ChartDataPoint, ChatModeTotals, DashboardSummary, ModelUsageTotal,
    StackedChartDataPoint,
};

/// What the user asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    Models,
    ChatModes,
    AgentAdoption,
    Suggestions,
    ActiveUsers,
    Summary,
    Help,
}

/// Priority-ordered phrase table. Each phrase is a sequence of words that
/// must appear contiguously in the message.
const INTENT_PHRASES: &[(Intent, &[&str])] = &[
    (Intent::Models, &["model", "models", "llm", "llms", "gpt", "claude", "gemini"]),
    (
        Intent::ChatModes,
        &["chat mode", "chat modes", "mode", "modes", "inline chat", "ask mode", "edit mode"],
    ),
    (Intent::AgentAdoption, &["agent adoption", "adoption", "agent", "agents"]),
    (
        Intent::Suggestions,
        &["acceptance", "accepted", "suggestion", "suggestions", "completions", "acceptance rate"],
    ),
    (Intent::ActiveUsers, &["active users", "active", "users", "dau", "ide"]),
    (Intent::Summary, &["summary", "overview", "dashboard", "report"]),
];

/// Example questions returned with the help response.
pub const HELP_QUESTIONS: &[&str] = &[
    "How many active users do we have?",
    "Which chat model is most used?",
    "How are chat modes split?",
    "What is our agent adoption?",
    "What is the suggestion acceptance rate?",
    "Give me a summary",
];

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Models => "models",
            Intent::ChatModes => "chatModes",
            Intent::AgentAdoption => "agentAdoption",
            Intent::Suggestions => "suggestions",
            Intent::ActiveUsers => "activeUsers",
            Intent::Summary => "summary",
            Intent::Help => "help",
        }
    }

    /// Map a free-text message to an intent. Falls back to `Help`.
    pub fn detect(message: &str) -> Intent {
        let words = tokenize(message);
        INTENT_PHRASES
            .iter()
            .find(|(_, phrases)| phrases.iter().any(|p| contains_phrase(&words, p)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Help)
    }
}

/// Lowercase alphanumeric words of `message`.
pub fn tokenize(message: &str) -> Vec<String> {
    message
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn contains_phrase(words: &[String], phrase: &str) -> bool {
    let needle: Vec<&str> = phrase.split_whitespace().collect();
    if needle.is_empty() || needle.len() > words.len() {
        return false;
    }
    words
        .windows(needle.len())
        .any(|w| w.iter().zip(&needle).all(|(a, b)| a == b))
}

// ============================================================================
// Request / response
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatContext {
    /// One of "7", "14", "28". Defaults to "28".
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub context: Option<ChatContext>,
}

impl ChatRequest {
    /// Validate the message and resolve the timeframe.
    pub fn resolve(&self) -> Result<(String, Timeframe), CoreError> {
        let message = self.message.trim();
        if message.is_empty() {
            return Err(CoreError::EmptyMessage);
        }
        let timeframe = Timeframe::from_param(
            self.context
                .as_ref()
                .and_then(|c| c.timeframe.as_deref()),
        )?;
        Ok((message.to_string(), timeframe))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ModelsAnswer {
    pub most_used_chat_model: Option<ModelUsageTotal>,
    pub models: Vec<ModelUsageTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ChatModesAnswer {
    pub totals: ChatModeTotals,
    pub series: Vec<StackedChartDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct AgentAdoptionAnswer {
    pub agent_adoption: AgentAdoptionStats,
    pub series: Vec<ChartDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsAnswer {
    pub acceptance_rate: f64,
    pub series: Vec<ChartDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ActiveUsersAnswer {
    #[ts(type = "number")]
    pub ide_active_users: i64,
    pub average_active_users: f64,
    pub series: Vec<ChartDataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct HelpAnswer {
    pub examples: Vec<String>,
}

impl Default for HelpAnswer {
    fn default() -> Self {
        Self {
            examples: HELP_QUESTIONS.iter().map(|q| q.to_string()).collect(),
        }
    }
}

/// Data attached to a chat answer; shape depends on the intent.
#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(untagged)]
pub enum ChatPayload {
    Models(ModelsAnswer),
    ChatModes(ChatModesAnswer),
    AgentAdoption(AgentAdoptionAnswer),
    Suggestions(SuggestionsAnswer),
    ActiveUsers(ActiveUsersAnswer),
    Summary(DashboardSummary),
    Help(HelpAnswer),
}

#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema)]
#[cfg_attr(
    feature = "codegen",
    ts(export, export_to = "../../../frontend/src/types/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub intent: Intent,
    pub message: String,
    pub timeframe: Timeframe,
    pub data: ChatPayload,
}

impl ChatResponse {
    /// Pair a payload with its templated answer.
    pub fn new(intent: Intent, timeframe: Timeframe, data: ChatPayload) -> Self {
        let message = compose_answer(timeframe, &data);
        Self {
            intent,
            message,
            timeframe,
            data,
        }
    }

    pub fn help(timeframe: Timeframe) -> Self {
        Self::new(
            Intent::Help,
            timeframe,
            ChatPayload::Help(HelpAnswer::default()),
        )
    }
}

/// Short natural-language answer for a payload.
pub fn compose_answer(timeframe: Timeframe, data: &ChatPayload) -> String {
    let days = timeframe.days();
    match data {
        ChatPayload::Models(ModelsAnswer {
            most_used_chat_model: Some(top),
            models,
        }) => format!(
            "{} was the most used chat model over the last {} days with {} requests ({} models in use).",
            top.name,
            days,
            top.requests,
            models.len()
        ),
        ChatPayload::Models(_) => {
            format!("No model usage was recorded in the last {days} days.")
        }
        ChatPayload::ChatModes(ChatModesAnswer { totals, .. }) => match totals.top_mode() {
            Some((mode, n)) => format!(
                "{} chat requests over the last {} days; {} mode led with {} ({}%).",
                totals.total,
                days,
                mode,
                n,
                crate::aggregate::percentage(n, totals.total)
            ),
            None => format!("No chat requests were recorded in the last {days} days."),
        },
        ChatPayload::AgentAdoption(AgentAdoptionAnswer { agent_adoption, .. }) => format!(
            "Agent adoption over the last {} days is {}% ({} of {} active users).",
            days,
            agent_adoption.percentage,
            agent_adoption.agent_users,
            agent_adoption.total_active_users
        ),
        ChatPayload::Suggestions(SuggestionsAnswer {
            acceptance_rate, ..
        }) => format!(
            "The suggestion acceptance rate over the last {days} days is {acceptance_rate}%."
        ),
        ChatPayload::ActiveUsers(ActiveUsersAnswer {
            ide_active_users,
            average_active_users,
            ..
        }) => format!(
            "{ide_active_users} active IDE users on the latest day; {average_active_users} on average over the last {days} days."
        ),
        ChatPayload::Summary(s) => {
            let model = s
                .most_used_chat_model
                .as_ref()
                .map(|m| m.name.as_str())
                .unwrap_or("none");
            format!(
                "Last {} days: {} active users, {}% acceptance, {}% agent adoption, top model {}.",
                days, s.ide_active_users, s.acceptance_rate, s.agent_adoption.percentage, model
            )
        }
        ChatPayload::Help(_) => "I can answer questions about active users, chat modes, \
             models, agent adoption, and suggestion acceptance. Try one of the examples."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Which chat-model is MOST used?"),
            vec!["which", "chat", "model", "is", "most", "used"]
        );
        assert!(tokenize("  ?! ").is_empty());
    }

    #[test]
    fn test_detect_models_not_chat_modes() {
        assert_eq!(Intent::detect("which chat model is most used?"), Intent::Models);
        assert_eq!(Intent::detect("Top LLMs this month"), Intent::Models);
    }

    #[test]
    fn test_detect_chat_modes() {
        assert_eq!(Intent::detect("break down the chat modes"), Intent::ChatModes);
        assert_eq!(Intent::detect("How much inline chat?"), Intent::ChatModes);
        assert_eq!(Intent::detect("ask vs edit mode"), Intent::ChatModes);
    }

    #[test]
    fn test_detect_lone_mode_names_do_not_shadow_later_intents() {
        assert_eq!(
            Intent::detect("can I ask about agent adoption?"),
            Intent::AgentAdoption
        );
        assert_eq!(Intent::detect("inline suggestions accepted"), Intent::Suggestions);
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        assert_eq!(Intent::detect("AGENT ADOPTION please"), Intent::AgentAdoption);
        assert_eq!(Intent::detect("Active Users"), Intent::ActiveUsers);
    }

    #[test]
    fn test_detect_suggestions_and_summary() {
        assert_eq!(Intent::detect("what's the acceptance rate"), Intent::Suggestions);
        assert_eq!(Intent::detect("give me an overview"), Intent::Summary);
    }

    #[test]
    fn test_detect_falls_back_to_help() {
        assert_eq!(Intent::detect("hello there"), Intent::Help);
        assert_eq!(Intent::detect("modelling"), Intent::Help);
    }

    #[test]
    fn test_request_resolve_defaults_timeframe() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":" hi "}"#).unwrap();
        assert_eq!(req.resolve().unwrap(), ("hi".to_string(), Timeframe::FourWeeks));
    }

    #[test]
    fn test_request_resolve_rejects_bad_input() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"message":"models","context":{"timeframe":"30"}}"#).unwrap();
        assert_eq!(
            req.resolve(),
            Err(CoreError::InvalidTimeframe("30".to_string()))
        );

        let empty: ChatRequest = serde_json::from_str(r#"{"message":"   "}"#).unwrap();
        assert_eq!(empty.resolve(), Err(CoreError::EmptyMessage));
    }

    #[test]
    fn test_models_answer_mentions_top_model() {
        let top = ModelUsageTotal {
            name: "gpt-4o".to_string(),
            requests: 42,
        };
        let resp = ChatResponse::new(
            Intent::Models,
            Timeframe::TwoWeeks,
            ChatPayload::Models(ModelsAnswer {
                most_used_chat_model: Some(top.clone()),
                models: vec![top],
            }),
        );
        assert!(resp.message.contains("gpt-4o"));
        assert!(resp.message.contains("14 days"));

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["intent"], "models");
        assert_eq!(json["timeframe"], "14");
        assert_eq!(json["data"]["mostUsedChatModel"]["requests"], 42);
    }

    #[test]
    fn test_help_lists_examples() {
        let resp = ChatResponse::help(Timeframe::Week);
        assert_eq!(resp.intent, Intent::Help);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json["data"]["examples"].as_array().unwrap().len(),
            HELP_QUESTIONS.len()
        );
    }
}
