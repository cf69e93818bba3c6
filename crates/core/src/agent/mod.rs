pub mod error;
pub mod registry;
pub mod remote;

use crate::domain::portfolio::Portfolio;
use chrono::NaiveDate;
use error::AgentError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seed instruction handed to every analyst agent.
pub const SEED_PROMPT: &str = "Make trading decisions based on the provided data.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Human,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    pub role: MessageRole,
    pub content: String,
}

impl AgentMessage {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Human,
            content: content.into(),
        }
    }
}

/// Market/portfolio context an analyst agent works from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentData {
    pub tickers: Vec<String>,
    pub portfolio: Portfolio,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub analyst_signals: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMetadata {
    pub show_reasoning: bool,
}

/// Conversation state threaded through an analyst agent. Built fresh per
/// request and discarded once the response is rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub messages: Vec<AgentMessage>,
    pub data: AgentData,
    pub metadata: AgentMetadata,
}

impl AgentState {
    /// Seeds the state a single-analyst dispatch hands to its agent: the
    /// standard prompt, the enriched data bundle, and no prior signals.
    pub fn seeded(
        tickers: Vec<String>,
        portfolio: Portfolio,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            messages: vec![AgentMessage::human(SEED_PROMPT)],
            data: AgentData {
                tickers,
                portfolio,
                start_date,
                end_date,
                analyst_signals: BTreeMap::new(),
            },
            metadata: AgentMetadata {
                show_reasoning: true,
            },
        }
    }

    /// The textual verdict of a finished run: the last message's content.
    pub fn verdict(&self) -> Result<&str, AgentError> {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .ok_or_else(|| AgentError::Failed(anyhow::anyhow!("agent returned no messages")))
    }
}

/// Inputs to the aggregate orchestration entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedgeFundRun {
    pub tickers: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub portfolio: Portfolio,
    pub show_reasoning: bool,
    pub selected_analysts: Vec<String>,
    pub model_name: String,
    pub model_provider: String,
}

/// One named analyst backend. Implementations run externally-defined
/// heuristics; this layer only shapes inputs and consumes the outcome.
#[async_trait::async_trait]
pub trait AnalystAgent: Send + Sync {
    fn name(&self) -> &'static str;

    async fn analyze(&self, state: AgentState) -> Result<AgentState, AgentError>;
}

/// The aggregate entry point coordinating multiple analysts into one
/// combined decision. Returns whatever JSON the backend produced.
#[async_trait::async_trait]
pub trait Orchestrator: Send + Sync {
    async fn run(&self, run: HedgeFundRun) -> Result<serde_json::Value, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_state() -> AgentState {
        AgentState::seeded(
            vec!["AAPL".to_string()],
            Portfolio::seeded(&["AAPL"]),
            NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2026, 4, 15).unwrap(),
        )
    }

    #[test]
    fn seeded_state_carries_prompt_and_empty_signals() {
        let state = seeded_state();

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].role, MessageRole::Human);
        assert_eq!(state.messages[0].content, SEED_PROMPT);
        assert!(state.data.analyst_signals.is_empty());
        assert!(state.metadata.show_reasoning);
    }

    #[test]
    fn seeded_state_portfolio_covers_requested_ticker() {
        let state = seeded_state();
        assert!(state.data.portfolio.positions.contains_key("AAPL"));
        assert!(state.data.portfolio.realized_gains.contains_key("AAPL"));
    }

    #[test]
    fn verdict_is_last_message_content() {
        let mut state = seeded_state();
        state.messages.push(AgentMessage {
            role: MessageRole::Assistant,
            content: "bullish on AAPL".to_string(),
        });

        assert_eq!(state.verdict().unwrap(), "bullish on AAPL");
    }

    #[test]
    fn verdict_fails_without_messages() {
        let mut state = seeded_state();
        state.messages.clear();
        assert!(state.verdict().is_err());
    }

    #[test]
    fn agent_state_serializes_iso_dates() {
        let state = seeded_state();
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["data"]["start_date"], "2026-01-15");
        assert_eq!(json["data"]["end_date"], "2026-04-15");
        assert_eq!(json["metadata"]["show_reasoning"], true);
        assert_eq!(json["messages"][0]["role"], "human");
    }
}
