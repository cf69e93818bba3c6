use crate::agent::AnalystAgent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The analysts the API knows how to route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalystId {
    Graham,
    Buffett,
    Ackman,
    Fundamentals,
    Technicals,
    Sentiment,
    Valuation,
}

impl AnalystId {
    pub const ALL: [AnalystId; 7] = [
        AnalystId::Graham,
        AnalystId::Buffett,
        AnalystId::Ackman,
        AnalystId::Fundamentals,
        AnalystId::Technicals,
        AnalystId::Sentiment,
        AnalystId::Valuation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalystId::Graham => "graham",
            AnalystId::Buffett => "buffett",
            AnalystId::Ackman => "ackman",
            AnalystId::Fundamentals => "fundamentals",
            AnalystId::Technicals => "technicals",
            AnalystId::Sentiment => "sentiment",
            AnalystId::Valuation => "valuation",
        }
    }
}

impl fmt::Display for AnalystId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct UnknownAnalyst(pub String);

impl fmt::Display for UnknownAnalyst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known = AnalystId::ALL.map(|id| id.as_str()).join(", ");
        write!(f, "unknown analyst '{}' (known: {known})", self.0)
    }
}

impl std::error::Error for UnknownAnalyst {}

impl FromStr for AnalystId {
    type Err = UnknownAnalyst;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalystId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownAnalyst(s.to_string()))
    }
}

/// Maps analyst ids to their backends so one generic handler can serve every
/// single-analyst route.
#[derive(Clone, Default)]
pub struct AnalystRegistry {
    agents: BTreeMap<AnalystId, Arc<dyn AnalystAgent>>,
}

impl AnalystRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(mut self, id: AnalystId, agent: Arc<dyn AnalystAgent>) -> Self {
        self.agents.insert(id, agent);
        self
    }

    pub fn get(&self, id: AnalystId) -> Option<&Arc<dyn AnalystAgent>> {
        self.agents.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = AnalystId> + '_ {
        self.agents.keys().copied()
    }
}

impl fmt::Debug for AnalystRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalystRegistry")
            .field("analysts", &self.agents.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{error::AgentError, AgentState};

    struct NoopAgent;

    #[async_trait::async_trait]
    impl AnalystAgent for NoopAgent {
        fn name(&self) -> &'static str {
            "noop"
        }

        async fn analyze(&self, state: AgentState) -> Result<AgentState, AgentError> {
            Ok(state)
        }
    }

    #[test]
    fn parses_every_known_id() {
        for id in AnalystId::ALL {
            assert_eq!(id.as_str().parse::<AnalystId>().unwrap(), id);
        }
    }

    #[test]
    fn unknown_id_lists_known_analysts() {
        let err = "munger".parse::<AnalystId>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown analyst 'munger'"));
        assert!(msg.contains("graham"));
        assert!(msg.contains("valuation"));
    }

    #[test]
    fn registry_lookup_round_trips() {
        let registry =
            AnalystRegistry::new().with_agent(AnalystId::Graham, Arc::new(NoopAgent));

        assert!(registry.get(AnalystId::Graham).is_some());
        assert!(registry.get(AnalystId::Buffett).is_none());
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec![AnalystId::Graham]);
    }
}
