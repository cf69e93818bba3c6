use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of the aggregate `/api/analyze` route. Dates are always computed
/// server-side for this route, so the schema carries none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HedgeFundRequest {
    pub tickers: Vec<String>,
    #[serde(default)]
    pub selected_analysts: Vec<String>,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default = "default_model_provider")]
    pub model_provider: String,
}

fn default_model_name() -> String {
    "gpt-4-turbo".to_string()
}

fn default_model_provider() -> String {
    "OpenAI".to_string()
}

impl HedgeFundRequest {
    /// Rejects requests no backend should ever see. The message surfaces
    /// verbatim as the 400 detail.
    pub fn validate(&self) -> Result<(), String> {
        if self.tickers.is_empty() {
            return Err("tickers must be a non-empty list".to_string());
        }
        if self.tickers.iter().any(|t| t.trim().is_empty()) {
            return Err("tickers must not contain blank entries".to_string());
        }
        Ok(())
    }
}

/// Body of the single-analyst `/api/analyze/{analyst}` routes. The original
/// surface never grew model selection here; the asymmetry is intentional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub ticker: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl AnalysisRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.ticker.trim().is_empty() {
            return Err("ticker must be non-empty".to_string());
        }
        Ok(())
    }
}
