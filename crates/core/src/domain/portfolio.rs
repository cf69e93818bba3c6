use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Starting cash for a freshly seeded portfolio.
pub const DEFAULT_INITIAL_CASH: f64 = 100_000.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Position {
    pub long: i64,
    pub short: i64,
    pub long_cost_basis: f64,
    pub short_cost_basis: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealizedGains {
    pub long: f64,
    pub short: f64,
}

/// The zeroed starting position/cash state synthesized per request. Never
/// persisted; its lifetime is a single analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub cash: f64,
    pub margin_requirement: f64,
    pub positions: BTreeMap<String, Position>,
    pub realized_gains: BTreeMap<String, RealizedGains>,
}

impl Portfolio {
    /// Builds a snapshot with default cash and one zeroed entry per ticker.
    /// `positions` and `realized_gains` always carry identical key sets.
    pub fn seeded<S: AsRef<str>>(tickers: &[S]) -> Self {
        let mut positions = BTreeMap::new();
        let mut realized_gains = BTreeMap::new();
        for ticker in tickers {
            let ticker = ticker.as_ref().to_string();
            positions.insert(ticker.clone(), Position::default());
            realized_gains.insert(ticker, RealizedGains::default());
        }

        Self {
            cash: DEFAULT_INITIAL_CASH,
            margin_requirement: 0.0,
            positions,
            realized_gains,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn seeded_portfolio_has_one_entry_per_ticker() {
        let tickers = ["AAPL", "MSFT", "NVDA"];
        let portfolio = Portfolio::seeded(&tickers);

        let position_keys: BTreeSet<&str> =
            portfolio.positions.keys().map(String::as_str).collect();
        let gains_keys: BTreeSet<&str> =
            portfolio.realized_gains.keys().map(String::as_str).collect();
        let expected: BTreeSet<&str> = tickers.iter().copied().collect();

        assert_eq!(position_keys, expected);
        assert_eq!(gains_keys, expected);
    }

    #[test]
    fn seeded_portfolio_starts_zeroed() {
        let portfolio = Portfolio::seeded(&["AAPL"]);

        assert_eq!(portfolio.cash, DEFAULT_INITIAL_CASH);
        assert_eq!(portfolio.margin_requirement, 0.0);

        let position = &portfolio.positions["AAPL"];
        assert_eq!(position.long, 0);
        assert_eq!(position.short, 0);
        assert_eq!(position.long_cost_basis, 0.0);
        assert_eq!(position.short_cost_basis, 0.0);

        let gains = &portfolio.realized_gains["AAPL"];
        assert_eq!(gains.long, 0.0);
        assert_eq!(gains.short, 0.0);
    }

    #[test]
    fn seeded_portfolio_serializes_with_ticker_keys() {
        let portfolio = Portfolio::seeded(&["AAPL"]);
        let json = serde_json::to_value(&portfolio).unwrap();

        assert_eq!(json["cash"], 100_000.0);
        assert_eq!(json["positions"]["AAPL"]["long"], 0);
        assert_eq!(json["realized_gains"]["AAPL"]["short"], 0.0);
    }
}
