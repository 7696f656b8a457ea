use std::collections::HashMap;

/// Currency-rate table for one period, pre-filtered by the caller. Codes
/// are matched case-insensitively (sheets mix "usd" and "USD" freely);
/// the base currency always resolves to 1.0 whether or not the snapshot
/// lists it.
#[derive(Debug, Clone)]
pub struct RateTable {
    base_currency: String,
    period: String,
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(
        base_currency: &str,
        period: &str,
        rates: impl IntoIterator<Item = (String, f64)>,
    ) -> Self {
        Self {
            base_currency: base_currency.trim().to_uppercase(),
            period: period.to_string(),
            rates: rates
                .into_iter()
                .map(|(code, rate)| (code.trim().to_uppercase(), rate))
                .collect(),
        }
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    /// Multiplier that converts a price in `currency` into the base
    /// currency. `None` means the period snapshot has no rate for it.
    pub fn rate_to_base(&self, currency: &str) -> Option<f64> {
        let code = currency.trim().to_uppercase();
        if code == self.base_currency {
            return Some(1.0);
        }
        self.rates.get(&code).copied()
    }
}
