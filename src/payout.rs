//! Payout Summary
//!
//! Balance and payment-schedule figures for the dashboard. Payments are
//! issued on the last day of each month once the balance reaches the
//! minimum threshold. No money moves here.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::Month;
use crate::config::PayoutConfig;

/// Balance and payout schedule for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutSummary {
    pub balance_cents: u64,
    pub threshold_cents: u64,
    /// Amount still needed before the next payment, never negative
    pub remaining_cents: u64,
    pub eligible: bool,
    pub next_payment_date: NaiveDate,
    pub balance_display: String,
    pub threshold_display: String,
    pub remaining_display: String,
    pub payment_methods: Vec<String>,
}

impl PayoutSummary {
    pub fn compute(balance_cents: u64, config: &PayoutConfig, today: NaiveDate) -> Self {
        let remaining_cents = config.threshold_cents.saturating_sub(balance_cents);

        Self {
            balance_cents,
            threshold_cents: config.threshold_cents,
            remaining_cents,
            eligible: remaining_cents == 0,
            next_payment_date: Month::of(today).last_day(),
            balance_display: format_usd(balance_cents),
            threshold_display: format_usd(config.threshold_cents),
            remaining_display: format_usd(remaining_cents),
            payment_methods: config.payment_methods.clone(),
        }
    }
}

/// Format cents as `$1,234.56`
pub fn format_usd(cents: u64) -> String {
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);

    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}.{:02}", grouped, cents % 100)
}
