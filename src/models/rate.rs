//! Exchange rate model
//!
//! A fixed-point conversion rate between two currencies on a given date.
//! Rates only feed converted previews; allocation always runs in the sheet's
//! own currency.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;

/// One unit of `source` is worth `amount * 10^-scale` units of `target`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub date: NaiveDate,
    pub source: String,
    pub target: String,
    pub amount: i64,
    pub scale: u32,
}

impl ExchangeRate {
    /// Create a new rate
    pub fn new(
        date: NaiveDate,
        source: impl Into<String>,
        target: impl Into<String>,
        amount: i64,
        scale: u32,
    ) -> Self {
        Self {
            date,
            source: source.into().to_uppercase(),
            target: target.into().to_uppercase(),
            amount,
            scale,
        }
    }

    /// Whether this rate converts `source` into `target` on `date`
    pub fn applies_to(&self, date: NaiveDate, source: &str, target: &str) -> bool {
        self.date == date
            && self.source.eq_ignore_ascii_case(source)
            && self.target.eq_ignore_ascii_case(target)
    }

    /// Convert `money` into the target currency at `target_scale`
    ///
    /// Rounds half away from zero. Returns `None` on overflow or if the
    /// money is not in the source currency.
    pub fn convert(&self, money: &Money, target_scale: u32) -> Option<Money> {
        if !money.currency_code().eq_ignore_ascii_case(&self.source) {
            return None;
        }

        let numerator = i128::from(money.amount()).checked_mul(i128::from(self.amount))?;
        let exponent = i64::from(target_scale) - i64::from(money.scale()) - i64::from(self.scale);

        let converted = if exponent >= 0 {
            numerator.checked_mul(10_i128.checked_pow(exponent as u32)?)?
        } else {
            let divisor = 10_i128.checked_pow((-exponent) as u32)?;
            let quotient = numerator / divisor;
            let remainder = numerator % divisor;
            if remainder.abs() * 2 >= divisor {
                quotient + numerator.signum()
            } else {
                quotient
            }
        };

        let amount = i64::try_from(converted).ok()?;
        Some(Money::new(amount, target_scale, self.target.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn test_convert_usd_to_eur() {
        // 1 USD = 0.9235 EUR
        let rate = ExchangeRate::new(date(), "usd", "eur", 9235, 4);
        let converted = rate.convert(&Money::new(10000, 2, "USD"), 2).unwrap();
        assert_eq!(converted, Money::new(9235, 2, "EUR"));
    }

    #[test]
    fn test_convert_rounds_half_away_from_zero() {
        // 1 USD = 1.005 XYZ; 1.00 USD -> 1.005 -> 1.01
        let rate = ExchangeRate::new(date(), "USD", "XYZ", 1005, 3);
        assert_eq!(
            rate.convert(&Money::new(100, 2, "USD"), 2).unwrap().amount(),
            101
        );
        assert_eq!(
            rate.convert(&Money::new(-100, 2, "USD"), 2).unwrap().amount(),
            -101
        );
    }

    #[test]
    fn test_convert_to_zero_scale_currency() {
        // 1 USD = 149.5 JPY
        let rate = ExchangeRate::new(date(), "USD", "JPY", 1495, 1);
        let converted = rate.convert(&Money::new(1000, 2, "USD"), 0).unwrap();
        assert_eq!(converted, Money::new(1495, 0, "JPY"));
    }

    #[test]
    fn test_convert_wrong_source_currency() {
        let rate = ExchangeRate::new(date(), "USD", "EUR", 9235, 4);
        assert!(rate.convert(&Money::new(100, 2, "GBP"), 2).is_none());
    }

    #[test]
    fn test_applies_to() {
        let rate = ExchangeRate::new(date(), "USD", "EUR", 9235, 4);
        assert!(rate.applies_to(date(), "usd", "EUR"));
        assert!(!rate.applies_to(date(), "EUR", "USD"));
        assert!(!rate.applies_to(date().succ_opt().unwrap(), "USD", "EUR"));
    }
}
