//! Exchange rate lookups and converted previews
//!
//! Allocation never converts; a preview only shows what the total would be
//! in another currency on the transaction date.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{SplitError, SplitResult};
use crate::models::{ExchangeRate, Money};
use crate::storage::Storage;

/// Source of exchange rates
pub trait RateProvider {
    /// Rate converting `source` into `target` on `date`, if known
    fn rate(&self, date: NaiveDate, source: &str, target: &str) -> Option<ExchangeRate>;
}

/// Converted view of a total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatePreview {
    pub original: Money,
    pub converted: Money,
    pub rate: ExchangeRate,
}

impl RatePreview {
    /// Convert `total` into `target` using the provider's rate for `date`
    ///
    /// Returns `None` when no rate is known or the conversion overflows.
    /// Converting into the total's own currency is the identity.
    pub fn convert_preview<P: RateProvider + ?Sized>(
        provider: &P,
        total: &Money,
        date: NaiveDate,
        target: &str,
        target_scale: u32,
    ) -> Option<RatePreview> {
        if total.currency_code().eq_ignore_ascii_case(target) && total.scale() == target_scale {
            let identity = ExchangeRate::new(date, target, target, 1, 0);
            return Some(RatePreview {
                original: total.clone(),
                converted: total.clone(),
                rate: identity,
            });
        }

        let rate = provider.rate(date, total.currency_code(), target)?;
        let converted = rate.convert(total, target_scale)?;
        debug!(%date, from = total.currency_code(), to = target, "converted preview");
        Some(RatePreview {
            original: total.clone(),
            converted,
            rate,
        })
    }
}

/// Service for managing stored rates
pub struct RateService<'a> {
    storage: &'a Storage,
}

impl<'a> RateService<'a> {
    /// Create a new rate service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Store a rate given as a decimal string such as "0.9235"
    pub fn set(
        &self,
        date: NaiveDate,
        source: &str,
        target: &str,
        rate: &str,
    ) -> SplitResult<ExchangeRate> {
        let (amount, scale) = parse_decimal(rate)?;
        if amount <= 0 {
            return Err(SplitError::malformed("rate", "must be greater than zero"));
        }
        if source.trim().is_empty() || target.trim().is_empty() {
            return Err(SplitError::malformed("currency", "cannot be empty"));
        }

        let rate = ExchangeRate::new(date, source.trim(), target.trim(), amount, scale);
        self.storage.rates.upsert(rate.clone())?;
        self.storage.rates.save()?;
        Ok(rate)
    }

    /// All stored rates
    pub fn list(&self) -> SplitResult<Vec<ExchangeRate>> {
        self.storage.rates.get_all()
    }

    /// Preview `total` in `target` on `date`
    pub fn preview(
        &self,
        total: &Money,
        date: NaiveDate,
        target: &str,
        target_scale: u32,
    ) -> SplitResult<RatePreview> {
        RatePreview::convert_preview(&self.storage.rates, total, date, target, target_scale)
            .ok_or_else(|| SplitError::NotFound {
                entity_type: "Exchange rate",
                identifier: format!("{} -> {} on {}", total.currency_code(), target, date),
            })
    }
}

/// Parse a plain decimal into fixed-point (digits, scale)
fn parse_decimal(input: &str) -> SplitResult<(i64, u32)> {
    let input = input.trim();
    let (whole, frac) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };

    let valid = !(whole.is_empty() && frac.is_empty())
        && whole.chars().all(|c| c.is_ascii_digit())
        && frac.chars().all(|c| c.is_ascii_digit());
    if !valid {
        return Err(SplitError::malformed("rate", format!("'{}' is not a decimal", input)));
    }

    let digits = format!("{}{}", whole, frac);
    let amount: i64 = digits
        .parse()
        .map_err(|_| SplitError::malformed("rate", format!("'{}' is too large", input)))?;
    Ok((amount, frac.len() as u32))
}
