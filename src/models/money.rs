//! Money type for representing currency amounts
//!
//! Internally stores amounts as integer minor units (i64) at a per-value
//! decimal scale, so "10.50 USD" is `{amount: 1050, scale: 2}` and
//! "1050 JPY" is `{amount: 1050, scale: 0}`. Allocation math never leaves
//! the integer domain for the final amounts.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{SplitError, SplitResult};

/// Largest supported scale; 10^18 still fits in an i64
pub const MAX_SCALE: u32 = 18;

/// A monetary amount in integer minor units of a currency
///
/// Deserialization goes through [`Money::try_new`], so a stored value with an
/// unsupported scale fails to load instead of producing a broken amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Money {
    /// Amount in minor units (e.g. cents)
    amount: i64,
    /// Number of decimal digits in a minor unit (2 for cents)
    scale: u32,
    /// ISO-4217 style currency code
    currency_code: String,
}

/// Serialized form of [`Money`], checked on the way in
#[derive(Deserialize)]
struct MoneyRecord {
    amount: i64,
    scale: u32,
    currency_code: String,
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = MoneyRecord::deserialize(deserializer)?;
        Money::try_new(record.amount, record.scale, record.currency_code)
            .map_err(serde::de::Error::custom)
    }
}

impl Money {
    /// Create a Money amount from minor units
    ///
    /// # Examples
    /// ```
    /// use splitsheet::models::Money;
    /// let amount = Money::new(1050, 2, "USD"); // 10.50 USD
    /// assert_eq!(amount.amount(), 1050);
    /// ```
    pub fn new(amount: i64, scale: u32, currency_code: impl Into<String>) -> Self {
        debug_assert!(scale <= MAX_SCALE, "scale {} out of range", scale);
        Self {
            amount,
            scale,
            currency_code: currency_code.into(),
        }
    }

    /// Create a Money amount, rejecting scales that cannot be represented
    pub fn try_new(amount: i64, scale: u32, currency_code: impl Into<String>) -> SplitResult<Self> {
        if scale > MAX_SCALE {
            return Err(SplitError::Validation(format!(
                "Currency scale {} exceeds the maximum of {}",
                scale, MAX_SCALE
            )));
        }
        Ok(Self::new(amount, scale, currency_code))
    }

    /// Create a zero amount in the given denomination
    pub fn zero(scale: u32, currency_code: impl Into<String>) -> Self {
        Self::new(0, scale, currency_code)
    }

    /// A zero amount in the same currency and scale as `self`
    pub fn zero_like(&self) -> Self {
        self.with_amount(0)
    }

    /// A different amount in the same currency and scale as `self`
    pub fn with_amount(&self, amount: i64) -> Self {
        Self {
            amount,
            scale: self.scale,
            currency_code: self.currency_code.clone(),
        }
    }

    /// Amount in minor units
    pub const fn amount(&self) -> i64 {
        self.amount
    }

    /// Decimal scale of the minor unit
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Currency code
    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    /// 10^scale, the number of minor units in one major unit
    ///
    /// Saturates at `i64::MAX` for scales above [`MAX_SCALE`], which only
    /// `Money::new` in a release build can produce.
    pub fn unit_factor(&self) -> i64 {
        10_i64.checked_pow(self.scale).unwrap_or(i64::MAX)
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// Whether two values share currency and scale
    pub fn same_denomination(&self, other: &Money) -> bool {
        self.scale == other.scale && self.currency_code == other.currency_code
    }

    /// Add two amounts of the same denomination
    pub fn checked_add(&self, other: &Money) -> SplitResult<Money> {
        if !self.same_denomination(other) {
            return Err(SplitError::CurrencyMismatch {
                expected: self.denomination(),
                actual: other.denomination(),
            });
        }
        let amount = self.amount.checked_add(other.amount).ok_or_else(|| {
            SplitError::Validation(format!("Amount overflow adding {} and {}", self, other))
        })?;
        Ok(self.with_amount(amount))
    }

    /// Sum a sequence of amounts in the denomination of `zero`
    pub fn sum<'a, I>(zero: &Money, iter: I) -> SplitResult<Money>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        iter.into_iter()
            .try_fold(zero.zero_like(), |acc, m| acc.checked_add(m))
    }

    fn denomination(&self) -> String {
        format!("{} (scale {})", self.currency_code, self.scale)
    }

    /// Parse a money amount from a string in the given denomination
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "10". More fractional
    /// digits than the scale allows are rejected rather than truncated.
    pub fn parse(
        s: &str,
        scale: u32,
        currency_code: impl Into<String>,
    ) -> Result<Self, MoneyParseError> {
        let original = s;
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let s = s.strip_prefix('$').unwrap_or(s);
        let invalid = || MoneyParseError::InvalidFormat(original.to_string());

        let factor = 10_i64
            .checked_pow(scale)
            .ok_or_else(|| MoneyParseError::UnsupportedScale(scale))?;

        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > scale as usize {
            return Err(MoneyParseError::TooPrecise {
                input: original.to_string(),
                scale,
            });
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        if whole < 0 {
            return Err(invalid());
        }

        let fraction_units: i64 = if fraction.is_empty() {
            0
        } else {
            if !fraction.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            // Right-pad "5" to "50" for scale 2
            let padded = format!("{:0<width$}", fraction, width = scale as usize);
            padded.parse().map_err(|_| invalid())?
        };

        let units = whole
            .checked_mul(factor)
            .and_then(|w| w.checked_add(fraction_units))
            .ok_or_else(invalid)?;

        Ok(Self::new(
            if negative { -units } else { units },
            scale,
            currency_code,
        ))
    }

    /// Format the numeric part only, e.g. "10.50"
    pub fn format_plain(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let abs = self.amount.unsigned_abs();
        if self.scale == 0 {
            return format!("{}{}", sign, abs);
        }
        let factor = self.unit_factor() as u64;
        format!(
            "{}{}.{:0width$}",
            sign,
            abs / factor,
            abs % factor,
            width = self.scale as usize
        )
    }

    /// Format with a currency symbol, e.g. "-$10.50"
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let plain = self.format_plain();
        match plain.strip_prefix('-') {
            Some(rest) => format!("-{}{}", symbol, rest),
            None => format!("{}{}", symbol, plain),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.format_plain(), self.currency_code)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
    TooPrecise { input: String, scale: u32 },
    UnsupportedScale(u32),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            MoneyParseError::TooPrecise { input, scale } => write!(
                f,
                "Too many decimal places in '{}' (currency allows {})",
                input, scale
            ),
            MoneyParseError::UnsupportedScale(scale) => {
                write!(f, "Unsupported currency scale: {}", scale)
            }
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(amount: i64) -> Money {
        Money::new(amount, 2, "USD")
    }

    #[test]
    fn test_accessors() {
        let m = usd(1050);
        assert_eq!(m.amount(), 1050);
        assert_eq!(m.scale(), 2);
        assert_eq!(m.currency_code(), "USD");
        assert_eq!(m.unit_factor(), 100);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", usd(1050)), "10.50 USD");
        assert_eq!(format!("{}", usd(0)), "0.00 USD");
        assert_eq!(format!("{}", usd(-1050)), "-10.50 USD");
        assert_eq!(format!("{}", usd(5)), "0.05 USD");
        assert_eq!(format!("{}", Money::new(1050, 0, "JPY")), "1050 JPY");
        assert_eq!(format!("{}", Money::new(1, 3, "BHD")), "0.001 BHD");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(usd(1050).format_with_symbol("$"), "$10.50");
        assert_eq!(usd(-5).format_with_symbol("$"), "-$0.05");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50", 2, "USD").unwrap().amount(), 1050);
        assert_eq!(Money::parse("$10.50", 2, "USD").unwrap().amount(), 1050);
        assert_eq!(Money::parse("-10.50", 2, "USD").unwrap().amount(), -1050);
        assert_eq!(Money::parse("10", 2, "USD").unwrap().amount(), 1000);
        assert_eq!(Money::parse("10.5", 2, "USD").unwrap().amount(), 1050);
        assert_eq!(Money::parse("0.05", 2, "USD").unwrap().amount(), 5);
        assert_eq!(Money::parse(".5", 2, "USD").unwrap().amount(), 50);
        assert_eq!(Money::parse("1050", 0, "JPY").unwrap().amount(), 1050);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Money::parse("abc", 2, "USD").is_err());
        assert!(Money::parse("", 2, "USD").is_err());
        assert!(Money::parse("1.2.3", 2, "USD").is_err());
        assert!(matches!(
            Money::parse("10.505", 2, "USD"),
            Err(MoneyParseError::TooPrecise { .. })
        ));
        assert!(Money::parse("10.5", 0, "JPY").is_err());
    }

    #[test]
    fn test_try_new_rejects_large_scale() {
        assert!(Money::try_new(1, MAX_SCALE, "X").is_ok());
        assert!(Money::try_new(1, MAX_SCALE + 1, "X").is_err());
    }

    #[test]
    fn test_checked_add() {
        assert_eq!(usd(1000).checked_add(&usd(500)).unwrap(), usd(1500));

        let eur = Money::new(500, 2, "EUR");
        assert!(matches!(
            usd(1000).checked_add(&eur),
            Err(SplitError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_sum() {
        let amounts = vec![usd(100), usd(200), usd(300)];
        let total = Money::sum(&usd(0), &amounts).unwrap();
        assert_eq!(total.amount(), 600);
    }

    #[test]
    fn test_is_checks() {
        assert!(usd(0).is_zero());
        assert!(usd(100).is_positive());
        assert!(usd(-100).is_negative());
        assert!(usd(100).same_denomination(&usd(5)));
        assert!(!usd(100).same_denomination(&Money::new(100, 0, "USD")));
    }

    #[test]
    fn test_serialization() {
        let m = usd(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"amount":1050,"scale":2,"currency_code":"USD"}"#);

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }

    #[test]
    fn test_deserialize_rejects_large_scale() {
        let json = r#"{"amount":1050,"scale":19,"currency_code":"USD"}"#;
        let err = serde_json::from_str::<Money>(json).unwrap_err();
        assert!(err.to_string().contains("Currency scale 19"));

        let json = r#"{"amount":1,"scale":18,"currency_code":"XTS"}"#;
        let m: Money = serde_json::from_str(json).unwrap();
        assert_eq!(m.unit_factor(), 1_000_000_000_000_000_000);
    }
}
