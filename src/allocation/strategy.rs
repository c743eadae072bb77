//! Per-mode split semantics
//!
//! Each `SplitMode` decides what a participant's ratio means, what the ratios
//! default to, which input a participant field accepts, and which constraint
//! the ratios must satisfy. Only Percentage and Amounts carry an expected sum,
//! and only those two take part in redistribution.

use crate::error::{SplitError, SplitResult};
use crate::models::{Money, ParticipantId, Ratios, SplitMode, SplitSpec};

use super::apportion::{allocate_by_count, DEFAULT_PRECISION};
use super::engine::calc_splits;
use super::validation::validate;

/// Total percentage a Percentage split must reach
pub const PERCENT_TOTAL: f64 = 100.0;

/// Decimal places accepted in a percentage field
pub const PERCENT_PRECISION: u32 = DEFAULT_PRECISION;

/// Largest number of fixed-point steps a single field may hold
///
/// Field values are `f64`; above `2^53` they stop being exact integers.
pub const MAX_FIELD_STEPS: i64 = 1 << 53;

/// What kind of per-participant field a mode offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// No per-participant input; everyone is included
    None,
    /// Include/exclude toggle
    Toggle,
    /// Relative weight
    Numeric,
    /// Percent points with two decimals
    Decimal,
    /// Money field in minor units
    Money,
}

/// The sum a constrained mode must reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedSum {
    /// 100 percent points
    Percent,
    /// The transaction total, in minor units
    TotalAmount,
}

impl ExpectedSum {
    /// Expected sum in the mode's unit
    pub fn value(&self, total: &Money) -> f64 {
        match self {
            Self::Percent => PERCENT_TOTAL,
            Self::TotalAmount => total.amount() as f64,
        }
    }

    /// Number of fixed-point steps per unit (hundredths of a percent, whole
    /// minor units)
    pub fn step_factor(&self) -> f64 {
        match self {
            Self::Percent => 10_f64.powi(PERCENT_PRECISION as i32),
            Self::TotalAmount => 1.0,
        }
    }

    /// Convert a ratio into fixed-point steps, saturating at the `i64` range
    pub fn to_steps(&self, value: f64) -> i64 {
        (value * self.step_factor()).round() as i64
    }

    /// Expected sum in fixed-point steps
    pub fn expected_steps(&self, total: &Money) -> i64 {
        match self {
            Self::Percent => self.to_steps(PERCENT_TOTAL),
            Self::TotalAmount => total.amount(),
        }
    }
}

/// Constraint a split's ratios must satisfy to be submittable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Any positive sum
    PositiveSum,
    /// Exactly the expected sum
    ExactSum(ExpectedSum),
}

impl SplitMode {
    /// The validation constraint for this mode
    pub fn constraint(&self) -> Constraint {
        match self {
            Self::Evenly | Self::Selected | Self::Shares => Constraint::PositiveSum,
            Self::Percentage => Constraint::ExactSum(ExpectedSum::Percent),
            Self::Amounts => Constraint::ExactSum(ExpectedSum::TotalAmount),
        }
    }

    /// The expected sum, for modes that have one
    pub fn expected_sum(&self) -> Option<ExpectedSum> {
        match self.constraint() {
            Constraint::PositiveSum => None,
            Constraint::ExactSum(expected) => Some(expected),
        }
    }

    /// Whether editing one participant recomputes the untouched ones
    pub fn is_redistributable(&self) -> bool {
        self.expected_sum().is_some()
    }

    /// The per-participant input this mode accepts
    pub fn input_kind(&self) -> InputKind {
        match self {
            Self::Evenly => InputKind::None,
            Self::Selected => InputKind::Toggle,
            Self::Shares => InputKind::Numeric,
            Self::Percentage => InputKind::Decimal,
            Self::Amounts => InputKind::Money,
        }
    }

    /// Default ratios for a fresh split over `participants`
    pub fn default_ratios(&self, participants: &[ParticipantId]) -> Ratios {
        match self {
            Self::Evenly | Self::Selected | Self::Shares => {
                participants.iter().map(|id| (*id, 1.0)).collect()
            }
            Self::Percentage => participants
                .iter()
                .copied()
                .zip(allocate_by_count(participants.len(), PERCENT_TOTAL))
                .collect(),
            Self::Amounts => participants.iter().map(|id| (*id, 0.0)).collect(),
        }
    }

    /// The weight the allocation engine uses for a stored ratio
    ///
    /// Evenly ignores stored ratios entirely, Selected treats any positive
    /// ratio as "included".
    pub fn effective_ratio(&self, stored: f64) -> f64 {
        match self {
            Self::Evenly => 1.0,
            Self::Selected => {
                if stored > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Shares | Self::Percentage | Self::Amounts => stored,
        }
    }

    /// Check and normalize a value typed into a participant field
    ///
    /// Rejects non-finite and negative values for every mode. Percentages
    /// are rounded to two decimals, amounts must be whole minor units, and
    /// neither may exceed [`MAX_FIELD_STEPS`].
    pub fn normalize_input(&self, field: &str, value: f64) -> SplitResult<f64> {
        if !value.is_finite() {
            return Err(SplitError::malformed(field, "value must be a finite number"));
        }
        if value < 0.0 {
            return Err(SplitError::malformed(field, "value must not be negative"));
        }

        match self.input_kind() {
            InputKind::None => Err(SplitError::malformed(
                field,
                format!("{} splits take no per-participant input", self),
            )),
            InputKind::Toggle => {
                if value == 0.0 || value == 1.0 {
                    Ok(value)
                } else {
                    Err(SplitError::malformed(
                        field,
                        "selection must be 1 (included) or 0 (excluded)",
                    ))
                }
            }
            InputKind::Numeric => Ok(value),
            InputKind::Decimal => {
                check_field_steps(field, value, ExpectedSum::Percent)?;
                let factor = ExpectedSum::Percent.step_factor();
                Ok((value * factor).round() / factor)
            }
            InputKind::Money => {
                check_field_steps(field, value, ExpectedSum::TotalAmount)?;
                if value.fract() != 0.0 {
                    Err(SplitError::malformed(
                        field,
                        "amounts must be whole minor units",
                    ))
                } else {
                    Ok(value)
                }
            }
        }
    }
}

fn check_field_steps(field: &str, value: f64, expected: ExpectedSum) -> SplitResult<()> {
    if value * expected.step_factor() > MAX_FIELD_STEPS as f64 {
        return Err(SplitError::malformed(field, "value is too large"));
    }
    Ok(())
}

/// Ratios to use after switching `spec` to `to_mode`
///
/// Normally the new mode's defaults. A currently valid Shares or Percentage
/// split switched to Amounts keeps its computed amounts instead, so the money
/// each participant owes does not change under the user.
pub fn ratios_after_mode_switch(
    spec: &SplitSpec,
    participants: &[ParticipantId],
    to_mode: SplitMode,
) -> Ratios {
    let carries_over = to_mode == SplitMode::Amounts
        && matches!(spec.mode, SplitMode::Shares | SplitMode::Percentage)
        && validate(spec, participants).is_ok();

    if carries_over {
        calc_splits(participants, &spec.total, &spec.ratios)
            .into_iter()
            .map(|share| (share.participant_id, share.amount.amount() as f64))
            .collect()
    } else {
        to_mode.default_ratios(participants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<ParticipantId> {
        (0..n).map(|_| ParticipantId::new()).collect()
    }

    fn usd(amount: i64) -> Money {
        Money::new(amount, 2, "USD")
    }

    #[test]
    fn test_mode_table() {
        assert_eq!(SplitMode::Evenly.constraint(), Constraint::PositiveSum);
        assert_eq!(SplitMode::Selected.constraint(), Constraint::PositiveSum);
        assert_eq!(SplitMode::Shares.constraint(), Constraint::PositiveSum);
        assert_eq!(
            SplitMode::Percentage.expected_sum(),
            Some(ExpectedSum::Percent)
        );
        assert_eq!(
            SplitMode::Amounts.expected_sum(),
            Some(ExpectedSum::TotalAmount)
        );

        let redistributable: Vec<_> = SplitMode::ALL
            .iter()
            .filter(|m| m.is_redistributable())
            .collect();
        assert_eq!(
            redistributable,
            vec![&SplitMode::Percentage, &SplitMode::Amounts]
        );
    }

    #[test]
    fn test_default_ratios() {
        let p = ids(3);

        let evenly = SplitMode::Evenly.default_ratios(&p);
        assert!(p.iter().all(|id| evenly[id] == 1.0));

        let amounts = SplitMode::Amounts.default_ratios(&p);
        assert!(p.iter().all(|id| amounts[id] == 0.0));

        let pct = SplitMode::Percentage.default_ratios(&p);
        assert_eq!(pct[&p[0]], 33.34);
        assert_eq!(pct[&p[1]], 33.33);
        assert_eq!(pct[&p[2]], 33.33);
    }

    #[test]
    fn test_default_ratios_empty() {
        assert!(SplitMode::Percentage.default_ratios(&[]).is_empty());
    }

    #[test]
    fn test_expected_sum_steps() {
        assert_eq!(ExpectedSum::Percent.expected_steps(&usd(5)), 10_000);
        assert_eq!(ExpectedSum::Percent.to_steps(33.34), 3334);
        assert_eq!(ExpectedSum::TotalAmount.expected_steps(&usd(12345)), 12345);
        assert_eq!(ExpectedSum::TotalAmount.value(&usd(12345)), 12345.0);
    }

    #[test]
    fn test_effective_ratio() {
        assert_eq!(SplitMode::Evenly.effective_ratio(0.0), 1.0);
        assert_eq!(SplitMode::Selected.effective_ratio(1.0), 1.0);
        assert_eq!(SplitMode::Selected.effective_ratio(0.0), 0.0);
        assert_eq!(SplitMode::Shares.effective_ratio(2.5), 2.5);
    }

    #[test]
    fn test_normalize_input_rejects_malformed() {
        for mode in SplitMode::ALL {
            assert!(mode.normalize_input("a", f64::NAN).is_err());
            assert!(mode.normalize_input("a", f64::INFINITY).is_err());
            assert!(mode.normalize_input("a", -1.0).is_err());
        }
        assert!(SplitMode::Evenly.normalize_input("a", 1.0).is_err());
        assert!(SplitMode::Selected.normalize_input("a", 0.5).is_err());
        assert!(SplitMode::Amounts.normalize_input("a", 10.5).is_err());
    }

    #[test]
    fn test_normalize_input_rejects_oversized_fields() {
        assert!(SplitMode::Percentage.normalize_input("a", 1.0e17).is_err());
        assert!(SplitMode::Amounts.normalize_input("a", 9.0e18).is_err());
        assert!(SplitMode::Amounts
            .normalize_input("a", (MAX_FIELD_STEPS + 2) as f64)
            .is_err());

        let largest = MAX_FIELD_STEPS as f64;
        assert_eq!(SplitMode::Amounts.normalize_input("a", largest).unwrap(), largest);
        assert!(SplitMode::Percentage.normalize_input("a", largest / 1000.0).is_ok());
        // shares are relative weights and have no step limit
        assert!(SplitMode::Shares.normalize_input("a", 1.0e300).is_ok());
    }

    #[test]
    fn test_normalize_input_accepts() {
        assert_eq!(SplitMode::Selected.normalize_input("a", 0.0).unwrap(), 0.0);
        assert_eq!(SplitMode::Shares.normalize_input("a", 2.5).unwrap(), 2.5);
        assert_eq!(
            SplitMode::Percentage.normalize_input("a", 33.333).unwrap(),
            33.33
        );
        assert_eq!(SplitMode::Amounts.normalize_input("a", 2500.0).unwrap(), 2500.0);
    }

    #[test]
    fn test_shares_to_amounts_carries_over() {
        let p = ids(3);
        let ratios: Ratios = [(p[0], 1.0), (p[1], 1.0), (p[2], 2.0)].into_iter().collect();
        let spec = SplitSpec::new(SplitMode::Shares, ratios, usd(10000));

        let amounts = ratios_after_mode_switch(&spec, &p, SplitMode::Amounts);
        assert_eq!(amounts[&p[0]], 2500.0);
        assert_eq!(amounts[&p[1]], 2500.0);
        assert_eq!(amounts[&p[2]], 5000.0);
    }

    #[test]
    fn test_invalid_percentage_to_amounts_resets() {
        let p = ids(2);
        let ratios: Ratios = [(p[0], 30.0), (p[1], 30.0)].into_iter().collect();
        let spec = SplitSpec::new(SplitMode::Percentage, ratios, usd(10000));

        let amounts = ratios_after_mode_switch(&spec, &p, SplitMode::Amounts);
        assert!(p.iter().all(|id| amounts[id] == 0.0));
    }

    #[test]
    fn test_evenly_to_amounts_resets() {
        let p = ids(2);
        let spec = SplitSpec::new(
            SplitMode::Evenly,
            SplitMode::Evenly.default_ratios(&p),
            usd(10000),
        );

        let amounts = ratios_after_mode_switch(&spec, &p, SplitMode::Amounts);
        assert!(p.iter().all(|id| amounts[id] == 0.0));
    }

    #[test]
    fn test_switch_to_percentage_uses_defaults() {
        let p = ids(4);
        let spec = SplitSpec::new(
            SplitMode::Shares,
            SplitMode::Shares.default_ratios(&p),
            usd(10000),
        );

        let pct = ratios_after_mode_switch(&spec, &p, SplitMode::Percentage);
        assert!(p.iter().all(|id| pct[id] == 25.0));
    }
}
