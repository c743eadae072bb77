//! Split validation
//!
//! Decides whether a split's ratios satisfy its mode's constraint and, when
//! they don't, by how much and in which direction. Exact-sum modes are
//! compared in fixed-point steps (hundredths of a percent, or minor units),
//! so summing `33.34 + 33.33 + 33.33` in floating point cannot turn a valid
//! split invalid.

use std::fmt;

use crate::models::{Money, ParticipantId, SplitSpec};

use super::strategy::{Constraint, ExpectedSum, PERCENT_PRECISION};

/// A quantity in the unit of a split mode
#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    /// Percent points
    Percent(f64),
    /// Money in the transaction currency
    Amount(Money),
}

impl Quantity {
    fn from_steps(expected: ExpectedSum, steps: i128, total: &Money) -> Self {
        match expected {
            ExpectedSum::Percent => Quantity::Percent(steps as f64 / expected.step_factor()),
            ExpectedSum::TotalAmount => {
                let amount = i64::try_from(steps)
                    .unwrap_or(if steps < 0 { i64::MIN } else { i64::MAX });
                Quantity::Amount(total.with_amount(amount))
            }
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Percent(p) => write!(f, "{:.*}%", PERCENT_PRECISION as usize, p),
            Quantity::Amount(m) => write!(f, "{}", m),
        }
    }
}

/// Why a split cannot be submitted
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    /// Nothing is allocated to anybody
    NothingAllocated,
    /// More than the expected sum is allocated; `excess` must be removed
    TooMuch { excess: Quantity },
    /// Less than the expected sum is allocated; `missing` must be added
    NotEnough { missing: Quantity },
}

impl ValidationFailure {
    /// `expected − allocated` in the mode's unit (negative when over)
    pub fn diff(&self) -> f64 {
        match self {
            Self::NothingAllocated => 0.0,
            Self::TooMuch { excess } => -quantity_value(excess),
            Self::NotEnough { missing } => quantity_value(missing),
        }
    }
}

fn quantity_value(q: &Quantity) -> f64 {
    match q {
        Quantity::Percent(p) => *p,
        Quantity::Amount(m) => m.amount() as f64,
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingAllocated => write!(f, "Nothing is allocated to any participant"),
            Self::TooMuch { excess } => {
                write!(f, "Too much allocated: remove {}", excess)
            }
            Self::NotEnough { missing } => {
                write!(f, "Not enough allocated: add {}", missing)
            }
        }
    }
}

/// Check `spec` against its mode's constraint
pub fn validate(spec: &SplitSpec, participants: &[ParticipantId]) -> Result<(), ValidationFailure> {
    match spec.mode.constraint() {
        Constraint::PositiveSum => {
            let sum: f64 = participants
                .iter()
                .map(|id| spec.mode.effective_ratio(spec.ratio(*id)))
                .sum();
            if sum > 0.0 {
                Ok(())
            } else {
                Err(ValidationFailure::NothingAllocated)
            }
        }
        Constraint::ExactSum(expected) => {
            let allocated = allocated_steps(spec, participants, expected);
            let diff = i128::from(expected.expected_steps(&spec.total)) - allocated;
            match diff {
                0 => Ok(()),
                d if d < 0 => Err(ValidationFailure::TooMuch {
                    excess: Quantity::from_steps(expected, -d, &spec.total),
                }),
                d => Err(ValidationFailure::NotEnough {
                    missing: Quantity::from_steps(expected, d, &spec.total),
                }),
            }
        }
    }
}

/// Whether `spec` may be submitted
pub fn is_valid(spec: &SplitSpec, participants: &[ParticipantId]) -> bool {
    validate(spec, participants).is_ok()
}

/// Allocated total of an exact-sum split, in the mode's unit
pub fn allocated_total(spec: &SplitSpec, participants: &[ParticipantId]) -> Option<Quantity> {
    let expected = spec.mode.expected_sum()?;
    let steps = allocated_steps(spec, participants, expected);
    Some(Quantity::from_steps(expected, steps, &spec.total))
}

// i128 so that no number of saturated fields can overflow
fn allocated_steps(spec: &SplitSpec, participants: &[ParticipantId], expected: ExpectedSum) -> i128 {
    participants
        .iter()
        .map(|id| i128::from(expected.to_steps(spec.ratio(*id))))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Ratios, SplitMode};

    fn ids(n: usize) -> Vec<ParticipantId> {
        (0..n).map(|_| ParticipantId::new()).collect()
    }

    fn usd(amount: i64) -> Money {
        Money::new(amount, 2, "USD")
    }

    fn spec(mode: SplitMode, p: &[ParticipantId], values: &[f64], total: i64) -> SplitSpec {
        let ratios: Ratios = p.iter().copied().zip(values.iter().copied()).collect();
        SplitSpec::new(mode, ratios, usd(total))
    }

    #[test]
    fn test_positive_sum_modes() {
        let p = ids(2);
        assert!(is_valid(&spec(SplitMode::Shares, &p, &[0.0, 0.5], 100), &p));
        assert_eq!(
            validate(&spec(SplitMode::Shares, &p, &[0.0, 0.0], 100), &p),
            Err(ValidationFailure::NothingAllocated)
        );
        assert_eq!(
            validate(&spec(SplitMode::Selected, &p, &[0.0, 0.0], 100), &p),
            Err(ValidationFailure::NothingAllocated)
        );
    }

    #[test]
    fn test_evenly_needs_participants() {
        let p = ids(2);
        assert!(is_valid(&spec(SplitMode::Evenly, &p, &[1.0, 1.0], 100), &p));
        assert_eq!(
            validate(&spec(SplitMode::Evenly, &[], &[], 100), &[]),
            Err(ValidationFailure::NothingAllocated)
        );
    }

    #[test]
    fn test_amounts_too_low() {
        let p = ids(2);
        let failure = validate(&spec(SplitMode::Amounts, &p, &[4000.0, 5000.0], 10000), &p)
            .unwrap_err();
        assert_eq!(
            failure,
            ValidationFailure::NotEnough {
                missing: Quantity::Amount(usd(1000))
            }
        );
        assert_eq!(failure.diff(), 1000.0);
        assert_eq!(failure.to_string(), "Not enough allocated: add 10.00 USD");
    }

    #[test]
    fn test_amounts_too_high() {
        let p = ids(2);
        let failure = validate(&spec(SplitMode::Amounts, &p, &[6000.0, 5000.0], 10000), &p)
            .unwrap_err();
        assert_eq!(
            failure,
            ValidationFailure::TooMuch {
                excess: Quantity::Amount(usd(1000))
            }
        );
        assert_eq!(failure.diff(), -1000.0);
        assert_eq!(failure.to_string(), "Too much allocated: remove 10.00 USD");
    }

    #[test]
    fn test_amounts_exact() {
        let p = ids(2);
        assert!(is_valid(&spec(SplitMode::Amounts, &p, &[2500.0, 7500.0], 10000), &p));
    }

    #[test]
    fn test_percentage_thirds_are_exact() {
        let p = ids(3);
        let s = spec(SplitMode::Percentage, &p, &[33.34, 33.33, 33.33], 999);
        assert!(is_valid(&s, &p));
        assert_eq!(allocated_total(&s, &p), Some(Quantity::Percent(100.0)));
    }

    #[test]
    fn test_percentage_diagnostics() {
        let p = ids(3);
        let over = validate(&spec(SplitMode::Percentage, &p, &[30.0, 50.0, 35.0], 100), &p)
            .unwrap_err();
        assert_eq!(over.to_string(), "Too much allocated: remove 15.00%");
        assert_eq!(over.diff(), -15.0);

        let under = validate(&spec(SplitMode::Percentage, &p, &[30.0, 20.0, 0.5], 100), &p)
            .unwrap_err();
        assert_eq!(under.to_string(), "Not enough allocated: add 49.50%");
    }

    #[test]
    fn test_huge_ratios_report_too_much() {
        let p = ids(2);
        let amounts = spec(SplitMode::Amounts, &p, &[9.0e18, 9.0e18], 10000);
        match validate(&amounts, &p) {
            Err(ValidationFailure::TooMuch {
                excess: Quantity::Amount(m),
            }) => assert_eq!(m.amount(), i64::MAX),
            other => panic!("unexpected result: {:?}", other),
        }

        let pct = spec(SplitMode::Percentage, &p, &[1.0e17, 1.0e17], 100);
        let failure = validate(&pct, &p).unwrap_err();
        assert!(matches!(failure, ValidationFailure::TooMuch { .. }));
        assert!(failure.diff() < -1.0e17);
    }

    #[test]
    fn test_allocated_total_none_for_unconstrained() {
        let p = ids(1);
        assert_eq!(
            allocated_total(&spec(SplitMode::Shares, &p, &[1.0], 100), &p),
            None
        );
    }
}
