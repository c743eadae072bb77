//! Property tests for the allocation engine
//!
//! 1. **Sum invariant**: shares add up to the total for any non-negative
//!    ratio vector with at least one positive entry.
//! 2. **Determinism**: the same inputs always give the same shares.
//! 3. **Closeness**: every share is within one minor unit of its ideal
//!    proportional value.
//! 4. **Redistribution**: a single edit in an exact-sum mode always leaves
//!    the split valid.
//! 5. **Large values**: totals up to `i64::MAX` still apportion exactly, and
//!    field values near the step limit validate without overflowing.

use proptest::prelude::*;

use splitsheet::allocation::{
    allocate_by_count, calc_splits, SplitSession, ValidationFailure, MAX_FIELD_STEPS,
};
use splitsheet::models::{shares_total, Money, ParticipantId, Ratios, SplitMode};

fn participants(n: usize) -> Vec<ParticipantId> {
    (0..n).map(|_| ParticipantId::new()).collect()
}

fn ratios_for(ids: &[ParticipantId], weights: &[u32]) -> Ratios {
    ids.iter()
        .copied()
        .zip(weights.iter().map(|w| f64::from(*w)))
        .collect()
}

fn weights_with_positive() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..1000, 1..20).prop_filter("at least one positive weight", |w| {
        w.iter().any(|x| *x > 0)
    })
}

proptest! {
    #[test]
    fn shares_sum_to_total(weights in weights_with_positive(), total in 0i64..10_000_000_000) {
        let ids = participants(weights.len());
        let money = Money::new(total, 2, "USD");

        let shares = calc_splits(&ids, &money, &ratios_for(&ids, &weights));

        prop_assert_eq!(shares.len(), ids.len());
        prop_assert_eq!(shares_total(&shares), total);
        for (share, id) in shares.iter().zip(&ids) {
            prop_assert_eq!(share.participant_id, *id);
            prop_assert!(share.amount.amount() >= 0);
        }
    }

    #[test]
    fn shares_sum_to_any_i64_total(weights in weights_with_positive(), total in 0i64..=i64::MAX) {
        let ids = participants(weights.len());
        let money = Money::new(total, 2, "USD");

        let shares = calc_splits(&ids, &money, &ratios_for(&ids, &weights));

        let sum: i128 = shares.iter().map(|s| i128::from(s.amount.amount())).sum();
        prop_assert_eq!(sum, i128::from(total));
        prop_assert!(shares.iter().all(|s| s.amount.amount() >= 0));
    }

    #[test]
    fn shares_are_deterministic(weights in weights_with_positive(), total in 0i64..1_000_000) {
        let ids = participants(weights.len());
        let money = Money::new(total, 2, "USD");
        let ratios = ratios_for(&ids, &weights);

        prop_assert_eq!(
            calc_splits(&ids, &money, &ratios),
            calc_splits(&ids, &money, &ratios)
        );
    }

    #[test]
    fn shares_stay_within_one_unit_of_ideal(
        weights in weights_with_positive(),
        total in 0i64..1_000_000,
    ) {
        let ids = participants(weights.len());
        let money = Money::new(total, 2, "USD");
        let weight_sum: f64 = weights.iter().map(|w| f64::from(*w)).sum();

        let shares = calc_splits(&ids, &money, &ratios_for(&ids, &weights));

        for (share, weight) in shares.iter().zip(&weights) {
            let ideal = f64::from(*weight) / weight_sum * total as f64;
            prop_assert!((share.amount.amount() as f64 - ideal).abs() < 1.0 + 1e-6);
        }
    }

    #[test]
    fn all_zero_ratios_give_zero_shares(n in 1usize..20, total in 0i64..1_000_000) {
        let ids = participants(n);
        let money = Money::new(total, 2, "USD");

        let shares = calc_splits(&ids, &money, &ratios_for(&ids, &vec![0; n]));

        prop_assert!(shares.iter().all(|s| s.amount.is_zero()));
    }

    #[test]
    fn percentage_edit_stays_valid(n in 2usize..10, hundredths in 0i64..10_000) {
        let ids = participants(n);
        let mut session =
            SplitSession::with_mode(ids.clone(), Money::new(10_000, 2, "USD"), SplitMode::Percentage);

        session.commit(ids[0], hundredths as f64 / 100.0).unwrap();

        prop_assert!(session.validate().is_ok());
        prop_assert_eq!(shares_total(&session.shares()), 10_000);
    }

    #[test]
    fn amounts_edit_stays_valid(n in 2usize..10, total in 1i64..10_000_000, pick in 0.0f64..1.0) {
        let ids = participants(n);
        let mut session =
            SplitSession::with_mode(ids.clone(), Money::new(total, 2, "USD"), SplitMode::Amounts);
        let typed = (total as f64 * pick).floor();

        session.commit(ids[n - 1], typed).unwrap();

        prop_assert!(session.validate().is_ok());
        prop_assert_eq!(session.ratio(ids[n - 1]), typed);
        prop_assert_eq!(shares_total(&session.shares()), total);
    }

    #[test]
    fn amounts_edit_near_the_step_limit_stays_valid(
        n in 2usize..6,
        below_limit in 0i64..1_000_000,
        pick in 0.0f64..1.0,
    ) {
        let total = MAX_FIELD_STEPS - below_limit;
        let ids = participants(n);
        let mut session =
            SplitSession::with_mode(ids.clone(), Money::new(total, 2, "USD"), SplitMode::Amounts);
        let typed = (total as f64 * pick).floor();

        session.commit(ids[0], typed).unwrap();

        prop_assert!(session.validate().is_ok());
        prop_assert_eq!(shares_total(&session.shares()), total);
    }

    #[test]
    fn large_committed_values_validate_without_overflow(
        a in 0i64..=MAX_FIELD_STEPS,
        b in 0i64..=MAX_FIELD_STEPS,
        hundredths in 0i64..=MAX_FIELD_STEPS / 2,
    ) {
        let ids = participants(2);
        let mut amounts =
            SplitSession::with_mode(ids.clone(), Money::new(10_000, 2, "USD"), SplitMode::Amounts);
        amounts.commit(ids[0], a as f64).unwrap();
        amounts.commit(ids[1], b as f64).unwrap();

        let expected = 10_000 - i128::from(a) - i128::from(b);
        match amounts.validate() {
            Ok(()) => prop_assert_eq!(expected, 0),
            Err(ValidationFailure::TooMuch { .. }) => prop_assert!(expected < 0),
            Err(ValidationFailure::NotEnough { .. }) => prop_assert!(expected > 0),
            Err(other) => prop_assert!(false, "unexpected failure {:?}", other),
        }

        let mut percentage =
            SplitSession::with_mode(ids.clone(), Money::new(10_000, 2, "USD"), SplitMode::Percentage);
        let percent = hundredths as f64 / 100.0;
        percentage.commit(ids[0], percent).unwrap();
        percentage.commit(ids[1], percent).unwrap();
        let _ = percentage.validate();
    }
}

#[test]
fn oversized_commits_are_rejected_and_leave_the_session_alone() {
    let ids = participants(2);
    let mut session =
        SplitSession::with_mode(ids.clone(), Money::new(10_000, 2, "USD"), SplitMode::Amounts);

    assert!(session.commit(ids[0], 9.0e18).is_err());
    assert!(session.commit(ids[1], 9.0e18).is_err());
    assert_eq!(session.ratio(ids[0]), 0.0);
    assert!(!session.dirty_state().is_dirty(ids[0]));

    session.set_mode(SplitMode::Percentage);
    assert!(session.commit(ids[0], 1.0e17).is_err());
    assert!(session.validate().is_ok());
}

#[test]
fn totals_beyond_float_precision_split_exactly() {
    let ids = participants(3);
    let total = (1_i64 << 60) + 12_345;
    let session = SplitSession::new(ids, Money::new(total, 2, "USD"));

    let shares = session.shares();
    assert_eq!(shares_total(&shares), total);
    assert!(session.validate().is_ok());
    assert_eq!(shares[0].amount.amount(), total / 3 + 1);
}

#[test]
fn allocate_by_count_is_exact_for_small_counts() {
    for count in 1..50 {
        let parts = allocate_by_count(count, 100.0);
        let hundredths: i64 = parts.iter().map(|p| (p * 100.0).round() as i64).sum();
        assert_eq!(hundredths, 10_000, "count {}", count);
    }
}

#[test]
fn percentage_redistribution_converges() {
    let ids = participants(3);
    let mut session =
        SplitSession::with_mode(ids.clone(), Money::new(10_000, 2, "USD"), SplitMode::Percentage);

    session.commit(ids[0], 30.0).unwrap();
    assert_eq!(session.ratio(ids[1]), 35.0);
    assert_eq!(session.ratio(ids[2]), 35.0);

    session.commit(ids[1], 50.0).unwrap();
    assert_eq!(session.ratio(ids[0]), 30.0);
    assert_eq!(session.ratio(ids[2]), 20.0);
    assert!(session.validate().is_ok());
}

#[test]
fn shares_carry_over_into_amounts() {
    let ids = participants(3);
    let mut session =
        SplitSession::with_mode(ids.clone(), Money::new(10_000, 2, "USD"), SplitMode::Shares);
    session.commit(ids[2], 2.0).unwrap();

    session.set_mode(SplitMode::Amounts);

    assert_eq!(session.ratio(ids[0]), 2500.0);
    assert_eq!(session.ratio(ids[1]), 2500.0);
    assert_eq!(session.ratio(ids[2]), 5000.0);
    assert!(session.validate().is_ok());
}
