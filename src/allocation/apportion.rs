//! Largest-remainder apportionment
//!
//! Distributes an integer number of units over a weight vector so that the
//! parts sum exactly to the target: every bucket gets the floor of its ideal
//! share, then the leftover units go one each to the buckets with the largest
//! fractional remainders.
//!
//! Remainders are rounded to [`REMAINDER_DECIMALS`] places before sorting so
//! that float noise in the weights (0.33333333 vs 0.33333334 for what is
//! mathematically the same remainder) cannot reorder buckets. Ties keep their original index
//! order, which makes the result deterministic.

/// Decimal places kept when comparing fractional remainders
pub const REMAINDER_DECIMALS: i32 = 4;

/// Default number of decimal places for [`largest_remainder_round`]
pub const DEFAULT_PRECISION: u32 = 2;

/// Resolution weights are quantized to before apportioning: the largest
/// weight becomes `2^52` and the others keep their ratio to it
const WEIGHT_RESOLUTION: f64 = (1_u64 << 52) as f64;

/// `remainder / divisor` rounded half-up to [`REMAINDER_DECIMALS`] places,
/// as an integer count of those places
fn rounded_remainder(remainder: i128, divisor: i128) -> i128 {
    let places = 10_i128.pow(REMAINDER_DECIMALS as u32);
    (2 * remainder * places + divisor) / (2 * divisor)
}

/// Quantize `weights` to integers with a common scale
///
/// Non-finite weights count as zero.
fn quantize(weights: &[f64]) -> Vec<i128> {
    let largest = weights
        .iter()
        .filter(|w| w.is_finite())
        .fold(0.0_f64, |max, w| max.max(w.abs()));
    if largest == 0.0 {
        return vec![0; weights.len()];
    }

    weights
        .iter()
        .map(|w| {
            if w.is_finite() {
                (w / largest * WEIGHT_RESOLUTION).round() as i128
            } else {
                0
            }
        })
        .collect()
}

/// Apportion `desired_units` integer units over `weights`
///
/// Returns a vector of the same length whose elements sum exactly to
/// `desired_units`. All-zero weights, or a zero target, produce all zeros.
///
/// Floors and remainders are computed in 128-bit integers over the quantized
/// weights, so the sum is exact for every `i64` target.
///
/// # Panics
///
/// Panics if the number of leftover units exceeds the number of buckets,
/// which would mean the floors were computed inconsistently.
pub fn largest_remainder_units(weights: &[f64], desired_units: i64) -> Vec<i64> {
    if weights.is_empty() || desired_units == 0 {
        return vec![0; weights.len()];
    }

    let quantized = quantize(weights);
    let weight_sum: i128 = quantized.iter().sum();
    if weight_sum <= 0 {
        return vec![0; weights.len()];
    }

    let target = i128::from(desired_units);
    let mut floors = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());

    for weight in &quantized {
        let scaled = weight * target;
        floors.push(scaled.div_euclid(weight_sum));
        remainders.push(rounded_remainder(scaled.rem_euclid(weight_sum), weight_sum));
    }

    let deficit = target - floors.iter().sum::<i128>();
    assert!(
        deficit >= 0 && deficit as usize <= weights.len(),
        "apportionment deficit {} outside 0..={} for target {}",
        deficit,
        weights.len(),
        desired_units
    );

    // sort_by is stable, so equal remainders keep index order
    let mut order: Vec<usize> = (0..weights.len()).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]));

    for &index in order.iter().take(deficit as usize) {
        floors[index] += 1;
    }

    // with non-negative weights each part lies between zero and the target
    floors.into_iter().map(|units| units as i64).collect()
}

/// Apportion a decimal `desired_total` over `weights` at `precision` places
///
/// `largest_remainder_round(&[33.33, 33.33, 33.33], 100.0, 2)` yields
/// `[33.34, 33.33, 33.33]`.
pub fn largest_remainder_round(weights: &[f64], desired_total: f64, precision: u32) -> Vec<f64> {
    let factor = 10_f64.powi(precision as i32);
    let desired_units = (desired_total * factor).round() as i64;

    largest_remainder_units(weights, desired_units)
        .into_iter()
        .map(|units| units as f64 / factor)
        .collect()
}

/// Split `total` into `count` near-equal parts at the default precision
///
/// Used to regenerate default Percentage splits (100 over N) and to spread
/// the remaining percentage over untouched participants.
pub fn allocate_by_count(count: usize, total: f64) -> Vec<f64> {
    largest_remainder_round(&vec![1.0; count], total, DEFAULT_PRECISION)
}
