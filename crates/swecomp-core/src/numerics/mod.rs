//! Finite-safe summation helpers for the conservation diagnostic.
//!
//! The diagnostic exists to detect mass drift between machine epsilon and
//! roughly 1e-3 relative error, so every total goes through compensated
//! (Neumaier) summation rather than naive sequential addition. Plain Kahan
//! drops the correction when a later addend cancels the running sum;
//! Neumaier keeps it by comparing magnitudes and folding the accumulated
//! correction in at the end.

fn neumaier_add(sum: &mut f64, correction: &mut f64, value: f64) {
    let next = *sum + value;
    if sum.abs() >= value.abs() {
        *correction += (*sum - next) + value;
    } else {
        *correction += (value - next) + *sum;
    }
    *sum = next;
}

/// Compensated sum over all elements, non-finite values included.
pub fn stable_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut correction = 0.0;
    for &value in values {
        neumaier_add(&mut sum, &mut correction, value);
    }
    sum + correction
}

/// Compensated sum over the finite elements only.
///
/// Returns NaN when the slice is empty or contains no finite element, so
/// downstream arithmetic can detect "no usable data" without a fallible
/// return type.
pub fn finite_sum(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut correction = 0.0;
    let mut any_finite = false;
    for &value in values {
        if value.is_finite() {
            neumaier_add(&mut sum, &mut correction, value);
            any_finite = true;
        }
    }
    if any_finite { sum + correction } else { f64::NAN }
}

/// Compensated sum of pairwise products, skipping non-finite products.
///
/// Extra elements in the longer slice are ignored; NaN when no finite
/// product exists.
pub fn finite_weighted_sum(values: &[f64], weights: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut correction = 0.0;
    let mut any_finite = false;
    for (&value, &weight) in values.iter().zip(weights) {
        let product = value * weight;
        if product.is_finite() {
            neumaier_add(&mut sum, &mut correction, product);
            any_finite = true;
        }
    }
    if any_finite { sum + correction } else { f64::NAN }
}

/// Cell widths from a coordinate array: `x[i+1] - x[i]`.
pub fn cell_widths(coordinates: &[f64]) -> Vec<f64> {
    coordinates
        .windows(2)
        .map(|window| window[1] - window[0])
        .collect()
}
