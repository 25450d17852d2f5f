//! Utility functions for the crate.

use core::cmp::Ordering;

/// Return the index and value of the minimum value in the given values.
///
/// NAN values are ordered as greater than all other values. Ties resolve to
/// the first (lowest) index.
///
/// This will return `None` if there are no values.
pub fn arg_min<T: PartialOrd + Copy, I: IntoIterator<Item = T>>(values: I) -> Option<(usize, T)> {
    values
        .into_iter()
        .enumerate()
        .min_by(|&(_, l), &(_, r)| {
            l.partial_cmp(&r).unwrap_or_else(|| {
                // only NAN is incomparable with itself
                if r.partial_cmp(&r).is_none() {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            })
        })
}

/// Return the mean value of the given values, or `None` if there are none.
#[allow(clippy::cast_precision_loss)]
pub fn mean<I: IntoIterator<Item = f32>>(values: I) -> Option<f32> {
    let (sum, count) = values
        .into_iter()
        .fold((0_f32, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f32)
    }
}

/// Whether `a` and `b` agree within a relative tolerance.
///
/// The tolerance is scaled by `1 + max(|a|, |b|)` so that values near zero are
/// compared absolutely.
#[must_use]
pub fn approx_eq_rel(a: f32, b: f32, rel_tol: f32) -> bool {
    a == b || (a - b).abs() <= rel_tol * (1. + a.abs().max(b.abs()))
}
