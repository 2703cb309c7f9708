//! Binary search over a monotone feasibility predicate.

use std::convert::Infallible;
use std::ops::RangeInclusive;

/// Smallest value in `range` for which `feasible` holds.
///
/// `feasible` must be monotone: once true, true for every larger value.
/// Returns `None` when it is false even at the upper end.
///
/// ```
/// use aoc_solutions::utils::search::min_feasible;
///
/// assert_eq!(min_feasible(0..=100, |t| t * t >= 50), Some(8));
/// assert_eq!(min_feasible(0..=5, |t| t > 5), None);
/// ```
pub fn min_feasible<F>(range: RangeInclusive<u32>, mut feasible: F) -> Option<u32>
where
    F: FnMut(u32) -> bool,
{
    match try_min_feasible(range, |t| Ok::<_, Infallible>(feasible(t))) {
        Ok(found) => found,
        Err(never) => match never {},
    }
}

/// Fallible [`min_feasible`]: the first predicate error aborts the search.
pub fn try_min_feasible<F, E>(range: RangeInclusive<u32>, mut feasible: F) -> Result<Option<u32>, E>
where
    F: FnMut(u32) -> Result<bool, E>,
{
    let (mut lo, mut hi) = range.into_inner();
    if lo > hi || !feasible(hi)? {
        return Ok(None);
    }

    // Invariant: feasible(hi) holds; answer is in lo..=hi
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if feasible(mid)? {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(Some(hi))
}
