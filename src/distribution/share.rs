//! Partitioning of a generation's ants across workers.

use std::ops::Range;

/// Number of ants `rank` constructs when `ant_count` ants are spread over
/// `workers` workers.
///
/// Every worker gets `ant_count / workers`; the last rank also takes the
/// remainder, so the shares always sum to `ant_count`.
///
/// ```
/// use u_antcolony::distribution::ant_share;
///
/// let shares: Vec<usize> = (0..3).map(|r| ant_share(10, 3, r)).collect();
/// assert_eq!(shares, vec![3, 3, 4]);
/// ```
pub fn ant_share(ant_count: usize, workers: usize, rank: usize) -> usize {
    ant_range(ant_count, workers, rank).len()
}

/// Global ant indices owned by `rank`.
///
/// Ranges are contiguous and ordered by rank, so concatenating the ants of
/// ranks `0..workers` yields global index order. A `rank` outside
/// `0..workers` (or `workers == 0`) owns nothing.
pub fn ant_range(ant_count: usize, workers: usize, rank: usize) -> Range<usize> {
    if workers == 0 || rank >= workers {
        return 0..0;
    }
    let base = ant_count / workers;
    let start = rank * base;
    if rank == workers - 1 {
        start..ant_count
    } else {
        start..start + base
    }
}
