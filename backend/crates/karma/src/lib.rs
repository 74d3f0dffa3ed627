//! Karma scoring arithmetic.
//!
//! Karma is the percentage of upvotes among all votes cast across a
//! student's reviews. The score is always recomputed in full from the
//! current tallies rather than adjusted incrementally, so the stored value
//! can never drift from the true aggregate.
//!
//! This crate is pure arithmetic: no I/O, no persistence, no framework
//! types. Callers supply tallies; the crate returns a score.

/// Score a single pair of vote tallies.
///
/// Returns `100 * upvotes / (upvotes + downvotes)`, or `0.0` when no votes
/// have been cast. The result is always finite and within `0.0..=100.0`.
///
/// # Examples
/// ```
/// assert_eq!(karma::score(1, 0), 100.0);
/// assert_eq!(karma::score(1, 1), 50.0);
/// assert_eq!(karma::score(0, 0), 0.0);
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "vote totals are far below 2^52; the conversion is exact in practice"
)]
pub fn score(upvotes: u64, downvotes: u64) -> f64 {
    let total = upvotes.saturating_add(downvotes);
    if total == 0 {
        return 0.0;
    }
    100.0 * (upvotes as f64) / (total as f64)
}

/// Score an aggregate of per-review `(upvotes, downvotes)` tallies.
///
/// Tallies are summed before the ratio is taken, so one heavily voted
/// review weighs more than several barely voted ones.
///
/// # Examples
/// ```
/// // Two reviews: (3 up, 1 down) and (1 up, 3 down) -> 4 up of 8 votes.
/// assert_eq!(karma::score_tallies([(3, 1), (1, 3)]), 50.0);
/// assert_eq!(karma::score_tallies([]), 0.0);
/// ```
#[must_use]
pub fn score_tallies<I>(tallies: I) -> f64
where
    I: IntoIterator<Item = (u64, u64)>,
{
    let (upvotes, downvotes) = tallies.into_iter().fold(
        (0_u64, 0_u64),
        |(up_acc, down_acc), (up, down)| {
            (up_acc.saturating_add(up), down_acc.saturating_add(down))
        },
    );
    score(upvotes, downvotes)
}
