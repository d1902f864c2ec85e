//! Vote vocabulary offered to clients.

/// Card values shown to voters: a modified Fibonacci sequence plus `"?"`
/// for "no idea".
///
/// The coordinator does not validate incoming votes against this list;
/// any string is stored as-is.
pub const VOTE_POINTS: [&str; 9] = ["1", "2", "3", "5", "8", "13", "21", "34", "?"];

/// Returns `true` if `vote` is one of the [`VOTE_POINTS`].
#[must_use]
pub fn is_standard_point(vote: &str) -> bool {
    VOTE_POINTS.contains(&vote)
}
