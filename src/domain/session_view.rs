//! Broadcast-ready snapshot of a room.
//!
//! A [`SessionView`] is always derived from the current [`super::Room`]
//! state and never stored, so what clients see cannot drift from what the
//! room holds.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Average reported when no vote parses as a number.
pub const NOT_APPLICABLE: &str = "N/A";

/// One row of the participant list shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ParticipantView {
    /// Display name.
    pub nickname: String,
    /// Whether the participant only observes.
    pub is_observer: bool,
    /// Whether the participant currently has a vote recorded.
    pub has_voted: bool,
    /// Creator flag captured at join time.
    pub is_creator: bool,
}

/// Derived view of a room sent in `session_state` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionView {
    /// Participants in join order.
    pub participants: Vec<ParticipantView>,
    /// At least one non-observer exists and every non-observer has voted.
    pub all_voted: bool,
    /// Whether votes have been revealed.
    pub revealed: bool,
    /// Votes keyed by nickname; only present once revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub votes: Option<BTreeMap<String, String>>,
    /// Average of numeric votes with one decimal, or `"N/A"`; only present
    /// once revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_vote: Option<String>,
}

/// Formats the mean of all numeric votes to one decimal place.
///
/// Votes that do not parse as a finite number (e.g. `"?"`) are skipped
/// individually. Returns [`NOT_APPLICABLE`] when nothing is numeric.
#[must_use]
pub fn format_average<'a, I>(votes: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let (sum, count) = votes
        .into_iter()
        .filter_map(|vote| vote.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .fold((0.0_f64, 0_u32), |(sum, count), value| {
            (sum + value, count.saturating_add(1))
        });

    if count == 0 {
        return NOT_APPLICABLE.to_string();
    }
    format!("{:.1}", sum / f64::from(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_mixed_numbers() {
        assert_eq!(format_average(["5", "8", "13"]), "8.7");
    }

    #[test]
    fn average_of_only_unknowns_is_not_applicable() {
        assert_eq!(format_average(["?", "?"]), NOT_APPLICABLE);
    }

    #[test]
    fn average_skips_non_numeric_votes() {
        assert_eq!(format_average(["5", "?"]), "5.0");
    }

    #[test]
    fn average_of_nothing_is_not_applicable() {
        assert_eq!(format_average(std::iter::empty()), NOT_APPLICABLE);
    }

    #[test]
    fn average_ignores_non_finite_and_trims() {
        assert_eq!(format_average([" 3 ", "inf", "NaN", "1"]), "2.0");
    }

    #[test]
    fn hidden_view_omits_votes() {
        let view = SessionView {
            participants: Vec::new(),
            all_voted: false,
            revealed: false,
            votes: None,
            average_vote: None,
        };
        let json = serde_json::to_value(&view).unwrap_or_default();
        assert!(json.get("votes").is_none());
        assert!(json.get("average_vote").is_none());
        assert_eq!(json.get("revealed"), Some(&serde_json::Value::Bool(false)));
    }
}
