//! Vote directions, tallies, and the toggle state machine.
//!
//! A voter holds at most one ledger entry per subject. Casting a vote walks
//! the transition table below; the counter deltas it yields keep the
//! denormalised tally equal to the ledger.
//!
//! | existing | requested | transition | ledger after |
//! |----------|-----------|------------|--------------|
//! | none     | up        | cast up    | up           |
//! | up       | up        | retract up | none         |
//! | up       | down      | switch     | down         |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Error;

/// Direction of a single vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    /// Up vote.
    Up,
    /// Down vote.
    Down,
}

impl VoteDirection {
    /// Storage and wire token.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = Error;

    /// Parse `up` or `down`, ignoring case. `none` is not a direction.
    ///
    /// # Examples
    /// ```
    /// use social_backend::domain::VoteDirection;
    ///
    /// assert_eq!("UP".parse::<VoteDirection>().ok(), Some(VoteDirection::Up));
    /// assert!("none".parse::<VoteDirection>().is_err());
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.eq_ignore_ascii_case("up") {
            Ok(Self::Up)
        } else if raw.eq_ignore_ascii_case("down") {
            Ok(Self::Down)
        } else {
            Err(Error::invalid_request(format!(
                "Invalid vote type '{raw}': expected 'up' or 'down'"
            ))
            .with_details(serde_json::json!({ "field": "vote", "value": raw })))
        }
    }
}

/// Denormalised up and down counters of a subject.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VoteTally {
    /// Number of up votes.
    pub up: u32,
    /// Number of down votes.
    pub down: u32,
}

impl VoteTally {
    /// Build a tally from its counters.
    pub fn new(up: u32, down: u32) -> Self {
        Self { up, down }
    }

    /// Net score: up votes minus down votes.
    pub fn total(&self) -> i64 {
        i64::from(self.up) - i64::from(self.down)
    }

    /// Apply counter deltas, returning `None` if a counter would go negative.
    pub fn apply(self, (delta_up, delta_down): (i32, i32)) -> Option<Self> {
        Some(Self {
            up: self.up.checked_add_signed(delta_up)?,
            down: self.down.checked_add_signed(delta_down)?,
        })
    }
}

/// The state change a vote request causes on the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// No entry existed; one is created.
    Cast(VoteDirection),
    /// The same direction was repeated; the entry is removed.
    Retract(VoteDirection),
    /// The opposite direction was requested; the entry flips.
    Switch {
        /// Previous direction.
        from: VoteDirection,
        /// New direction.
        to: VoteDirection,
    },
}

impl VoteTransition {
    /// Decide the transition from the voter's existing entry.
    ///
    /// # Examples
    /// ```
    /// use social_backend::domain::{VoteDirection, VoteTransition};
    ///
    /// let t = VoteTransition::resolve(Some(VoteDirection::Up), VoteDirection::Up);
    /// assert_eq!(t, VoteTransition::Retract(VoteDirection::Up));
    /// assert_eq!(t.resulting_direction(), None);
    /// ```
    pub fn resolve(existing: Option<VoteDirection>, requested: VoteDirection) -> Self {
        match existing {
            None => Self::Cast(requested),
            Some(current) if current == requested => Self::Retract(current),
            Some(current) => Self::Switch {
                from: current,
                to: requested,
            },
        }
    }

    /// Counter adjustments as `(up, down)`.
    pub fn counter_deltas(self) -> (i32, i32) {
        match self {
            Self::Cast(direction) => unit(direction, 1),
            Self::Retract(direction) => unit(direction, -1),
            Self::Switch { from, to } => {
                let (from_up, from_down) = unit(from, -1);
                let (to_up, to_down) = unit(to, 1);
                (from_up + to_up, from_down + to_down)
            }
        }
    }

    /// The voter's ledger entry once the transition is applied.
    pub fn resulting_direction(self) -> Option<VoteDirection> {
        match self {
            Self::Cast(direction) | Self::Switch { to: direction, .. } => Some(direction),
            Self::Retract(_) => None,
        }
    }
}

fn unit(direction: VoteDirection, sign: i32) -> (i32, i32) {
    match direction {
        VoteDirection::Up => (sign, 0),
        VoteDirection::Down => (0, sign),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    use VoteDirection::{Down, Up};

    #[rstest]
    #[case("up", Up)]
    #[case("Up", Up)]
    #[case("DOWN", Down)]
    fn parses_directions_case_insensitively(#[case] raw: &str, #[case] expected: VoteDirection) {
        assert_eq!(raw.parse::<VoteDirection>().expect("valid"), expected);
    }

    #[rstest]
    #[case("none")]
    #[case("")]
    #[case("sideways")]
    fn rejects_other_tokens(#[case] raw: &str) {
        let err = raw.parse::<VoteDirection>().expect_err("invalid token");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(None, Up, VoteTransition::Cast(Up), (1, 0), Some(Up))]
    #[case(None, Down, VoteTransition::Cast(Down), (0, 1), Some(Down))]
    #[case(Some(Up), Up, VoteTransition::Retract(Up), (-1, 0), None)]
    #[case(Some(Down), Down, VoteTransition::Retract(Down), (0, -1), None)]
    #[case(Some(Up), Down, VoteTransition::Switch { from: Up, to: Down }, (-1, 1), Some(Down))]
    #[case(Some(Down), Up, VoteTransition::Switch { from: Down, to: Up }, (1, -1), Some(Up))]
    fn transition_table(
        #[case] existing: Option<VoteDirection>,
        #[case] requested: VoteDirection,
        #[case] transition: VoteTransition,
        #[case] deltas: (i32, i32),
        #[case] after: Option<VoteDirection>,
    ) {
        let resolved = VoteTransition::resolve(existing, requested);
        assert_eq!(resolved, transition);
        assert_eq!(resolved.counter_deltas(), deltas);
        assert_eq!(resolved.resulting_direction(), after);
    }

    #[rstest]
    fn repeated_up_votes_toggle() {
        let mut ledger = None;
        let mut tally = VoteTally::default();
        let mut seen = Vec::new();
        for _ in 0..3 {
            let transition = VoteTransition::resolve(ledger, Up);
            tally = tally
                .apply(transition.counter_deltas())
                .expect("counters stay non-negative");
            ledger = transition.resulting_direction();
            seen.push((ledger, tally));
        }
        assert_eq!(
            seen,
            vec![
                (Some(Up), VoteTally::new(1, 0)),
                (None, VoteTally::new(0, 0)),
                (Some(Up), VoteTally::new(1, 0)),
            ]
        );
    }

    #[rstest]
    fn apply_refuses_negative_counters() {
        assert_eq!(VoteTally::default().apply((-1, 0)), None);
        assert_eq!(VoteTally::new(2, 1).apply((-1, 1)), Some(VoteTally::new(1, 2)));
    }

    #[rstest]
    #[case(VoteTally::new(5, 2), 3)]
    #[case(VoteTally::new(0, 4), -4)]
    #[case(VoteTally::new(u32::MAX, 0), i64::from(u32::MAX))]
    fn total_is_up_minus_down(#[case] tally: VoteTally, #[case] total: i64) {
        assert_eq!(tally.total(), total);
    }
}
