//! The single-vote-per-user state machine.
//!
//! A user holds at most one vote per comment. Repeating the same direction is
//! a no-op; voting the opposite direction retracts the existing vote instead
//! of flipping it, so one click always moves toward neutral.

use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// An up (+1) or down (-1) vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    /// The signed value stored in the ledger.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    /// Parses the `"up"` / `"down"` wire form.
    pub fn from_direction(direction: &str) -> Result<Self, ValidationError> {
        match direction {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(ValidationError::InvalidVoteDirection(other.to_string())),
        }
    }

    /// The `"up"` / `"down"` wire form.
    pub fn direction(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl TryFrom<i32> for VoteValue {
    type Error = ValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(ValidationError::InvalidVoteValue(other)),
        }
    }
}

impl From<VoteValue> for i32 {
    fn from(v: VoteValue) -> Self {
        v.as_i32()
    }
}

/// What the ledger must do to its row for a (user, comment) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerAction {
    /// Leave the ledger untouched.
    Keep,
    /// Insert a row with this value.
    Insert(VoteValue),
    /// Delete the existing row.
    Retract,
}

/// Result of applying an incoming vote to the current ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    /// Ledger state after the vote (`None` = no row).
    pub new_state: Option<VoteValue>,
    /// Change in the comment's score.
    pub delta: i32,
    /// The vote that was effectively cast: the incoming value when a new
    /// vote was recorded, `None` (reported as 0) otherwise.
    pub resulting: Option<VoteValue>,
    /// The storage operation implementing the transition.
    pub action: LedgerAction,
}

impl VoteTransition {
    /// Computes the transition for `incoming` given the `current` ledger row.
    pub fn apply(current: Option<VoteValue>, incoming: VoteValue) -> Self {
        match current {
            None => Self {
                new_state: Some(incoming),
                delta: incoming.as_i32(),
                resulting: Some(incoming),
                action: LedgerAction::Insert(incoming),
            },
            Some(existing) if existing == incoming => Self {
                new_state: Some(existing),
                delta: 0,
                resulting: None,
                action: LedgerAction::Keep,
            },
            Some(existing) => Self {
                new_state: None,
                delta: -existing.as_i32(),
                resulting: None,
                action: LedgerAction::Retract,
            },
        }
    }

    /// The resulting vote as a signed integer (1, -1 or 0).
    pub fn resulting_i32(&self) -> i32 {
        self.resulting.map_or(0, VoteValue::as_i32)
    }
}

/// Outcome reported to the caller after a vote: the vote that was cast and
/// the comment's new total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    pub direction: Option<VoteValue>,
    pub score: i64,
}

/// An attempted vote by a user on a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vote {
    pub user_id: crate::UserId,
    pub comment_id: crate::CommentId,
    pub value: VoteValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use VoteValue::{Down, Up};

    #[test]
    fn transition_table() {
        let cases = [
            (None, Up, Some(Up), 1, 1),
            (None, Down, Some(Down), -1, -1),
            (Some(Up), Up, Some(Up), 0, 0),
            (Some(Up), Down, None, -1, 0),
            (Some(Down), Down, Some(Down), 0, 0),
            (Some(Down), Up, None, 1, 0),
        ];
        for (current, incoming, new_state, delta, resulting) in cases {
            let t = VoteTransition::apply(current, incoming);
            assert_eq!(t.new_state, new_state, "{current:?} + {incoming:?}");
            assert_eq!(t.delta, delta, "{current:?} + {incoming:?}");
            assert_eq!(t.resulting_i32(), resulting, "{current:?} + {incoming:?}");
        }
    }

    #[test]
    fn sequence_up_up_down_down() {
        let mut state = None;
        let mut score = 0;
        let mut observed = Vec::new();
        for incoming in [Up, Up, Down, Down] {
            let t = VoteTransition::apply(state, incoming);
            state = t.new_state;
            score += t.delta;
            observed.push((t.resulting_i32(), score));
        }
        assert_eq!(observed, vec![(1, 1), (0, 1), (0, 0), (-1, -1)]);
    }

    #[test]
    fn ledger_actions() {
        assert_eq!(VoteTransition::apply(None, Up).action, LedgerAction::Insert(Up));
        assert_eq!(VoteTransition::apply(Some(Up), Up).action, LedgerAction::Keep);
        assert_eq!(VoteTransition::apply(Some(Up), Down).action, LedgerAction::Retract);
    }

    #[test]
    fn vote_value_parsing() {
        assert_eq!(VoteValue::try_from(1).unwrap(), Up);
        assert_eq!(VoteValue::try_from(-1).unwrap(), Down);
        assert!(VoteValue::try_from(0).is_err());
        assert!(VoteValue::try_from(2).is_err());
        assert_eq!(VoteValue::from_direction("down").unwrap(), Down);
        assert!(VoteValue::from_direction("sideways").is_err());
    }

    #[test]
    fn vote_value_serde_as_integer() {
        assert_eq!(serde_json::to_string(&Down).unwrap(), "-1");
        let v: VoteValue = serde_json::from_str("1").unwrap();
        assert_eq!(v, Up);
        assert!(serde_json::from_str::<VoteValue>("3").is_err());
    }
}
