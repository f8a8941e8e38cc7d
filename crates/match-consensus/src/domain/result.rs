//! Match result entities
//!
//! The deterministic simulation produces one `MatchResult` per participant.
//! Two results are the same outcome iff they are structurally equal after
//! canonicalization, regardless of the order in which the producing client
//! enumerated the players.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable seat index of one participant within a match (0..N-1)
///
/// Assigned externally when the match is formed and never reused within a
/// session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ParticipantId(pub u8);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl From<u8> for ParticipantId {
    fn from(seat: u8) -> Self {
        Self(seat)
    }
}

/// Final standing of a single player, as computed by the simulation
///
/// All fields are integers so equality is exact and the type can be hashed
/// for equality-class grouping.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerResult {
    /// Which participant this record describes
    pub participant: ParticipantId,
    /// Final placement, 1 = winner
    pub rank: u32,
    pub kills: u32,
    pub deaths: u32,
    pub damage_dealt: u64,
}

impl PlayerResult {
    pub fn new(participant: ParticipantId, rank: u32, kills: u32, deaths: u32, damage_dealt: u64) -> Self {
        Self {
            participant,
            rank,
            kills,
            deaths,
            damage_dealt,
        }
    }
}

/// End-of-match result: the full standings as one participant computed them
///
/// Canonical form orders standings by `(rank, participant)`. Clients may
/// legitimately enumerate players in different orders, so positional order
/// carries no meaning; the codec canonicalizes on both encode and decode,
/// after which the derived equality is the structural equality the
/// evaluator groups by.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct MatchResult {
    pub standings: Vec<PlayerResult>,
}

impl MatchResult {
    /// Build a result in canonical order
    pub fn new(standings: Vec<PlayerResult>) -> Self {
        let mut result = Self { standings };
        result.canonicalize();
        result
    }

    /// Sort standings into canonical `(rank, participant)` order
    pub fn canonicalize(&mut self) {
        self.standings
            .sort_unstable_by_key(|p| (p.rank, p.participant));
    }

    /// Number of per-player records in the standings
    pub fn player_count(&self) -> usize {
        self.standings.len()
    }

    /// Standing record for a specific participant, if present
    pub fn standing_of(&self, participant: ParticipantId) -> Option<&PlayerResult> {
        self.standings.iter().find(|p| p.participant == participant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(seat: u8, rank: u32) -> PlayerResult {
        PlayerResult::new(ParticipantId(seat), rank, rank, 1, 100 * rank as u64)
    }

    #[test]
    fn test_canonical_order_is_rank_then_participant() {
        let a = MatchResult::new(vec![standing(2, 3), standing(0, 1), standing(1, 2)]);
        let ranks: Vec<u32> = a.standings.iter().map(|p| p.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_equality_ignores_submission_order() {
        let a = MatchResult::new(vec![standing(0, 1), standing(1, 2), standing(2, 3)]);
        let b = MatchResult::new(vec![standing(2, 3), standing(1, 2), standing(0, 1)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_differing_stats_are_not_equal() {
        let a = MatchResult::new(vec![standing(0, 1)]);
        let mut tampered = a.clone();
        tampered.standings[0].kills += 1;
        assert_ne!(a, tampered);
    }

    #[test]
    fn test_standing_of() {
        let result = MatchResult::new(vec![standing(0, 2), standing(1, 1)]);
        assert_eq!(result.standing_of(ParticipantId(1)).unwrap().rank, 1);
        assert!(result.standing_of(ParticipantId(9)).is_none());
    }
}
