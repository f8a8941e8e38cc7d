//! Consensus evaluator
//!
//! A pure function over a ledger snapshot: partition votes into equality
//! classes, take the largest class, and check it against the quorum. No
//! transport types, no locks, no failure modes beyond the `NoConsensus`
//! sentinel.

use crate::domain::result::{MatchResult, ParticipantId};
use crate::error::{ConsensusError, ConsensusResult};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Quorum threshold as an exact rational fraction of active participants
///
/// A rational rather than a float so that fractions like 2/3 are exact.
/// The required vote count is `ceil(numerator/denominator * active)`:
/// at-least semantics, so 4 active participants at 1/2 need 2 agreeing
/// votes, and at 2/3 need 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuorumThreshold {
    numerator: u32,
    denominator: u32,
}

impl QuorumThreshold {
    /// At least half of the active participants must agree
    pub const SIMPLE_MAJORITY: QuorumThreshold = QuorumThreshold {
        numerator: 1,
        denominator: 2,
    };

    /// At least two thirds of the active participants must agree
    pub const TWO_THIRDS: QuorumThreshold = QuorumThreshold {
        numerator: 2,
        denominator: 3,
    };

    /// Every active participant must agree
    pub const UNANIMOUS: QuorumThreshold = QuorumThreshold {
        numerator: 1,
        denominator: 1,
    };

    /// Build a threshold, rejecting fractions outside (0, 1]
    pub fn new(numerator: u32, denominator: u32) -> ConsensusResult<Self> {
        if numerator == 0 || denominator == 0 || numerator > denominator {
            return Err(ConsensusError::InvalidThreshold {
                numerator,
                denominator,
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Minimum agreeing votes among `active` participants
    pub fn required_votes(&self, active: usize) -> usize {
        let n = self.numerator as u64;
        let d = self.denominator as u64;
        ((n * active as u64 + d - 1) / d) as usize
    }
}

impl Default for QuorumThreshold {
    fn default() -> Self {
        Self::SIMPLE_MAJORITY
    }
}

/// The winning side of an agreed evaluation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgreedOutcome {
    /// The shared canonical result of the winning class
    pub result: MatchResult,
    /// Participants whose vote is in the winning class
    pub voters: BTreeSet<ParticipantId>,
    /// Participants whose ledger vote disagreed with the winning class
    ///
    /// Captured at evaluation time for anti-cheat flagging; submissions
    /// arriving after finalization never change this set.
    pub dissenters: BTreeSet<ParticipantId>,
}

/// Outcome of a consensus evaluation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConsensusOutcome {
    /// A quorum of active participants agree on one result
    Agreed(AgreedOutcome),
    /// No class meets the quorum, or the largest classes are tied
    NoConsensus,
}

impl ConsensusOutcome {
    pub fn is_agreed(&self) -> bool {
        matches!(self, ConsensusOutcome::Agreed(_))
    }

    /// The agreed payload, if any
    pub fn agreed(&self) -> Option<&AgreedOutcome> {
        match self {
            ConsensusOutcome::Agreed(outcome) => Some(outcome),
            ConsensusOutcome::NoConsensus => None,
        }
    }
}

/// Evaluate a ledger snapshot against a quorum threshold
///
/// `active` is the number of participants currently known to be in the
/// match, supplied by the orchestrator. It is deliberately not inferred
/// from the vote count: participants who disconnected before voting still
/// count against the quorum, so a small colluding subset cannot reach
/// "consensus" unopposed.
///
/// An exact tie between the largest classes is `NoConsensus` regardless of
/// threshold. Resolving the tie arbitrarily would let an attacker split
/// votes to force selection of a favorable branch.
pub fn evaluate(
    votes: &BTreeMap<ParticipantId, MatchResult>,
    active: usize,
    threshold: QuorumThreshold,
) -> ConsensusOutcome {
    if active == 0 || votes.is_empty() {
        return ConsensusOutcome::NoConsensus;
    }

    let mut classes: HashMap<&MatchResult, BTreeSet<ParticipantId>> = HashMap::new();
    for (&participant, result) in votes {
        classes.entry(result).or_default().insert(participant);
    }

    let largest = classes
        .values()
        .map(|members| members.len())
        .max()
        .unwrap_or(0);
    let tied = classes
        .values()
        .filter(|members| members.len() == largest)
        .count();
    if tied > 1 {
        return ConsensusOutcome::NoConsensus;
    }

    if largest < threshold.required_votes(active) {
        return ConsensusOutcome::NoConsensus;
    }

    let Some((result, voters)) = classes
        .into_iter()
        .max_by_key(|(_, members)| members.len())
    else {
        return ConsensusOutcome::NoConsensus;
    };

    let dissenters = votes
        .keys()
        .copied()
        .filter(|p| !voters.contains(p))
        .collect();

    ConsensusOutcome::Agreed(AgreedOutcome {
        result: result.clone(),
        voters,
        dissenters,
    })
}
