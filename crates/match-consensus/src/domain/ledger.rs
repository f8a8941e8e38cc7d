//! Per-match vote ledger
//!
//! One entry per participant, latest submission wins. The ledger is plain
//! in-memory state; the owning session serializes access to it (one lock
//! per session), so nothing here needs interior mutability.

use crate::domain::codec;
use crate::domain::result::{MatchResult, ParticipantId};
use crate::error::ConsensusResult;
use std::collections::BTreeMap;

/// Latest valid vote per participant for one match
///
/// No history, no deletion: a replaced vote is gone, and the ledger lives
/// exactly as long as its session.
#[derive(Debug, Default)]
pub struct VoteLedger {
    votes: BTreeMap<ParticipantId, MatchResult>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode and record a submission, overwriting any prior vote
    ///
    /// On a decode failure the ledger is untouched and the error is
    /// returned for the caller to report as a warning; the participant is
    /// treated as having abstained. On success, returns the vote that was
    /// replaced, if any.
    pub fn submit(
        &mut self,
        participant: ParticipantId,
        payload: &[u8],
    ) -> ConsensusResult<Option<MatchResult>> {
        let result = codec::decode(participant, payload)?;
        Ok(self.votes.insert(participant, result))
    }

    /// Record an already-decoded vote (test fixtures and replay paths)
    pub fn record(
        &mut self,
        participant: ParticipantId,
        result: MatchResult,
    ) -> Option<MatchResult> {
        self.votes.insert(participant, result)
    }

    /// Current votes, keyed by participant
    pub fn votes(&self) -> &BTreeMap<ParticipantId, MatchResult> {
        &self.votes
    }

    /// Number of participants with a currently valid vote
    pub fn count(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}
