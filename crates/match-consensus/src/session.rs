//! Per-match consensus session
//!
//! One session binds one vote ledger to one match for the duration of the
//! end-of-game phase. Lifecycle: `Open` (accepting submissions and
//! evaluations) → `Finalized` (an outcome was accepted by the orchestrator).
//! Once finalized, further submissions are accepted but ignored — they
//! cannot change a committed outcome — and evaluation re-returns the
//! committed outcome without recomputation.
//!
//! Submissions arrive concurrently from remote participants; a single
//! mutex over the session state gives every submit and evaluate
//! atomic-per-call semantics. Contention is inherently low: one session
//! per in-progress match, roughly one submission per participant.

use crate::domain::evaluator::{evaluate, ConsensusOutcome, QuorumThreshold};
use crate::domain::ledger::VoteLedger;
use crate::domain::result::{MatchResult, ParticipantId};
use crate::error::{ConsensusError, ConsensusResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Match identifier, assigned by the orchestrator
pub type MatchId = Uuid;

/// Per-submission report
///
/// A malformed payload is a rejection, not an error that aborts the
/// session: the ledger stays untouched and the participant counts as
/// having abstained.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// First valid vote from this participant
    Recorded,
    /// A prior vote from this participant was overwritten (latest wins)
    Replaced,
    /// Payload failed to decode; ledger unchanged
    Rejected(ConsensusError),
    /// Session already finalized; submission intentionally ignored
    IgnoredFinalized,
}

impl SubmitOutcome {
    /// Whether the submission landed in the ledger
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Recorded | SubmitOutcome::Replaced)
    }
}

struct SessionState {
    ledger: VoteLedger,
    finalized: Option<ConsensusOutcome>,
}

/// Consensus aggregation context for a single match
pub struct ConsensusSession {
    match_id: MatchId,
    state: Mutex<SessionState>,
}

impl ConsensusSession {
    /// Create an open session with an empty ledger
    pub fn new(match_id: MatchId) -> Self {
        Self {
            match_id,
            state: Mutex::new(SessionState {
                ledger: VoteLedger::new(),
                finalized: None,
            }),
        }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Submit a participant's serialized result
    pub fn submit(&self, participant: ParticipantId, payload: &[u8]) -> SubmitOutcome {
        let mut state = self.state.lock();

        if state.finalized.is_some() {
            warn!(
                match_id = %self.match_id,
                %participant,
                "submission after finalization ignored"
            );
            return SubmitOutcome::IgnoredFinalized;
        }

        match state.ledger.submit(participant, payload) {
            Ok(None) => {
                debug!(match_id = %self.match_id, %participant, "vote recorded");
                SubmitOutcome::Recorded
            }
            Ok(Some(_)) => {
                debug!(match_id = %self.match_id, %participant, "vote replaced");
                SubmitOutcome::Replaced
            }
            Err(err) => {
                warn!(match_id = %self.match_id, %participant, %err, "submission rejected");
                SubmitOutcome::Rejected(err)
            }
        }
    }

    /// Point-in-time consensus query
    ///
    /// `active` is the number of participants currently known to be in the
    /// match. After finalization this returns the committed outcome
    /// unchanged, whatever `active` and `threshold` are passed.
    pub fn evaluate(&self, active: usize, threshold: QuorumThreshold) -> ConsensusOutcome {
        let state = self.state.lock();
        if let Some(outcome) = &state.finalized {
            return outcome.clone();
        }
        evaluate(state.ledger.votes(), active, threshold)
    }

    /// Commit an accepted outcome, closing the session to further changes
    pub fn finalize(&self, outcome: ConsensusOutcome) -> ConsensusResult<()> {
        let mut state = self.state.lock();
        if state.finalized.is_some() {
            return Err(ConsensusError::AlreadyFinalized {
                match_id: self.match_id,
            });
        }

        info!(
            match_id = %self.match_id,
            agreed = outcome.is_agreed(),
            votes = state.ledger.count(),
            "session finalized"
        );
        state.finalized = Some(outcome);
        Ok(())
    }

    /// Whether an outcome has been committed
    pub fn is_finalized(&self) -> bool {
        self.state.lock().finalized.is_some()
    }

    /// Number of participants with a valid vote
    pub fn vote_count(&self) -> usize {
        self.state.lock().ledger.count()
    }

    /// Consistent copy of the current votes
    pub fn snapshot(&self) -> BTreeMap<ParticipantId, MatchResult> {
        self.state.lock().ledger.votes().clone()
    }
}
