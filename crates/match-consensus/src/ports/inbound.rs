//! Driving port (API - inbound)
//!
//! The orchestrator-facing surface of the subsystem. The core is consumed
//! in-process: the transport layer has already authenticated that a
//! submission's claimed participant belongs to the submitting party, and
//! timeout/abandonment policy (when to destroy a session that never
//! reached consensus) stays with the orchestrator.

use crate::domain::evaluator::{ConsensusOutcome, QuorumThreshold};
use crate::domain::result::ParticipantId;
use crate::error::ConsensusResult;
use crate::session::{MatchId, SubmitOutcome};
use async_trait::async_trait;

/// Primary consensus aggregation API
///
/// All operations are in-memory and complete in bounded time; the async
/// surface exists so the orchestrator's runtime can consume the subsystem
/// directly, not because anything here suspends.
#[async_trait]
pub trait ConsensusApi: Send + Sync {
    /// Open a session for a match entering its end-of-game phase
    ///
    /// Fails with `SessionExists` if the match already has one: a double
    /// end-of-game trigger is an orchestrator bug worth surfacing.
    async fn create_session(&self, match_id: MatchId) -> ConsensusResult<()>;

    /// Deliver one participant's serialized result to its match session
    ///
    /// A malformed payload is reported inside the `SubmitOutcome`, never
    /// as an `Err`; the `Err` path is reserved for submissions against a
    /// destroyed or never-created session.
    async fn submit(
        &self,
        match_id: MatchId,
        participant: ParticipantId,
        payload: Vec<u8>,
    ) -> ConsensusResult<SubmitOutcome>;

    /// Evaluate consensus with the configured default threshold
    async fn evaluate(
        &self,
        match_id: MatchId,
        active_participants: usize,
    ) -> ConsensusResult<ConsensusOutcome>;

    /// Evaluate consensus with an explicit threshold fraction
    async fn evaluate_with(
        &self,
        match_id: MatchId,
        active_participants: usize,
        threshold: QuorumThreshold,
    ) -> ConsensusResult<ConsensusOutcome>;

    /// Commit an accepted outcome for a match
    async fn finalize(&self, match_id: MatchId, outcome: ConsensusOutcome) -> ConsensusResult<()>;

    /// Discard a match's session (finalized, abandoned, or timed out)
    async fn destroy_session(&self, match_id: MatchId) -> ConsensusResult<()>;

    /// Number of valid votes currently held for a match
    async fn vote_count(&self, match_id: MatchId) -> ConsensusResult<usize>;
}
