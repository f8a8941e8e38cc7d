//! Error types for the consensus aggregation subsystem

use crate::domain::result::ParticipantId;
use thiserror::Error;
use uuid::Uuid;

/// Consensus subsystem errors
///
/// `NoConsensus` is deliberately absent: it is a normal evaluation outcome
/// (`ConsensusOutcome::NoConsensus`), not a failure.
#[derive(Debug, Error)]
pub enum ConsensusError {
    /// Result could not be serialized (fatal local bug in the producing side)
    #[error("Failed to encode match result: {reason}")]
    Encoding { reason: String },

    /// Submitted bytes are malformed; the submission is dropped, nothing else
    #[error("Failed to decode submission from {participant}: {reason}")]
    Decoding {
        participant: ParticipantId,
        reason: String,
    },

    /// Submission was produced by an incompatible client build
    #[error("Unsupported result schema from {participant}: expected v{expected}, got v{actual}")]
    SchemaMismatch {
        participant: ParticipantId,
        expected: u8,
        actual: u8,
    },

    /// Submit/Evaluate against a match with no live session (destroyed or never created)
    #[error("No consensus session for match {match_id}")]
    SessionNotFound { match_id: Uuid },

    /// A session for this match already exists
    #[error("Consensus session for match {match_id} already exists")]
    SessionExists { match_id: Uuid },

    /// Finalize called twice on the same session
    #[error("Consensus session for match {match_id} is already finalized")]
    AlreadyFinalized { match_id: Uuid },

    /// Threshold fraction is not a rational in (0, 1]
    #[error("Invalid quorum threshold {numerator}/{denominator}")]
    InvalidThreshold { numerator: u32, denominator: u32 },
}

impl ConsensusError {
    /// Whether this error classifies a single rejected submission
    ///
    /// Rejected submissions are non-fatal: the ledger is untouched and the
    /// session keeps running (the participant effectively abstained).
    pub fn is_rejected_submission(&self) -> bool {
        matches!(
            self,
            ConsensusError::Decoding { .. } | ConsensusError::SchemaMismatch { .. }
        )
    }
}

/// Result type for consensus operations
pub type ConsensusResult<T> = Result<T, ConsensusError>;
