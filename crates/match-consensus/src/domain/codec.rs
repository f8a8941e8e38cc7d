//! Deterministic result codec
//!
//! Wire form: one schema-version byte followed by the bincode encoding of
//! the canonicalized `MatchResult`. Canonicalizing before encode makes the
//! bytes deterministic across clients; canonicalizing again after decode
//! makes equality hold even for a payload whose standings arrived unsorted.
//!
//! The encoding is not meant to be compact. It only has to round-trip
//! deterministically so that identical logical results compare equal.

use crate::domain::result::{MatchResult, ParticipantId};
use crate::error::{ConsensusError, ConsensusResult};

/// Current wire schema version
///
/// Bumped whenever `MatchResult` changes shape. Mixed-version lobbies
/// cannot agree byte-wise anyway, so a mismatch rejects the submission.
pub const SCHEMA_VERSION: u8 = 1;

/// Encode a result into its canonical byte form
pub fn encode(result: &MatchResult) -> ConsensusResult<Vec<u8>> {
    let mut canonical = result.clone();
    canonical.canonicalize();

    let body = bincode::serialize(&canonical).map_err(|e| ConsensusError::Encoding {
        reason: e.to_string(),
    })?;

    let mut bytes = Vec::with_capacity(1 + body.len());
    bytes.push(SCHEMA_VERSION);
    bytes.extend_from_slice(&body);
    Ok(bytes)
}

/// Decode submitted bytes back into a canonical `MatchResult`
///
/// Fails on empty, truncated, corrupted, or trailing-garbage input and on
/// a schema-version mismatch. Callers treat any failure as "no valid vote
/// from this participant", never as a session-fatal condition.
pub fn decode(participant: ParticipantId, bytes: &[u8]) -> ConsensusResult<MatchResult> {
    let (&version, body) = bytes.split_first().ok_or(ConsensusError::Decoding {
        participant,
        reason: "empty payload".to_string(),
    })?;

    if version != SCHEMA_VERSION {
        return Err(ConsensusError::SchemaMismatch {
            participant,
            expected: SCHEMA_VERSION,
            actual: version,
        });
    }

    let mut result: MatchResult =
        bincode::deserialize(body).map_err(|e| ConsensusError::Decoding {
            participant,
            reason: e.to_string(),
        })?;

    // Reject payloads with bytes beyond the encoded result.
    let consumed = bincode::serialized_size(&result).map_err(|e| ConsensusError::Decoding {
        participant,
        reason: e.to_string(),
    })? as usize;
    if consumed != body.len() {
        return Err(ConsensusError::Decoding {
            participant,
            reason: format!("{} trailing bytes", body.len() - consumed),
        });
    }

    result.canonicalize();
    Ok(result)
}
