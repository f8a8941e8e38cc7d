//! Domain logic for consensus aggregation
//!
//! Pure, framework-free pieces:
//! - result: match result entities and canonical ordering
//! - codec: deterministic serialization with value-equal decode
//! - ledger: latest-wins vote storage for one match
//! - evaluator: quorum decision over a ledger snapshot

pub mod codec;
pub mod evaluator;
pub mod ledger;
pub mod result;

pub use evaluator::{evaluate, AgreedOutcome, ConsensusOutcome, QuorumThreshold};
pub use ledger::VoteLedger;
pub use result::{MatchResult, ParticipantId, PlayerResult};
