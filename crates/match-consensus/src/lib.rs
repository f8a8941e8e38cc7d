//! # match-consensus
//!
//! Consensus aggregation for deterministic multiplayer match results.
//!
//! Every client in a match runs the same deterministic simulation, so at
//! end of game each one can compute the full final standings locally. No
//! single client is trusted: this crate collects each participant's
//! serialized result, groups the votes by structural equality, and accepts
//! a result only when a quorum of the active participants agree on it.
//!
//! ## Overview
//!
//! - **Result codec**: deterministic serialization with a value-equal
//!   decode path; per-player standings compare independent of the order
//!   clients enumerated them in
//! - **Vote ledger**: latest-submission-wins vote per participant, one
//!   ledger per match
//! - **Evaluator**: pure quorum function; an exact tie between the largest
//!   vote classes is never silently resolved
//! - **Session**: per-match lifecycle (`Open` → `Finalized`) behind a
//!   single lock; concurrent matches are fully independent
//!
//! ## Architecture
//!
//! ```text
//! participant clients ──(participant, bytes)──→ ConsensusService
//!                                                    │
//!                                       MatchId → ConsensusSession
//!                                                    │
//!                                          VoteLedger ── evaluate()
//!                                                    │
//! orchestrator ←── Agreed(result, voters, dissenters) | NoConsensus
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use match_consensus::{ConsensusApi, ConsensusConfig, ConsensusService, MatchId, ParticipantId};
//!
//! let service = ConsensusService::new(ConsensusConfig::default());
//! let match_id = MatchId::new_v4();
//! service.create_session(match_id).await?;
//!
//! // Each finishing client submits its locally computed result.
//! service.submit(match_id, ParticipantId(0), payload).await?;
//!
//! // The orchestrator polls for agreement among the active participants.
//! let outcome = service.evaluate(match_id, active_count).await?;
//! if outcome.is_agreed() {
//!     service.finalize(match_id, outcome).await?;
//! }
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod session;

pub use domain::codec::{self, SCHEMA_VERSION};
pub use domain::evaluator::{evaluate, AgreedOutcome, ConsensusOutcome, QuorumThreshold};
pub use domain::ledger::VoteLedger;
pub use domain::result::{MatchResult, ParticipantId, PlayerResult};
pub use error::{ConsensusError, ConsensusResult};
pub use ports::inbound::ConsensusApi;
pub use service::{ConsensusConfig, ConsensusService};
pub use session::{ConsensusSession, MatchId, SubmitOutcome};
