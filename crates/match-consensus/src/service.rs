//! Consensus service - session registry and orchestrator surface
//!
//! Owns the map of live sessions keyed by match id. Sessions share no
//! mutable state with each other; the registry lock only guards the map
//! itself, so concurrent matches proceed fully independently. This map is
//! an explicit handle passed to whoever needs it - there is no ambient
//! static registry.

use crate::domain::evaluator::{ConsensusOutcome, QuorumThreshold};
use crate::domain::result::ParticipantId;
use crate::error::{ConsensusError, ConsensusResult};
use crate::metrics;
use crate::ports::inbound::ConsensusApi;
use crate::session::{ConsensusSession, MatchId, SubmitOutcome};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Consensus service configuration
#[derive(Clone, Copy, Debug)]
pub struct ConsensusConfig {
    /// Threshold used by `evaluate` when the caller does not pass one
    pub default_threshold: QuorumThreshold,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            default_threshold: QuorumThreshold::SIMPLE_MAJORITY,
        }
    }
}

/// Session registry implementing the inbound consensus API
pub struct ConsensusService {
    config: ConsensusConfig,
    sessions: RwLock<HashMap<MatchId, Arc<ConsensusSession>>>,
}

impl ConsensusService {
    pub fn new(config: ConsensusConfig) -> Self {
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the live session for a match
    ///
    /// Callers that interact with one session repeatedly can hold the
    /// returned handle instead of going through the registry each time.
    pub fn session(&self, match_id: MatchId) -> ConsensusResult<Arc<ConsensusSession>> {
        self.sessions
            .read()
            .get(&match_id)
            .cloned()
            .ok_or(ConsensusError::SessionNotFound { match_id })
    }

    /// Number of live sessions
    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    fn insert_session(&self, match_id: MatchId) -> ConsensusResult<Arc<ConsensusSession>> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(&match_id) {
            return Err(ConsensusError::SessionExists { match_id });
        }

        let session = Arc::new(ConsensusSession::new(match_id));
        sessions.insert(match_id, session.clone());
        metrics::set_open_sessions(sessions.len());
        Ok(session)
    }
}

#[async_trait]
impl ConsensusApi for ConsensusService {
    async fn create_session(&self, match_id: MatchId) -> ConsensusResult<()> {
        self.insert_session(match_id)?;
        info!(%match_id, "consensus session created");
        Ok(())
    }

    async fn submit(
        &self,
        match_id: MatchId,
        participant: ParticipantId,
        payload: Vec<u8>,
    ) -> ConsensusResult<SubmitOutcome> {
        let session = self.session(match_id)?;
        let outcome = session.submit(participant, &payload);

        match &outcome {
            SubmitOutcome::Recorded | SubmitOutcome::Replaced => metrics::record_submission(),
            SubmitOutcome::Rejected(_) => metrics::record_submission_rejected("decode"),
            SubmitOutcome::IgnoredFinalized => metrics::record_submission_rejected("finalized"),
        }
        Ok(outcome)
    }

    async fn evaluate(
        &self,
        match_id: MatchId,
        active_participants: usize,
    ) -> ConsensusResult<ConsensusOutcome> {
        self.evaluate_with(match_id, active_participants, self.config.default_threshold)
            .await
    }

    async fn evaluate_with(
        &self,
        match_id: MatchId,
        active_participants: usize,
        threshold: QuorumThreshold,
    ) -> ConsensusResult<ConsensusOutcome> {
        let session = self.session(match_id)?;
        let outcome = session.evaluate(active_participants, threshold);
        metrics::record_evaluation(outcome.is_agreed());
        Ok(outcome)
    }

    async fn finalize(&self, match_id: MatchId, outcome: ConsensusOutcome) -> ConsensusResult<()> {
        let session = self.session(match_id)?;
        session.finalize(outcome)?;
        metrics::record_session_finalized();
        Ok(())
    }

    async fn destroy_session(&self, match_id: MatchId) -> ConsensusResult<()> {
        let mut sessions = self.sessions.write();
        if sessions.remove(&match_id).is_none() {
            return Err(ConsensusError::SessionNotFound { match_id });
        }
        metrics::set_open_sessions(sessions.len());
        drop(sessions);

        info!(%match_id, "consensus session destroyed");
        Ok(())
    }

    async fn vote_count(&self, match_id: MatchId) -> ConsensusResult<usize> {
        Ok(self.session(match_id)?.vote_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::codec::encode;
    use crate::domain::result::{MatchResult, PlayerResult};

    /// Standings for a 4-player match; `winner` decides who placed first.
    fn standings(winner: u8) -> MatchResult {
        let mut players = Vec::new();
        for seat in 0u8..4 {
            let rank = if seat == winner {
                1
            } else {
                2 + ((seat + 4 - winner) % 4) as u32 - 1
            };
            players.push(PlayerResult::new(
                ParticipantId(seat),
                rank,
                8 - rank,
                rank - 1,
                1000 / rank as u64,
            ));
        }
        MatchResult::new(players)
    }

    fn payload(winner: u8) -> Vec<u8> {
        encode(&standings(winner)).unwrap()
    }

    fn service() -> ConsensusService {
        ConsensusService::new(ConsensusConfig::default())
    }

    #[tokio::test]
    async fn test_full_match_reaches_consensus() {
        let service = service();
        let match_id = MatchId::new_v4();
        service.create_session(match_id).await.unwrap();

        // All four clients agree; submissions arrive in arbitrary order.
        for seat in [2u8, 0, 3, 1] {
            let outcome = service
                .submit(match_id, ParticipantId(seat), payload(0))
                .await
                .unwrap();
            assert!(outcome.is_accepted());
        }

        let outcome = service.evaluate(match_id, 4).await.unwrap();
        let agreed = outcome.agreed().expect("should agree");
        assert_eq!(agreed.voters.len(), 4);
        assert!(agreed.dissenters.is_empty());
        assert_eq!(agreed.result, standings(0));
    }

    #[tokio::test]
    async fn test_corrupted_submission_does_not_block_quorum() {
        let service = service();
        let match_id = MatchId::new_v4();
        service.create_session(match_id).await.unwrap();

        // Participant 2 sends garbage; the other three agree.
        for seat in [0u8, 1, 3] {
            service
                .submit(match_id, ParticipantId(seat), payload(0))
                .await
                .unwrap();
        }
        let rejected = service
            .submit(match_id, ParticipantId(2), vec![0x01, 0xDE, 0xAD])
            .await
            .unwrap();
        assert!(matches!(rejected, SubmitOutcome::Rejected(_)));
        assert_eq!(service.vote_count(match_id).await.unwrap(), 3);

        // 3-of-4 quorum still reached: the corrupted submission joined no
        // class and is not a dissenter either.
        let outcome = service
            .evaluate_with(match_id, 4, QuorumThreshold::new(3, 4).unwrap())
            .await
            .unwrap();
        let agreed = outcome.agreed().expect("should agree");
        assert_eq!(agreed.voters.len(), 3);
        assert!(agreed.dissenters.is_empty());
    }

    #[tokio::test]
    async fn test_dissenting_minority_is_reported() {
        let service = service();
        let match_id = MatchId::new_v4();
        service.create_session(match_id).await.unwrap();

        for seat in [0u8, 1, 2] {
            service
                .submit(match_id, ParticipantId(seat), payload(0))
                .await
                .unwrap();
        }
        // Seat 3 claims it won instead.
        service
            .submit(match_id, ParticipantId(3), payload(3))
            .await
            .unwrap();

        let outcome = service.evaluate(match_id, 4).await.unwrap();
        let agreed = outcome.agreed().expect("should agree");
        assert_eq!(
            agreed.dissenters.iter().copied().collect::<Vec<_>>(),
            vec![ParticipantId(3)]
        );
    }

    #[tokio::test]
    async fn test_finalized_outcome_survives_late_submissions() {
        let service = service();
        let match_id = MatchId::new_v4();
        service.create_session(match_id).await.unwrap();

        for seat in [0u8, 1, 2] {
            service
                .submit(match_id, ParticipantId(seat), payload(0))
                .await
                .unwrap();
        }

        let committed = service.evaluate(match_id, 4).await.unwrap();
        service.finalize(match_id, committed.clone()).await.unwrap();

        let late = service
            .submit(match_id, ParticipantId(3), payload(3))
            .await
            .unwrap();
        assert!(matches!(late, SubmitOutcome::IgnoredFinalized));

        let reread = service.evaluate(match_id, 4).await.unwrap();
        assert_eq!(reread, committed);
    }

    #[tokio::test]
    async fn test_destroyed_session_is_gone() {
        let service = service();
        let match_id = MatchId::new_v4();
        service.create_session(match_id).await.unwrap();
        service.destroy_session(match_id).await.unwrap();

        let err = service
            .submit(match_id, ParticipantId(0), payload(0))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsensusError::SessionNotFound { .. }));

        let err = service.evaluate(match_id, 4).await.unwrap_err();
        assert!(matches!(err, ConsensusError::SessionNotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_create_session_fails() {
        let service = service();
        let match_id = MatchId::new_v4();
        service.create_session(match_id).await.unwrap();

        let err = service.create_session(match_id).await.unwrap_err();
        assert!(matches!(err, ConsensusError::SessionExists { .. }));
        assert_eq!(service.session_count(), 1);
    }

    #[tokio::test]
    async fn test_matches_are_isolated() {
        let service = service();
        let match_a = MatchId::new_v4();
        let match_b = MatchId::new_v4();
        service.create_session(match_a).await.unwrap();
        service.create_session(match_b).await.unwrap();

        service
            .submit(match_a, ParticipantId(0), payload(0))
            .await
            .unwrap();

        assert_eq!(service.vote_count(match_a).await.unwrap(), 1);
        assert_eq!(service.vote_count(match_b).await.unwrap(), 0);

        service.destroy_session(match_a).await.unwrap();
        assert_eq!(service.vote_count(match_b).await.unwrap(), 0);
        assert_eq!(service.session_count(), 1);
    }

    #[test]
    fn test_concurrent_submissions_from_threads() {
        use std::thread;

        let service = Arc::new(service());
        let match_id = MatchId::new_v4();
        service.insert_session(match_id).unwrap();
        let session = service.session(match_id).unwrap();

        let handles: Vec<_> = (0u8..4)
            .map(|seat| {
                let session = session.clone();
                thread::spawn(move || session.submit(ParticipantId(seat), &payload(0)))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap().is_accepted());
        }

        let outcome = session.evaluate(4, QuorumThreshold::SIMPLE_MAJORITY);
        assert_eq!(outcome.agreed().unwrap().voters.len(), 4);
    }
}
