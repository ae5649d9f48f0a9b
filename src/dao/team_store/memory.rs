//! In-memory [`TeamStore`] backend.
//!
//! Used for development without a database and as the backend the unit tests
//! run against. Identifier sequences are monotonic and never reused, and
//! `replace_team` checks the version counter under the map's shard lock so
//! concurrent writers observe the same compare-and-swap semantics as the
//! durable backend.

use std::sync::{
    Arc,
    atomic::{AtomicI32, Ordering},
};

use dashmap::DashMap;
use futures::future::BoxFuture;

use crate::dao::{
    models::{NewTeaRound, TeaRoundEntity, TeamEntity},
    storage::{StorageError, StorageResult},
    team_store::TeamStore,
};

/// Process-local store keeping teams and rounds in concurrent maps.
#[derive(Clone, Default)]
pub struct MemoryTeamStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    teams: DashMap<i32, TeamEntity>,
    rounds: DashMap<i32, TeaRoundEntity>,
    next_team_id: AtomicI32,
    next_round_id: AtomicI32,
}

impl MemoryTeamStore {
    /// Create an empty store with fresh identifier sequences.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TeamStore for MemoryTeamStore {
    fn insert_team(&self, label: String) -> BoxFuture<'static, StorageResult<TeamEntity>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let id = inner.next_team_id.fetch_add(1, Ordering::Relaxed) + 1;
            let team = TeamEntity {
                id,
                label,
                version: 1,
                participants: Vec::new(),
            };
            inner.teams.insert(id, team.clone());
            Ok(team)
        })
    }

    fn find_team(&self, id: i32) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.teams.get(&id).map(|entry| entry.value().clone())) })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut teams: Vec<TeamEntity> =
                inner.teams.iter().map(|entry| entry.value().clone()).collect();
            teams.sort_by_key(|team| team.id);
            Ok(teams)
        })
    }

    fn replace_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<TeamEntity>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            // The shard lock held by `get_mut` makes the version check and the
            // replacement one atomic step.
            let Some(mut stored) = inner.teams.get_mut(&team.id) else {
                return Err(StorageError::conflict("team", team.id));
            };
            if stored.version != team.version {
                return Err(StorageError::conflict("team", team.id));
            }
            *stored = TeamEntity {
                version: team.version + 1,
                ..team
            };
            Ok(stored.value().clone())
        })
    }

    fn remove_team(&self, id: i32) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let removed = inner.teams.remove(&id).is_some();
            if removed {
                inner.rounds.retain(|_, round| round.team_id != id);
            }
            Ok(removed)
        })
    }

    fn append_round(
        &self,
        round: NewTeaRound,
    ) -> BoxFuture<'static, StorageResult<TeaRoundEntity>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let id = inner.next_round_id.fetch_add(1, Ordering::Relaxed) + 1;
            let round = TeaRoundEntity {
                id,
                team_id: round.team_id,
                chosen_participant: round.chosen_participant,
                picked_at: round.picked_at,
                orders: round.orders,
            };
            inner.rounds.insert(id, round.clone());
            Ok(round)
        })
    }

    fn rounds_for_team(
        &self,
        team_id: i32,
    ) -> BoxFuture<'static, StorageResult<Vec<TeaRoundEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let mut rounds: Vec<TeaRoundEntity> = inner
                .rounds
                .iter()
                .filter(|entry| entry.value().team_id == team_id)
                .map(|entry| entry.value().clone())
                .collect();
            rounds.sort_by_key(|round| round.id);
            Ok(rounds)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::dao::models::TeaOrderEntity;

    fn round_for(team_id: i32, chosen: &str) -> NewTeaRound {
        NewTeaRound {
            team_id,
            chosen_participant: chosen.to_string(),
            picked_at: SystemTime::now(),
            orders: vec![TeaOrderEntity {
                participant_name: chosen.to_string(),
                preferred_order: None,
            }],
        }
    }

    #[tokio::test]
    async fn insert_assigns_monotonic_ids() {
        let store = MemoryTeamStore::new();
        let first = store.insert_team("Engineering".into()).await.unwrap();
        let second = store.insert_team("Design".into()).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.version, 1);
        assert!(first.participants.is_empty());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_removal() {
        let store = MemoryTeamStore::new();
        let first = store.insert_team("Engineering".into()).await.unwrap();
        assert!(store.remove_team(first.id).await.unwrap());

        let second = store.insert_team("Design".into()).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn replace_bumps_version_by_one() {
        let store = MemoryTeamStore::new();
        let mut team = store.insert_team("Engineering".into()).await.unwrap();
        team.label = "Platform".into();

        let stored = store.replace_team(team).await.unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.label, "Platform");
    }

    #[tokio::test]
    async fn replace_with_stale_version_conflicts() {
        let store = MemoryTeamStore::new();
        let stale = store.insert_team("Engineering".into()).await.unwrap();
        store.replace_team(stale.clone()).await.unwrap();

        let err = store.replace_team(stale).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict { entity: "team", .. }));
    }

    #[tokio::test]
    async fn replace_of_vanished_team_conflicts() {
        let store = MemoryTeamStore::new();
        let team = store.insert_team("Engineering".into()).await.unwrap();
        store.remove_team(team.id).await.unwrap();

        let err = store.replace_team(team).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict { entity: "team", .. }));
    }

    #[tokio::test]
    async fn remove_reports_absent_teams() {
        let store = MemoryTeamStore::new();
        assert!(!store.remove_team(42).await.unwrap());
    }

    #[tokio::test]
    async fn rounds_are_scoped_to_their_team() {
        let store = MemoryTeamStore::new();
        let tea = store.insert_team("Tea".into()).await.unwrap();
        let coffee = store.insert_team("Coffee".into()).await.unwrap();

        store.append_round(round_for(tea.id, "Alice")).await.unwrap();
        store.append_round(round_for(coffee.id, "Bob")).await.unwrap();
        store.append_round(round_for(tea.id, "Carol")).await.unwrap();

        let rounds = store.rounds_for_team(tea.id).await.unwrap();
        assert_eq!(rounds.len(), 2);
        assert!(rounds.iter().all(|round| round.team_id == tea.id));
    }

    #[tokio::test]
    async fn removing_a_team_drops_its_rounds() {
        let store = MemoryTeamStore::new();
        let tea = store.insert_team("Tea".into()).await.unwrap();
        let coffee = store.insert_team("Coffee".into()).await.unwrap();
        store.append_round(round_for(tea.id, "Alice")).await.unwrap();
        store.append_round(round_for(coffee.id, "Bob")).await.unwrap();

        store.remove_team(tea.id).await.unwrap();

        assert!(store.rounds_for_team(tea.id).await.unwrap().is_empty());
        assert_eq!(store.rounds_for_team(coffee.id).await.unwrap().len(), 1);
    }
}
