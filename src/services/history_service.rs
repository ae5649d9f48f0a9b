//! Read-only projection of a team's recorded tea rounds.

use crate::{dto::round::TeaRoundSummary, error::ServiceError, state::SharedState};

/// Return the rounds recorded for a team with their nested order snapshots.
///
/// The set is content-complete but carries no ordering guarantee; the
/// presentation layer re-sorts for display. An unknown team yields an empty
/// set rather than an error.
pub async fn previous_rounds(
    state: &SharedState,
    team_id: i32,
) -> Result<Vec<TeaRoundSummary>, ServiceError> {
    let store = state.require_team_store().await?;
    let rounds = store.rounds_for_team(team_id).await?;
    Ok(rounds.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        dao::team_store::memory::MemoryTeamStore,
        dto::team::CreateTeamRequest,
        services::{selection_service, team_service},
        state::AppState,
    };

    async fn test_state() -> SharedState {
        let state = AppState::new();
        state
            .install_team_store(Arc::new(MemoryTeamStore::new()))
            .await;
        state
    }

    #[tokio::test]
    async fn unknown_teams_have_empty_history() {
        let state = test_state().await;
        assert!(previous_rounds(&state, 42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn history_is_scoped_to_the_requested_team() {
        let state = test_state().await;

        let mut team_ids = Vec::new();
        for label in ["Tea", "Coffee"] {
            let team = team_service::create_team(
                &state,
                CreateTeamRequest {
                    label: label.into(),
                },
            )
            .await
            .unwrap();
            team_service::add_participant(&state, team.id, "Alice")
                .await
                .unwrap();
            team_ids.push(team.id);
        }

        selection_service::pick_tea_maker(&state, team_ids[0])
            .await
            .unwrap();
        selection_service::pick_tea_maker(&state, team_ids[0])
            .await
            .unwrap();
        selection_service::pick_tea_maker(&state, team_ids[1])
            .await
            .unwrap();

        assert_eq!(previous_rounds(&state, team_ids[0]).await.unwrap().len(), 2);
        assert_eq!(previous_rounds(&state, team_ids[1]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_team_removes_its_history() {
        let state = test_state().await;
        let team = team_service::create_team(
            &state,
            CreateTeamRequest {
                label: "Tea".into(),
            },
        )
        .await
        .unwrap();
        team_service::add_participant(&state, team.id, "Alice")
            .await
            .unwrap();
        selection_service::pick_tea_maker(&state, team.id)
            .await
            .unwrap();

        team_service::delete_team(&state, team.id).await.unwrap();
        assert!(previous_rounds(&state, team.id).await.unwrap().is_empty());
    }
}
