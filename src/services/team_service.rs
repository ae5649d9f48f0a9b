//! Business logic for team and roster management.
//!
//! All writes go through the store's version-checked replacement. When the
//! store reports a conflict, this layer performs exactly one disambiguation
//! read to tell "deleted concurrently" (reported as not-found) apart from a
//! genuine conflicting mutation (reported as a conflict); it never retries or
//! merges on the caller's behalf.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    dao::{
        models::{ParticipantEntity, TeamEntity},
        storage::StorageError,
        team_store::TeamStore,
    },
    dto::{
        team::{CreateTeamRequest, TeamSummary, UpdateTeamRequest},
        validation::{validate_label, validate_participant_name},
    },
    error::ServiceError,
    state::SharedState,
};

/// Return every team with its nested roster.
pub async fn list_teams(state: &SharedState) -> Result<Vec<TeamSummary>, ServiceError> {
    let store = state.require_team_store().await?;
    let teams = store.list_teams().await?;
    Ok(teams.into_iter().map(Into::into).collect())
}

/// Return one team with its nested roster.
pub async fn get_team(state: &SharedState, id: i32) -> Result<TeamSummary, ServiceError> {
    let store = state.require_team_store().await?;
    let Some(team) = store.find_team(id).await? else {
        return Err(not_found(id));
    };
    Ok(team.into())
}

/// Create a team with an empty roster.
pub async fn create_team(
    state: &SharedState,
    request: CreateTeamRequest,
) -> Result<TeamSummary, ServiceError> {
    validate_label(&request.label).map_err(invalid)?;

    let store = state.require_team_store().await?;
    match store.insert_team(request.label).await {
        Ok(team) => {
            debug!(team_id = team.id, "created team");
            Ok(team.into())
        }
        // Identity assignment is store-controlled, so a collision can only be
        // diagnosed after the write failed: if a record now exists under the
        // id the store tried to claim, the identity was already taken.
        Err(StorageError::Conflict { id, .. }) => {
            if store.find_team(id).await?.is_some() {
                Err(ServiceError::Conflict(format!("team `{id}` already exists")))
            } else {
                Err(StorageError::conflict("team", id).into())
            }
        }
        Err(err) => Err(err.into()),
    }
}

/// Replace a team record wholesale, using the version the caller last read.
pub async fn update_team(
    state: &SharedState,
    id: i32,
    request: UpdateTeamRequest,
) -> Result<TeamSummary, ServiceError> {
    if id != request.id {
        return Err(ServiceError::InvalidInput(format!(
            "team id mismatch: path says `{id}`, payload says `{}`",
            request.id
        )));
    }
    validate_label(&request.label).map_err(invalid)?;

    let participants: Vec<ParticipantEntity> =
        request.participants.into_iter().map(Into::into).collect();
    ensure_unique_names(&participants)?;

    let team = TeamEntity {
        id,
        label: request.label,
        version: request.version,
        participants,
    };

    let store = state.require_team_store().await?;
    match store.replace_team(team).await {
        Ok(stored) => Ok(stored.into()),
        Err(StorageError::Conflict { .. }) => Err(disambiguate_conflict(&store, id).await),
        Err(err) => Err(err.into()),
    }
}

/// Delete a team, cascading to its roster and recorded rounds.
pub async fn delete_team(state: &SharedState, id: i32) -> Result<(), ServiceError> {
    let store = state.require_team_store().await?;
    if !store.remove_team(id).await? {
        return Err(not_found(id));
    }
    debug!(team_id = id, "deleted team");
    Ok(())
}

/// Append a participant to a team's roster.
pub async fn add_participant(
    state: &SharedState,
    team_id: i32,
    name: &str,
) -> Result<(), ServiceError> {
    let name = name.trim();
    validate_participant_name(name).map_err(invalid)?;

    let store = state.require_team_store().await?;
    let Some(mut team) = store.find_team(team_id).await? else {
        return Err(not_found(team_id));
    };

    if team.participants.iter().any(|p| p.name == name) {
        return Err(ServiceError::Conflict(format!(
            "participant `{name}` already exists in team `{team_id}`"
        )));
    }

    team.participants.push(ParticipantEntity {
        name: name.to_string(),
        preferred_order: None,
    });

    replace_roster(&store, team).await
}

/// Remove a participant from a team's roster.
pub async fn remove_participant(
    state: &SharedState,
    team_id: i32,
    name: &str,
) -> Result<(), ServiceError> {
    let store = state.require_team_store().await?;
    let Some(mut team) = store.find_team(team_id).await? else {
        return Err(not_found(team_id));
    };

    let before = team.participants.len();
    team.participants.retain(|p| p.name != name);
    if team.participants.len() == before {
        return Err(ServiceError::NotFound(format!(
            "participant `{name}` not found in team `{team_id}`"
        )));
    }

    replace_roster(&store, team).await
}

/// Update one participant's preferred tea order; a blank order clears it.
pub async fn set_preferred_order(
    state: &SharedState,
    team_id: i32,
    name: &str,
    order: Option<String>,
) -> Result<(), ServiceError> {
    let order = order.filter(|value| !value.trim().is_empty());

    let store = state.require_team_store().await?;
    let Some(mut team) = store.find_team(team_id).await? else {
        return Err(not_found(team_id));
    };

    let Some(participant) = team.participants.iter_mut().find(|p| p.name == name) else {
        return Err(ServiceError::NotFound(format!(
            "participant `{name}` not found in team `{team_id}`"
        )));
    };
    participant.preferred_order = order;

    replace_roster(&store, team).await
}

async fn replace_roster(
    store: &Arc<dyn TeamStore>,
    team: TeamEntity,
) -> Result<(), ServiceError> {
    let id = team.id;
    match store.replace_team(team).await {
        Ok(_) => Ok(()),
        Err(StorageError::Conflict { .. }) => Err(disambiguate_conflict(store, id).await),
        Err(err) => Err(err.into()),
    }
}

/// One existence re-check to classify a write conflict. The record being gone
/// means the caller raced a deletion; anything else is a lost update the
/// caller has to resolve.
async fn disambiguate_conflict(store: &Arc<dyn TeamStore>, id: i32) -> ServiceError {
    match store.find_team(id).await {
        Ok(None) => not_found(id),
        Ok(Some(_)) => {
            warn!(team_id = id, "team was modified concurrently");
            ServiceError::Conflict(format!("team `{id}` was modified concurrently"))
        }
        Err(err) => err.into(),
    }
}

fn not_found(id: i32) -> ServiceError {
    ServiceError::NotFound(format!("team `{id}` not found"))
}

fn invalid(err: validator::ValidationError) -> ServiceError {
    ServiceError::InvalidInput(
        err.message
            .map(|message| message.into_owned())
            .unwrap_or_else(|| err.code.into_owned()),
    )
}

fn ensure_unique_names(participants: &[ParticipantEntity]) -> Result<(), ServiceError> {
    for (index, participant) in participants.iter().enumerate() {
        if participants[..index]
            .iter()
            .any(|other| other.name == participant.name)
        {
            return Err(ServiceError::InvalidInput(format!(
                "duplicate participant name `{}`",
                participant.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        dao::team_store::memory::MemoryTeamStore,
        dto::team::{CreateTeamRequest, ParticipantInput, UpdateTeamRequest},
        state::AppState,
    };

    async fn test_state() -> SharedState {
        let state = AppState::new();
        state
            .install_team_store(Arc::new(MemoryTeamStore::new()))
            .await;
        state
    }

    fn create(label: &str) -> CreateTeamRequest {
        CreateTeamRequest {
            label: label.to_string(),
        }
    }

    fn full_update(team: &TeamSummary, label: &str) -> UpdateTeamRequest {
        UpdateTeamRequest {
            id: team.id,
            label: label.to_string(),
            version: team.version,
            participants: team
                .participants
                .iter()
                .map(|p| ParticipantInput {
                    name: p.name.clone(),
                    preferred_order: p.preferred_order.clone(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn created_team_is_retrievable_with_empty_roster() {
        let state = test_state().await;
        let created = create_team(&state, create("Engineering")).await.unwrap();

        let fetched = get_team(&state, created.id).await.unwrap();
        assert_eq!(fetched.label, "Engineering");
        assert!(fetched.participants.is_empty());
    }

    #[tokio::test]
    async fn blank_labels_are_rejected_without_store_mutation() {
        let state = test_state().await;

        for label in ["", "   ", "\t"] {
            let err = create_team(&state, create(label)).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidInput(_)));
        }

        assert!(list_teams(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_with_mismatched_id_fails_before_the_store_is_touched() {
        let state = test_state().await;
        let team = create_team(&state, create("Engineering")).await.unwrap();

        let mut request = full_update(&team, "Platform");
        request.id = team.id + 1;

        // A not-found team id in the payload would also fail, but the mismatch
        // must win: the guard runs before any store call.
        let err = update_team(&state, team.id, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(get_team(&state, team.id).await.unwrap().label, "Engineering");
    }

    #[tokio::test]
    async fn update_replaces_label_and_roster_and_bumps_version() {
        let state = test_state().await;
        let team = create_team(&state, create("Engineering")).await.unwrap();

        let mut request = full_update(&team, "Platform");
        request.participants.push(ParticipantInput {
            name: "Alice".into(),
            preferred_order: Some("Builder's".into()),
        });

        let updated = update_team(&state, team.id, request).await.unwrap();
        assert_eq!(updated.label, "Platform");
        assert_eq!(updated.version, team.version + 1);
        assert_eq!(updated.participants.len(), 1);
    }

    #[tokio::test]
    async fn stale_version_update_is_a_conflict() {
        let state = test_state().await;
        let team = create_team(&state, create("Engineering")).await.unwrap();

        update_team(&state, team.id, full_update(&team, "Platform"))
            .await
            .unwrap();

        // Second writer still holds the original version.
        let err = update_team(&state, team.id, full_update(&team, "Infra"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(get_team(&state, team.id).await.unwrap().label, "Platform");
    }

    #[tokio::test]
    async fn update_of_concurrently_deleted_team_reports_not_found() {
        let state = test_state().await;
        let team = create_team(&state, create("Engineering")).await.unwrap();
        delete_team(&state, team.id).await.unwrap();

        let err = update_team(&state, team.id, full_update(&team, "Platform"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_rejects_duplicate_roster_names() {
        let state = test_state().await;
        let team = create_team(&state, create("Engineering")).await.unwrap();

        let mut request = full_update(&team, "Engineering");
        for _ in 0..2 {
            request.participants.push(ParticipantInput {
                name: "Alice".into(),
                preferred_order: None,
            });
        }

        let err = update_team(&state, team.id, request).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn delete_is_not_found_for_unknown_ids_and_removes_known_ones() {
        let state = test_state().await;
        assert!(matches!(
            delete_team(&state, 42).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));

        let team = create_team(&state, create("Engineering")).await.unwrap();
        delete_team(&state, team.id).await.unwrap();

        assert!(matches!(
            get_team(&state, team.id).await.unwrap_err(),
            ServiceError::NotFound(_)
        ));
        assert!(list_teams(&state).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn participants_are_trimmed_and_deduplicated() {
        let state = test_state().await;
        let team = create_team(&state, create("Engineering")).await.unwrap();

        add_participant(&state, team.id, "  Alice  ").await.unwrap();
        let err = add_participant(&state, team.id, "Alice").await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let roster = get_team(&state, team.id).await.unwrap().participants;
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Alice");
    }

    #[tokio::test]
    async fn blank_participant_names_are_rejected() {
        let state = test_state().await;
        let team = create_team(&state, create("Engineering")).await.unwrap();

        let err = add_participant(&state, team.id, "   ").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn remove_participant_requires_an_existing_member() {
        let state = test_state().await;
        let team = create_team(&state, create("Engineering")).await.unwrap();
        add_participant(&state, team.id, "Alice").await.unwrap();

        assert!(matches!(
            remove_participant(&state, team.id, "Bob").await.unwrap_err(),
            ServiceError::NotFound(_)
        ));

        remove_participant(&state, team.id, "Alice").await.unwrap();
        assert!(get_team(&state, team.id).await.unwrap().participants.is_empty());
    }

    #[tokio::test]
    async fn preferred_order_can_be_set_and_cleared() {
        let state = test_state().await;
        let team = create_team(&state, create("Engineering")).await.unwrap();
        add_participant(&state, team.id, "Carol").await.unwrap();

        set_preferred_order(&state, team.id, "Carol", Some("Earl Grey, no sugar".into()))
            .await
            .unwrap();
        let roster = get_team(&state, team.id).await.unwrap().participants;
        assert_eq!(
            roster[0].preferred_order.as_deref(),
            Some("Earl Grey, no sugar")
        );

        set_preferred_order(&state, team.id, "Carol", Some("   ".into()))
            .await
            .unwrap();
        let roster = get_team(&state, team.id).await.unwrap().participants;
        assert_eq!(roster[0].preferred_order, None);
    }

    #[tokio::test]
    async fn operations_fail_in_degraded_mode() {
        let state = AppState::new();
        let err = list_teams(&state).await.unwrap_err();
        assert!(matches!(err, ServiceError::Degraded));
    }
}
