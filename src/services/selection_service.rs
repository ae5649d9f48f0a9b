//! The selection engine: uniform random choice of the next tea maker.
//!
//! Every pick is memoryless; previous rounds carry no weight. The recorded
//! round and its per-participant order snapshots are handed to the store as
//! one payload so the write is all-or-nothing.

use std::time::SystemTime;

use rand::seq::IndexedRandom;
use tracing::debug;

use crate::{
    dao::models::{NewTeaRound, TeaOrderEntity},
    error::ServiceError,
    state::SharedState,
};

/// Pick one participant uniformly at random from the team's current roster,
/// record the round with an order snapshot per participant, and return the
/// chosen name.
pub async fn pick_tea_maker(state: &SharedState, team_id: i32) -> Result<String, ServiceError> {
    let store = state.require_team_store().await?;

    let Some(team) = store.find_team(team_id).await? else {
        return Err(ServiceError::NotFound(format!("team `{team_id}` not found")));
    };

    // No round is recorded when there is nobody to choose from.
    let chosen = {
        let mut rng = rand::rng();
        team.participants.choose(&mut rng).cloned()
    };
    let Some(chosen) = chosen else {
        return Err(ServiceError::NotFound(format!(
            "team `{team_id}` has no participants to pick from"
        )));
    };

    let orders = team
        .participants
        .iter()
        .map(|participant| TeaOrderEntity {
            participant_name: participant.name.clone(),
            preferred_order: participant.preferred_order.clone(),
        })
        .collect();

    let round = store
        .append_round(NewTeaRound {
            team_id,
            chosen_participant: chosen.name.clone(),
            picked_at: SystemTime::now(),
            orders,
        })
        .await?;

    debug!(team_id, round_id = round.id, chosen = %chosen.name, "recorded tea round");
    Ok(chosen.name)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::{
        dao::team_store::memory::MemoryTeamStore,
        dto::team::CreateTeamRequest,
        services::{history_service, team_service},
        state::AppState,
    };

    async fn team_with_roster(state: &SharedState, names: &[&str]) -> i32 {
        let team = team_service::create_team(
            state,
            CreateTeamRequest {
                label: "Engineering".into(),
            },
        )
        .await
        .unwrap();
        for name in names {
            team_service::add_participant(state, team.id, name)
                .await
                .unwrap();
        }
        team.id
    }

    async fn test_state() -> SharedState {
        let state = AppState::new();
        state
            .install_team_store(Arc::new(MemoryTeamStore::new()))
            .await;
        state
    }

    #[tokio::test]
    async fn pick_on_empty_roster_fails_and_records_nothing() {
        let state = test_state().await;
        let team_id = team_with_roster(&state, &[]).await;

        let err = pick_tea_maker(&state, team_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert!(history_service::previous_rounds(&state, team_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn pick_on_unknown_team_fails() {
        let state = test_state().await;
        let err = pick_tea_maker(&state, 42).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn pick_snapshots_the_roster_orders() {
        let state = test_state().await;
        let team_id = team_with_roster(&state, &["Alice", "Bob", "Carol"]).await;
        team_service::set_preferred_order(
            &state,
            team_id,
            "Carol",
            Some("Earl Grey, no sugar".into()),
        )
        .await
        .unwrap();

        let chosen = pick_tea_maker(&state, team_id).await.unwrap();
        assert!(["Alice", "Bob", "Carol"].contains(&chosen.as_str()));

        let rounds = history_service::previous_rounds(&state, team_id)
            .await
            .unwrap();
        assert_eq!(rounds.len(), 1);

        let round = &rounds[0];
        assert_eq!(round.chosen_participant, chosen);
        assert_eq!(round.tea_orders.len(), 3);

        let carol = round
            .tea_orders
            .iter()
            .find(|order| order.participant_name == "Carol")
            .unwrap();
        assert_eq!(carol.preferred_order.as_deref(), Some("Earl Grey, no sugar"));
        assert!(round
            .tea_orders
            .iter()
            .filter(|order| order.participant_name != "Carol")
            .all(|order| order.preferred_order.is_none()));
    }

    #[tokio::test]
    async fn each_pick_appends_exactly_one_round() {
        let state = test_state().await;
        let team_id = team_with_roster(&state, &["Alice", "Bob"]).await;

        for expected in 1..=5 {
            pick_tea_maker(&state, team_id).await.unwrap();
            let rounds = history_service::previous_rounds(&state, team_id)
                .await
                .unwrap();
            assert_eq!(rounds.len(), expected);
            assert_eq!(rounds.last().unwrap().tea_orders.len(), 2);
        }
    }

    #[tokio::test]
    async fn selection_is_roughly_uniform() {
        let state = test_state().await;
        let team_id = team_with_roster(&state, &["Alice", "Bob", "Carol"]).await;

        let mut tally: HashMap<String, u32> = HashMap::new();
        for _ in 0..3_000 {
            let chosen = pick_tea_maker(&state, team_id).await.unwrap();
            *tally.entry(chosen).or_default() += 1;
        }

        assert_eq!(tally.len(), 3);
        for (name, count) in tally {
            // Expectation is 1000 per participant; 800 is far beyond any
            // plausible deviation for a uniform draw.
            assert!(count >= 800, "{name} was picked only {count} times");
        }
    }
}
