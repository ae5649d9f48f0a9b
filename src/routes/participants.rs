use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};

use crate::{
    error::AppError,
    services::{selection_service, team_service},
    state::SharedState,
};

/// Routes handling roster membership and the tea-maker draw.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/participant/{team_id}", post(add_participant))
        .route(
            "/participant/{team_id}/random",
            get(pick_random_participant),
        )
        .route(
            "/participant/{team_id}/{name}",
            put(set_preferred_order).delete(remove_participant),
        )
}

/// Add a participant to a team's roster.
#[utoipa::path(
    post,
    path = "/participant/{team_id}",
    tag = "participants",
    params(("team_id" = i32, Path, description = "Identifier of the team")),
    request_body(content = String, description = "Participant name as a JSON string"),
    responses(
        (status = 204, description = "Participant added"),
        (status = 400, description = "Blank name"),
        (status = 404, description = "No team with this id"),
        (status = 409, description = "Name already on the roster"),
    )
)]
pub async fn add_participant(
    State(state): State<SharedState>,
    Path(team_id): Path<i32>,
    Json(name): Json<String>,
) -> Result<StatusCode, AppError> {
    team_service::add_participant(&state, team_id, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Update a participant's preferred tea order; an empty body clears it.
#[utoipa::path(
    put,
    path = "/participant/{team_id}/{name}",
    tag = "participants",
    params(
        ("team_id" = i32, Path, description = "Identifier of the team"),
        ("name" = String, Path, description = "Participant name"),
    ),
    request_body(content = String, description = "Preferred order as a JSON string"),
    responses(
        (status = 204, description = "Preferred order updated"),
        (status = 404, description = "Team or participant not found"),
    )
)]
pub async fn set_preferred_order(
    State(state): State<SharedState>,
    Path((team_id, name)): Path<(i32, String)>,
    Json(order): Json<String>,
) -> Result<StatusCode, AppError> {
    team_service::set_preferred_order(&state, team_id, &name, Some(order)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a participant from a team's roster.
#[utoipa::path(
    delete,
    path = "/participant/{team_id}/{name}",
    tag = "participants",
    params(
        ("team_id" = i32, Path, description = "Identifier of the team"),
        ("name" = String, Path, description = "Participant name"),
    ),
    responses(
        (status = 204, description = "Participant removed"),
        (status = 404, description = "Team or participant not found"),
    )
)]
pub async fn remove_participant(
    State(state): State<SharedState>,
    Path((team_id, name)): Path<(i32, String)>,
) -> Result<StatusCode, AppError> {
    team_service::remove_participant(&state, team_id, &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Pick a tea maker uniformly at random and record the round.
#[utoipa::path(
    get,
    path = "/participant/{team_id}/random",
    tag = "participants",
    params(("team_id" = i32, Path, description = "Identifier of the team")),
    responses(
        (status = 200, description = "Name of the chosen participant", body = String),
        (status = 404, description = "Team missing or roster empty"),
    )
)]
pub async fn pick_random_participant(
    State(state): State<SharedState>,
    Path(team_id): Path<i32>,
) -> Result<Json<String>, AppError> {
    Ok(Json(
        selection_service::pick_tea_maker(&state, team_id).await?,
    ))
}
