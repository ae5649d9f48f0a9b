use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::{
        round::TeaRoundSummary,
        team::{CreateTeamRequest, TeamSummary, UpdateTeamRequest},
    },
    error::AppError,
    services::{history_service, team_service},
    state::SharedState,
};

/// Routes handling team management and round history.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route(
            "/teams/{id}",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route(
            "/teams/{id}/previous-participant-selections",
            get(previous_participant_selections),
        )
}

/// Retrieve all teams with their rosters.
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    responses((status = 200, description = "List all teams", body = [TeamSummary]))
)]
pub async fn list_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamSummary>>, AppError> {
    Ok(Json(team_service::list_teams(&state).await?))
}

/// Create a team with an empty roster.
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 200, description = "Team created", body = TeamSummary),
        (status = 400, description = "Blank label"),
    )
)]
pub async fn create_team(
    State(state): State<SharedState>,
    Json(payload): Json<CreateTeamRequest>,
) -> Result<Json<TeamSummary>, AppError> {
    Ok(Json(team_service::create_team(&state, payload).await?))
}

/// Retrieve one team by its identifier.
#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = i32, Path, description = "Identifier of the team to retrieve")),
    responses(
        (status = 200, description = "Team", body = TeamSummary),
        (status = 404, description = "No team with this id"),
    )
)]
pub async fn get_team(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Json<TeamSummary>, AppError> {
    Ok(Json(team_service::get_team(&state, id).await?))
}

/// Replace a team record wholesale.
#[utoipa::path(
    put,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = i32, Path, description = "Identifier of the team to replace")),
    request_body = UpdateTeamRequest,
    responses(
        (status = 204, description = "Team replaced"),
        (status = 400, description = "Id mismatch or blank label"),
        (status = 404, description = "Team vanished before the write"),
        (status = 409, description = "Concurrent modification detected"),
    )
)]
pub async fn update_team(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTeamRequest>,
) -> Result<StatusCode, AppError> {
    team_service::update_team(&state, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a team together with its roster and recorded rounds.
#[utoipa::path(
    delete,
    path = "/teams/{id}",
    tag = "teams",
    params(("id" = i32, Path, description = "Identifier of the team to delete")),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 404, description = "No team with this id"),
    )
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    team_service::delete_team(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Retrieve the previous tea rounds recorded for a team.
#[utoipa::path(
    get,
    path = "/teams/{id}/previous-participant-selections",
    tag = "teams",
    params(("id" = i32, Path, description = "Identifier of the team")),
    responses((status = 200, description = "Recorded rounds with order snapshots", body = [TeaRoundSummary]))
)]
pub async fn previous_participant_selections(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<TeaRoundSummary>>, AppError> {
    Ok(Json(history_service::previous_rounds(&state, id).await?))
}
