use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Tea Round Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::teams::list_teams,
        crate::routes::teams::create_team,
        crate::routes::teams::get_team,
        crate::routes::teams::update_team,
        crate::routes::teams::delete_team,
        crate::routes::teams::previous_participant_selections,
        crate::routes::participants::add_participant,
        crate::routes::participants::set_preferred_order,
        crate::routes::participants::remove_participant,
        crate::routes::participants::pick_random_participant,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::team::CreateTeamRequest,
            crate::dto::team::UpdateTeamRequest,
            crate::dto::team::ParticipantInput,
            crate::dto::team::TeamSummary,
            crate::dto::team::ParticipantSummary,
            crate::dto::round::TeaRoundSummary,
            crate::dto::round::TeaOrderSummary,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "teams", description = "Team management and round history"),
        (name = "participants", description = "Roster management and tea-maker selection"),
    )
)]
pub struct ApiDoc;
