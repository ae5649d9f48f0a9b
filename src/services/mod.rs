/// OpenAPI document aggregation.
pub mod documentation;
/// Health reporting for the `/healthcheck` route.
pub mod health_service;
/// Read-only round history projections.
pub mod history_service;
/// Uniform random tea-maker selection and round recording.
pub mod selection_service;
/// Storage connection supervision and degraded-mode handling.
pub mod storage_supervisor;
/// Team and roster management.
pub mod team_service;
