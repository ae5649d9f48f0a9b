//! DTO definitions for the team management REST API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dao::models::{ParticipantEntity, TeamEntity},
    dto::validation::validate_label,
};

/// Payload used to create a brand-new team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTeamRequest {
    /// Display label; must contain at least one non-whitespace character.
    #[validate(custom(function = validate_label))]
    pub label: String,
}

/// Full team payload submitted for replacement, carrying the version the
/// caller last read so the store can detect lost updates.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateTeamRequest {
    pub id: i32,
    #[validate(custom(function = validate_label))]
    pub label: String,
    /// Version counter from the caller's last read of this team.
    pub version: u64,
    pub participants: Vec<ParticipantInput>,
}

/// Incoming roster member inside a full team replacement.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ParticipantInput {
    pub name: String,
    #[serde(default)]
    pub preferred_order: Option<String>,
}

impl From<ParticipantInput> for ParticipantEntity {
    fn from(value: ParticipantInput) -> Self {
        Self {
            name: value.name,
            preferred_order: value.preferred_order,
        }
    }
}

/// Projection of a team returned by the management endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamSummary {
    pub id: i32,
    pub label: String,
    /// Echoed so callers can submit it back on their next update.
    pub version: u64,
    pub participants: Vec<ParticipantSummary>,
}

/// Projection of one roster member.
#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_order: Option<String>,
}

impl From<ParticipantEntity> for ParticipantSummary {
    fn from(value: ParticipantEntity) -> Self {
        Self {
            name: value.name,
            preferred_order: value.preferred_order,
        }
    }
}

impl From<TeamEntity> for TeamSummary {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id,
            label: value.label,
            version: value.version,
            participants: value.participants.into_iter().map(Into::into).collect(),
        }
    }
}
