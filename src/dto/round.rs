//! DTO definitions for the round history endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dao::models::{TeaOrderEntity, TeaRoundEntity},
    dto::format_system_time,
};

/// One historical tea round with its per-participant order snapshots.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeaRoundSummary {
    pub id: i32,
    /// Selection timestamp rendered as RFC 3339.
    pub date: String,
    pub chosen_participant: String,
    pub tea_orders: Vec<TeaOrderSummary>,
}

/// Snapshot of one participant's preferred order inside a round.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeaOrderSummary {
    pub participant_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_order: Option<String>,
}

impl From<TeaOrderEntity> for TeaOrderSummary {
    fn from(value: TeaOrderEntity) -> Self {
        Self {
            participant_name: value.participant_name,
            preferred_order: value.preferred_order,
        }
    }
}

impl From<TeaRoundEntity> for TeaRoundSummary {
    fn from(value: TeaRoundEntity) -> Self {
        Self {
            id: value.id,
            date: format_system_time(value.picked_at),
            chosen_participant: value.chosen_participant,
            tea_orders: value.orders.into_iter().map(Into::into).collect(),
        }
    }
}
