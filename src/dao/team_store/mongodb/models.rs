use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};

use crate::dao::models::{
    NewTeaRound, ParticipantEntity, TeaOrderEntity, TeaRoundEntity, TeamEntity,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamDocument {
    #[serde(rename = "_id")]
    id: i32,
    label: String,
    // BSON has no unsigned 64-bit integer, so the counter travels as i64.
    version: i64,
    participants: Vec<ParticipantEntity>,
}

impl From<TeamEntity> for MongoTeamDocument {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id,
            label: value.label,
            version: value.version as i64,
            participants: value.participants,
        }
    }
}

impl From<MongoTeamDocument> for TeamEntity {
    fn from(value: MongoTeamDocument) -> Self {
        Self {
            id: value.id,
            label: value.label,
            version: value.version as u64,
            participants: value.participants,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRoundDocument {
    #[serde(rename = "_id")]
    id: i32,
    team_id: i32,
    chosen_participant: String,
    picked_at: DateTime,
    orders: Vec<TeaOrderEntity>,
}

impl MongoRoundDocument {
    /// Build a round document from the store-assigned id and the new round payload.
    pub fn new(id: i32, round: NewTeaRound) -> Self {
        Self {
            id,
            team_id: round.team_id,
            chosen_participant: round.chosen_participant,
            picked_at: DateTime::from_system_time(round.picked_at),
            orders: round.orders,
        }
    }
}

impl From<MongoRoundDocument> for TeaRoundEntity {
    fn from(value: MongoRoundDocument) -> Self {
        Self {
            id: value.id,
            team_id: value.team_id,
            chosen_participant: value.chosen_participant,
            picked_at: value.picked_at.to_system_time(),
            orders: value.orders,
        }
    }
}

/// Counter record backing the store-controlled identity sequences.
#[derive(Debug, Serialize, Deserialize)]
pub struct CounterDocument {
    #[serde(rename = "_id")]
    pub sequence: String,
    pub value: i32,
}

pub fn doc_id(id: i32) -> Document {
    doc! {"_id": id}
}
