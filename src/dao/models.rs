use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Representation of a team stored in persistence and shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Store-assigned identifier, stable for the lifetime of the team.
    pub id: i32,
    /// Display label chosen for the team.
    pub label: String,
    /// Optimistic-concurrency counter, bumped on every successful replacement.
    pub version: u64,
    /// Roster in insertion order.
    pub participants: Vec<ParticipantEntity>,
}

/// A single roster member embedded in its team record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantEntity {
    /// Participant name, unique within the owning team.
    pub name: String,
    /// Free-text preferred tea order, if the participant stated one.
    pub preferred_order: Option<String>,
}

/// One historical selection event persisted for a team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeaRoundEntity {
    /// Store-assigned identifier of the round.
    pub id: i32,
    /// Team the round was drawn for.
    pub team_id: i32,
    /// Name of the participant chosen to make tea.
    pub chosen_participant: String,
    /// Moment the selection was made.
    pub picked_at: SystemTime,
    /// Per-participant order snapshots taken when the round was recorded.
    pub orders: Vec<TeaOrderEntity>,
}

/// Snapshot of one participant's preferred order at selection time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeaOrderEntity {
    /// Name of the participant the snapshot belongs to.
    pub participant_name: String,
    /// Preferred order captured at the moment of the round, if any.
    pub preferred_order: Option<String>,
}

/// Round payload handed to the store before an identifier has been assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeaRound {
    /// Team the round is recorded for.
    pub team_id: i32,
    /// Name of the chosen participant.
    pub chosen_participant: String,
    /// Moment the selection was made.
    pub picked_at: SystemTime,
    /// Order snapshots for every participant on the roster at pick time.
    pub orders: Vec<TeaOrderEntity>,
}
