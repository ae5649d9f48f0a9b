pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{NewTeaRound, TeaRoundEntity, TeamEntity};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for teams and their round history.
///
/// Identity assignment is store-controlled: `insert_team` and `append_round`
/// hand back the record with its freshly assigned id. `replace_team` performs
/// a compare-and-swap on the team's version counter and reports a conflict
/// when the stored version does not match the caller's copy.
pub trait TeamStore: Send + Sync {
    fn insert_team(&self, label: String) -> BoxFuture<'static, StorageResult<TeamEntity>>;
    fn find_team(&self, id: i32) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    fn replace_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<TeamEntity>>;
    fn remove_team(&self, id: i32) -> BoxFuture<'static, StorageResult<bool>>;
    fn append_round(&self, round: NewTeaRound) -> BoxFuture<'static, StorageResult<TeaRoundEntity>>;
    fn rounds_for_team(&self, team_id: i32)
    -> BoxFuture<'static, StorageResult<Vec<TeaRoundEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
