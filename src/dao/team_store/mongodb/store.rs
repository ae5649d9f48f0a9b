use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Database,
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{CounterDocument, MongoRoundDocument, MongoTeamDocument, doc_id},
};
use crate::dao::{
    models::{NewTeaRound, TeaRoundEntity, TeamEntity},
    storage::{StorageError, StorageResult},
    team_store::TeamStore,
};

const TEAM_COLLECTION_NAME: &str = "teams";
const ROUND_COLLECTION_NAME: &str = "tea_rounds";
const COUNTER_COLLECTION_NAME: &str = "counters";

const TEAM_SEQUENCE: &str = "teams";
const ROUND_SEQUENCE: &str = "tea_rounds";

/// Durable [`TeamStore`] backed by MongoDB.
///
/// Teams embed their roster and rounds embed their order snapshots, so every
/// write the trait requires to be atomic is a single-document operation.
/// Optimistic concurrency rides on a `version` field matched in the
/// `replace_one` filter; a miss surfaces as [`StorageError::Conflict`].
#[derive(Clone)]
pub struct MongoTeamStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn database(&self) -> Database {
        let guard = self.state.read().await;
        guard.database.clone()
    }

    async fn ping(&self) -> MongoResult<()> {
        let database = self.database().await;
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }

    /// Claim the next id from a named counter document, creating it on first use.
    async fn next_id(&self, sequence: &'static str) -> MongoResult<i32> {
        let database = self.database().await;
        let counters = database.collection::<CounterDocument>(COUNTER_COLLECTION_NAME);

        let counter = counters
            .find_one_and_update(doc! {"_id": sequence}, doc! {"$inc": {"value": 1}})
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|source| MongoDaoError::AllocateId { sequence, source })?;

        match counter {
            Some(counter) => Ok(counter.value),
            // Upsert + After always yields a document; guard anyway.
            None => Err(MongoDaoError::AllocateId {
                sequence,
                source: mongodb::error::Error::custom("counter upsert returned no document"),
            }),
        }
    }
}

impl MongoTeamStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.inner.database().await;

        // History lookups are always scoped to one team.
        let rounds = database.collection::<MongoRoundDocument>(ROUND_COLLECTION_NAME);
        let round_index = mongodb::IndexModel::builder()
            .keys(doc! {"team_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("round_team_idx".to_owned()))
                    .build(),
            )
            .build();

        rounds
            .create_index(round_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: ROUND_COLLECTION_NAME,
                index: "team_id",
                source,
            })?;

        Ok(())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_error)) if write_error.code == 11000
    )
}

impl TeamStore for MongoTeamStore {
    fn insert_team(&self, label: String) -> BoxFuture<'static, StorageResult<TeamEntity>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let id = inner.next_id(TEAM_SEQUENCE).await?;
            let team = TeamEntity {
                id,
                label,
                version: 1,
                participants: Vec::new(),
            };

            let database = inner.database().await;
            let teams = database.collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME);
            teams
                .insert_one(MongoTeamDocument::from(team.clone()))
                .await
                .map_err(|source| {
                    if is_duplicate_key(&source) {
                        StorageError::conflict("team", id)
                    } else {
                        MongoDaoError::SaveTeam { id, source }.into()
                    }
                })?;

            Ok(team)
        })
    }

    fn find_team(&self, id: i32) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let database = inner.database().await;
            let teams = database.collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME);
            let document = teams
                .find_one(doc_id(id))
                .await
                .map_err(|source| MongoDaoError::LoadTeam { id, source })?;
            Ok(document.map(TeamEntity::from))
        })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let database = inner.database().await;
            let teams = database.collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME);
            let documents: Vec<MongoTeamDocument> = teams
                .find(doc! {})
                .sort(doc! {"_id": 1})
                .await
                .map_err(|source| MongoDaoError::ListTeams { source })?
                .try_collect()
                .await
                .map_err(|source| MongoDaoError::ListTeams { source })?;

            Ok(documents.into_iter().map(TeamEntity::from).collect())
        })
    }

    fn replace_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<TeamEntity>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let id = team.id;
            let expected_version = team.version;
            let replacement = TeamEntity {
                version: team.version + 1,
                ..team
            };

            let database = inner.database().await;
            let teams = database.collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME);
            let result = teams
                .replace_one(
                    doc! {"_id": id, "version": expected_version as i64},
                    MongoTeamDocument::from(replacement.clone()),
                )
                .await
                .map_err(|source| MongoDaoError::SaveTeam { id, source })?;

            if result.matched_count == 0 {
                // Stale version or vanished record; the service layer re-reads
                // to tell the two apart.
                return Err(StorageError::conflict("team", id));
            }

            Ok(replacement)
        })
    }

    fn remove_team(&self, id: i32) -> BoxFuture<'static, StorageResult<bool>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let database = inner.database().await;
            let teams = database.collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME);
            let result = teams
                .delete_one(doc_id(id))
                .await
                .map_err(|source| MongoDaoError::DeleteTeam { id, source })?;

            if result.deleted_count == 0 {
                return Ok(false);
            }

            let rounds = database.collection::<MongoRoundDocument>(ROUND_COLLECTION_NAME);
            rounds
                .delete_many(doc! {"team_id": id})
                .await
                .map_err(|source| MongoDaoError::DeleteTeam { id, source })?;

            Ok(true)
        })
    }

    fn append_round(
        &self,
        round: NewTeaRound,
    ) -> BoxFuture<'static, StorageResult<TeaRoundEntity>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let team_id = round.team_id;
            let id = inner.next_id(ROUND_SEQUENCE).await?;
            let document = MongoRoundDocument::new(id, round);

            let database = inner.database().await;
            let rounds = database.collection::<MongoRoundDocument>(ROUND_COLLECTION_NAME);
            rounds
                .insert_one(document.clone())
                .await
                .map_err(|source| MongoDaoError::SaveRound { team_id, source })?;

            Ok(document.into())
        })
    }

    fn rounds_for_team(
        &self,
        team_id: i32,
    ) -> BoxFuture<'static, StorageResult<Vec<TeaRoundEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let database = inner.database().await;
            let rounds = database.collection::<MongoRoundDocument>(ROUND_COLLECTION_NAME);
            let documents: Vec<MongoRoundDocument> = rounds
                .find(doc! {"team_id": team_id})
                .await
                .map_err(|source| MongoDaoError::LoadRounds { team_id, source })?
                .try_collect()
                .await
                .map_err(|source| MongoDaoError::LoadRounds { team_id, source })?;

            Ok(documents.into_iter().map(TeaRoundEntity::from).collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.ping().await?;
            Ok(())
        })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.reconnect().await?;
            Ok(())
        })
    }
}
