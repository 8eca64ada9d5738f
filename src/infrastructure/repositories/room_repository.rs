//! Chat Room Repository Implementation
//!
//! PostgreSQL implementation of the RoomRepository trait. Rosters live in
//! `chat_room_participants` and `chat_room_moderators`; both are folded back
//! into the room entity with array subqueries.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::domain::{ChatRoom, RoomRepository, RosterChange};
use crate::infrastructure::database::{PgUnitOfWork, UnitOfWork};
use crate::shared::error::AppError;

macro_rules! select_room {
    ($filter:literal) => {
        concat!(
            r#"
            SELECT r.id, r.name, r.description, r.is_public, r.admin_id,
                   r.created_at, r.updated_at,
                   ARRAY(SELECT p.user_id FROM chat_room_participants p
                         WHERE p.chat_room_id = r.id ORDER BY p.user_id) AS participant_ids,
                   ARRAY(SELECT m.user_id FROM chat_room_moderators m
                         WHERE m.chat_room_id = r.id ORDER BY m.user_id) AS moderator_ids
            FROM chat_rooms r
            "#,
            $filter
        )
    };
}

/// Internal row type for room queries.
#[derive(Debug, sqlx::FromRow)]
struct RoomRow {
    id: i64,
    name: String,
    description: Option<String>,
    is_public: bool,
    admin_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    participant_ids: Vec<i64>,
    moderator_ids: Vec<i64>,
}

impl RoomRow {
    fn into_room(self) -> ChatRoom {
        ChatRoom {
            id: self.id,
            name: self.name,
            description: self.description,
            is_public: self.is_public,
            admin_id: self.admin_id,
            participant_ids: self.participant_ids.into_iter().collect::<BTreeSet<_>>(),
            moderator_ids: self.moderator_ids.into_iter().collect::<BTreeSet<_>>(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// PostgreSQL chat room repository implementation.
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
    uow: PgUnitOfWork,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            uow: PgUnitOfWork::from_pool(pool.clone()),
            pool,
        }
    }

    async fn fetch(conn: &mut PgConnection, id: i64) -> Result<Option<ChatRoom>, AppError> {
        let row = sqlx::query_as::<_, RoomRow>(select_room!("WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(row.map(|r| r.into_room()))
    }
}

fn map_roster_write_error(e: sqlx::Error, user_id: i64) -> AppError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            AppError::NotFound(format!("User with id {} not found", user_id))
        }
        _ => AppError::Database(e),
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<ChatRoom>, AppError> {
        let row = sqlx::query_as::<_, RoomRow>(select_room!("WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_room()))
    }

    /// Rooms the user participates in, most recently updated first.
    async fn find_by_participant(&self, user_id: i64) -> Result<Vec<ChatRoom>, AppError> {
        let rows = sqlx::query_as::<_, RoomRow>(select_room!(
            r#"
            WHERE EXISTS (
                SELECT 1 FROM chat_room_participants p
                WHERE p.chat_room_id = r.id AND p.user_id = $1
            )
            ORDER BY r.updated_at DESC, r.id DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_room()).collect())
    }

    async fn name_exists(&self, name: &str) -> Result<bool, AppError> {
        let result = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM chat_rooms WHERE name = $1)",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// Insert the room and its initial roster in one transaction.
    async fn create(&self, room: &ChatRoom) -> Result<ChatRoom, AppError> {
        let mut ctx = self.uow.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO chat_rooms (id, name, description, is_public, admin_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(&room.description)
        .bind(room.is_public)
        .bind(room.admin_id)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&mut **ctx.as_mut())
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("A room named '{}' already exists", room.name))
            }
            _ => AppError::Database(e),
        })?;

        for user_id in &room.participant_ids {
            sqlx::query(
                "INSERT INTO chat_room_participants (chat_room_id, user_id) VALUES ($1, $2)",
            )
            .bind(room.id)
            .bind(*user_id)
            .execute(&mut **ctx.as_mut())
            .await
            .map_err(|e| map_roster_write_error(e, *user_id))?;
        }

        for user_id in &room.moderator_ids {
            sqlx::query(
                "INSERT INTO chat_room_moderators (chat_room_id, user_id) VALUES ($1, $2)",
            )
            .bind(room.id)
            .bind(*user_id)
            .execute(&mut **ctx.as_mut())
            .await
            .map_err(|e| map_roster_write_error(e, *user_id))?;
        }

        ctx.commit().await?;

        Ok(room.clone())
    }

    async fn update_details(&self, room: &ChatRoom) -> Result<ChatRoom, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE chat_rooms
            SET name = $2, description = $3, is_public = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(&room.description)
        .bind(room.is_public)
        .bind(room.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(format!("A room named '{}' already exists", room.name))
            }
            _ => AppError::Database(e),
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Room with id {} not found",
                room.id
            )));
        }

        self.find_by_id(room.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room with id {} not found", room.id)))
    }

    /// Apply a roster change while holding the room's row lock.
    async fn apply_roster_change(
        &self,
        room_id: i64,
        change: RosterChange,
        now: DateTime<Utc>,
    ) -> Result<ChatRoom, AppError> {
        let mut ctx = self.uow.begin().await?;

        let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM chat_rooms WHERE id = $1 FOR UPDATE")
            .bind(room_id)
            .fetch_optional(&mut **ctx.as_mut())
            .await?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("Room with id {} not found", room_id)));
        }

        let mut room = Self::fetch(&mut **ctx.as_mut(), room_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Room with id {} not found", room_id)))?;

        if !room.apply(change)? {
            // Idempotent no-op; dropping the context releases the lock.
            return Ok(room);
        }

        let user_id = change.target();
        let statement = match change {
            RosterChange::AddParticipant(_) => {
                "INSERT INTO chat_room_participants (chat_room_id, user_id) VALUES ($1, $2)"
            }
            RosterChange::RemoveParticipant(_) => {
                "DELETE FROM chat_room_participants WHERE chat_room_id = $1 AND user_id = $2"
            }
            RosterChange::PromoteModerator(_) => {
                "INSERT INTO chat_room_moderators (chat_room_id, user_id) VALUES ($1, $2)"
            }
            RosterChange::DemoteModerator(_) => {
                "DELETE FROM chat_room_moderators WHERE chat_room_id = $1 AND user_id = $2"
            }
        };

        sqlx::query(statement)
            .bind(room_id)
            .bind(user_id)
            .execute(&mut **ctx.as_mut())
            .await
            .map_err(|e| map_roster_write_error(e, user_id))?;

        sqlx::query("UPDATE chat_rooms SET updated_at = $2 WHERE id = $1")
            .bind(room_id)
            .bind(now)
            .execute(&mut **ctx.as_mut())
            .await?;

        ctx.commit().await?;

        room.updated_at = now;
        Ok(room)
    }
}
