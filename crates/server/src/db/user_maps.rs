//! `PostgreSQL`-backed user map store.
//!
//! Every operation is one SQL statement against `mapa.user_map`, which makes
//! it atomic for the owner's row without an explicit transaction. Queries are
//! checked at runtime (`query_as`) rather than with the compile-time macros so
//! the crate builds without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use mapa_core::{Email, MarkerId, UserMapId};

use super::{RepositoryError, UserMapStore};
use crate::models::{Marker, UserMap, Visit};

/// Row shape shared by every `RETURNING` clause below.
#[derive(sqlx::FromRow)]
struct UserMapRow {
    id: Uuid,
    email: String,
    marcadores: Json<Vec<Marker>>,
    visitas: Json<Vec<Visit>>,
    creado_en: DateTime<Utc>,
}

impl TryFrom<UserMapRow> for UserMap {
    type Error = RepositoryError;

    fn try_from(row: UserMapRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserMapId::from_uuid(row.id),
            email,
            markers: row.marcadores.0,
            visits: row.visitas.0,
            created_at: row.creado_en,
        })
    }
}

/// Repository for user map documents.
#[derive(Clone)]
pub struct PgUserMapStore {
    pool: PgPool,
}

impl PgUserMapStore {
    /// Create a new user map repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserMapStore for PgUserMapStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserMap>, RepositoryError> {
        let row = sqlx::query_as::<_, UserMapRow>(
            r"
            SELECT id, email, marcadores, visitas, creado_en
            FROM mapa.user_map
            WHERE email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserMap::try_from).transpose()
    }

    async fn push_marker(
        &self,
        email: &Email,
        marker: Marker,
    ) -> Result<UserMap, RepositoryError> {
        let marker_id = marker.id;
        let row = sqlx::query_as::<_, UserMapRow>(
            r"
            INSERT INTO mapa.user_map (id, email, marcadores)
            VALUES ($1, $2, jsonb_build_array($3::jsonb))
            ON CONFLICT (email) DO UPDATE
            SET marcadores = mapa.user_map.marcadores || jsonb_build_array($3::jsonb)
            RETURNING id, email, marcadores, visitas, creado_en
            ",
        )
        .bind(UserMapId::generate())
        .bind(email)
        .bind(Json(&marker))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "user map id collision while creating map for {email}"
                ));
            }
            RepositoryError::Database(e)
        })?;

        tracing::debug!(%email, %marker_id, "marker appended");
        UserMap::try_from(row)
    }

    async fn push_visit(
        &self,
        email: &Email,
        visit: Visit,
    ) -> Result<Option<UserMap>, RepositoryError> {
        let row = sqlx::query_as::<_, UserMapRow>(
            r"
            UPDATE mapa.user_map
            SET visitas = visitas || jsonb_build_array($2::jsonb)
            WHERE email = $1
            RETURNING id, email, marcadores, visitas, creado_en
            ",
        )
        .bind(email)
        .bind(Json(&visit))
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserMap::try_from).transpose()
    }

    async fn pull_marker(
        &self,
        email: &Email,
        marker_id: MarkerId,
    ) -> Result<Option<UserMap>, RepositoryError> {
        // The containment check in WHERE makes a missing marker look exactly
        // like a missing owner: no row is updated and nothing is returned.
        let row = sqlx::query_as::<_, UserMapRow>(
            r"
            UPDATE mapa.user_map
            SET marcadores = COALESCE(
                (
                    SELECT jsonb_agg(elem ORDER BY pos)
                    FROM jsonb_array_elements(marcadores) WITH ORDINALITY AS t(elem, pos)
                    WHERE elem->>'_id' <> $2
                ),
                '[]'::jsonb
            )
            WHERE email = $1
              AND marcadores @> jsonb_build_array(jsonb_build_object('_id', $2::text))
            RETURNING id, email, marcadores, visitas, creado_en
            ",
        )
        .bind(email)
        .bind(marker_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserMap::try_from).transpose()
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
