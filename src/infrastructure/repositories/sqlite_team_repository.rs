use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use crate::domain::errors::RepositoryResult;
use crate::domain::repositories::TeamRepository;
use crate::domain::team::{NewTeam, Team};

/// SQLite implementation of TeamRepository
pub struct SqliteTeamRepository {
    pool: SqlitePool,
}

impl SqliteTeamRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TeamRow {
    id: i64,
    name: String,
}

impl From<TeamRow> for Team {
    fn from(row: TeamRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

#[async_trait]
impl TeamRepository for SqliteTeamRepository {
    async fn save(&self, team: NewTeam) -> RepositoryResult<Team> {
        let row = sqlx::query_as::<_, TeamRow>(
            "INSERT INTO teams (name) VALUES (?) RETURNING id, name",
        )
        .bind(&team.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>("SELECT id, name FROM teams WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>("SELECT id, name FROM teams")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
