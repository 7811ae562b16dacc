use async_trait::async_trait;

use crate::domain::errors::RepositoryResult;
use crate::domain::team::{NewTeam, Team};

/// Repository trait for teams
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Insert a team and return it with its assigned id
    async fn save(&self, team: NewTeam) -> RepositoryResult<Team>;

    /// Find a team by id; a miss is `Ok(None)`, not an error
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Team>>;

    /// All teams, in database default order
    async fn find_all(&self) -> RepositoryResult<Vec<Team>>;
}
