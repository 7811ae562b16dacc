//! Demo roster loader, enabled with the SEED_DEMO_DATA environment variable

use sqlx::SqlitePool;

use crate::domain::dto::MemberSearchCondition;
use crate::domain::errors::RepositoryResult;
use crate::domain::member::NewMember;
use crate::domain::repositories::{MemberRepository, TeamRepository};
use crate::domain::team::NewTeam;
use crate::infrastructure::repositories::{SqliteMemberRepository, SqliteTeamRepository};

/// Seeds two teams and one hundred members, alternating team assignment
///
/// A no-op when members already exist, so restarting against a file-backed
/// database does not duplicate the roster.
pub async fn seed_demo_data(pool: &SqlitePool) -> RepositoryResult<()> {
    let member_repo = SqliteMemberRepository::new(pool.clone());
    let team_repo = SqliteTeamRepository::new(pool.clone());

    if member_repo.count(&MemberSearchCondition::default()).await? > 0 {
        tracing::info!("members already present, skipping demo seed");
        return Ok(());
    }

    let team_a = team_repo.save(NewTeam::new("TeamA")).await?;
    let team_b = team_repo.save(NewTeam::new("TeamB")).await?;

    for i in 0..100 {
        let team = if i % 2 == 0 { &team_a } else { &team_b };
        member_repo
            .save(NewMember::with_team(format!("Member{i}"), i, team.id))
            .await?;
    }

    tracing::info!("seeded demo roster with 2 teams and 100 members");
    Ok(())
}
