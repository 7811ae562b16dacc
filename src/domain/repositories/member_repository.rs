use async_trait::async_trait;

use crate::domain::dto::{
    AgeSummary, MemberSearchCondition, MemberTeamDto, Page, PageRequest, TeamAverageAge,
};
use crate::domain::errors::RepositoryResult;
use crate::domain::member::{Member, NewMember};

/// Repository trait for members
///
/// Defines the contract for persisting members and running the static and
/// dynamically-composed roster queries. Implementations handle the
/// database-specific details.
///
/// Bulk operations write directly to storage; `Member` values fetched
/// earlier are plain data and are not refreshed. Callers re-query after a
/// bulk write to observe its effect.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Insert a member and return it with its assigned id
    async fn save(&self, member: NewMember) -> RepositoryResult<Member>;

    /// Find a member by id; a miss is `Ok(None)`, not an error
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Member>>;

    /// All members, in database default order
    async fn find_all(&self) -> RepositoryResult<Vec<Member>>;

    /// All members with an exact username match, possibly empty
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Vec<Member>>;

    /// At most one member with the given username
    ///
    /// Fails with [`RepositoryError::NonUniqueResult`] when the username
    /// matches more than one row.
    ///
    /// [`RepositoryError::NonUniqueResult`]: crate::domain::errors::RepositoryError::NonUniqueResult
    async fn find_single_by_username(&self, username: &str) -> RepositoryResult<Option<Member>>;

    /// Dynamic filtered search over members left-joined with teams
    ///
    /// Builds a conjunctive predicate from the condition fields that are
    /// present. With every field absent, returns the full roster, teamless
    /// members included. Ordering is unspecified.
    async fn search(&self, condition: &MemberSearchCondition)
        -> RepositoryResult<Vec<MemberTeamDto>>;

    /// Number of members matching the condition
    async fn count(&self, condition: &MemberSearchCondition) -> RepositoryResult<u64>;

    /// Paginated search that always issues a separate count query
    async fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        page: &PageRequest,
    ) -> RepositoryResult<Page<MemberTeamDto>>;

    /// Paginated search that skips the count query when the window already
    /// shows the end of the result set
    ///
    /// Returns identical content and totals to [`search_page_simple`] for
    /// any condition and page request.
    ///
    /// [`search_page_simple`]: MemberRepository::search_page_simple
    async fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        page: &PageRequest,
    ) -> RepositoryResult<Page<MemberTeamDto>>;

    /// Count, sum, average, max, and min over all member ages
    async fn age_summary(&self) -> RepositoryResult<AgeSummary>;

    /// Average member age per team, ordered by team name
    async fn average_age_by_team(&self) -> RepositoryResult<Vec<TeamAverageAge>>;

    /// Bulk-rename every member younger than `age`; returns the number of
    /// rows changed
    async fn update_username_where_age_below(
        &self,
        username: &str,
        age: i32,
    ) -> RepositoryResult<u64>;

    /// Add `delta` to every member's age; returns the number of rows changed
    async fn add_to_all_ages(&self, delta: i32) -> RepositoryResult<u64>;

    /// Bulk-delete every member older than `age`; returns the number of rows
    /// removed
    async fn delete_where_age_above(&self, age: i32) -> RepositoryResult<u64>;
}
