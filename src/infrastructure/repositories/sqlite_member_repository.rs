use async_trait::async_trait;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use crate::domain::dto::{
    AgeSummary, MemberSearchCondition, MemberTeamDto, Page, PageRequest, Sort, SortDirection,
    SortField, TeamAverageAge,
};
use crate::domain::errors::{RepositoryError, RepositoryResult};
use crate::domain::member::{Member, NewMember};
use crate::domain::repositories::MemberRepository;

/// SQLite implementation of MemberRepository
///
/// Static lookups run as plain prepared statements; the search queries are
/// assembled with `QueryBuilder` so that only the condition fields that are
/// present contribute a WHERE clause.
pub struct SqliteMemberRepository {
    pool: SqlitePool,
}

impl SqliteMemberRepository {
    /// Creates a new SqliteMemberRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for SQLite
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_search_window(
        &self,
        condition: &MemberSearchCondition,
        page: &PageRequest,
    ) -> RepositoryResult<Vec<MemberTeamDto>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SEARCH_SELECT);
        apply_conditions(&mut builder, condition);
        if let Some(sort) = &page.sort {
            builder.push(order_by_sql(sort));
        }
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(page.size));
        builder.push(" OFFSET ");
        builder.push_bind(page.offset());

        let rows = builder
            .build_query_as::<MemberTeamRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, FromRow)]
struct MemberRow {
    id: i64,
    username: Option<String>,
    age: i32,
    team_id: Option<i64>,
}

impl From<MemberRow> for Member {
    fn from(row: MemberRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            age: row.age,
            team_id: row.team_id,
        }
    }
}

#[derive(Debug, FromRow)]
struct MemberTeamRow {
    member_id: i64,
    username: Option<String>,
    age: i32,
    team_id: Option<i64>,
    team_name: Option<String>,
}

impl From<MemberTeamRow> for MemberTeamDto {
    fn from(row: MemberTeamRow) -> Self {
        Self {
            member_id: row.member_id,
            username: row.username,
            age: row.age,
            team_id: row.team_id,
            team_name: row.team_name,
        }
    }
}

#[derive(Debug, FromRow)]
struct AgeSummaryRow {
    member_count: i64,
    age_sum: Option<i64>,
    age_avg: Option<f64>,
    age_max: Option<i32>,
    age_min: Option<i32>,
}

impl From<AgeSummaryRow> for AgeSummary {
    fn from(row: AgeSummaryRow) -> Self {
        Self {
            count: row.member_count as u64,
            sum: row.age_sum,
            average: row.age_avg,
            max: row.age_max,
            min: row.age_min,
        }
    }
}

#[derive(Debug, FromRow)]
struct TeamAverageAgeRow {
    team_name: String,
    average_age: f64,
}

impl From<TeamAverageAgeRow> for TeamAverageAge {
    fn from(row: TeamAverageAgeRow) -> Self {
        Self {
            team_name: row.team_name,
            average_age: row.average_age,
        }
    }
}

const SEARCH_SELECT: &str = "SELECT m.id AS member_id, m.username AS username, m.age AS age, \
     t.id AS team_id, t.name AS team_name \
     FROM members m LEFT JOIN teams t ON m.team_id = t.id";

const COUNT_SELECT: &str =
    "SELECT COUNT(m.id) FROM members m LEFT JOIN teams t ON m.team_id = t.id";

/// Appends one WHERE clause per present condition field, joined with AND
fn apply_conditions<'a>(
    builder: &mut QueryBuilder<'a, Sqlite>,
    condition: &'a MemberSearchCondition,
) {
    let mut has_where = false;

    if let Some(username) = condition.username() {
        push_connector(builder, &mut has_where);
        builder.push("m.username = ");
        builder.push_bind(username);
    }

    if let Some(team_name) = condition.team_name() {
        push_connector(builder, &mut has_where);
        builder.push("t.name = ");
        builder.push_bind(team_name);
    }

    if let Some(age_goe) = condition.age_goe {
        push_connector(builder, &mut has_where);
        builder.push("m.age >= ");
        builder.push_bind(age_goe);
    }

    if let Some(age_loe) = condition.age_loe {
        push_connector(builder, &mut has_where);
        builder.push("m.age <= ");
        builder.push_bind(age_loe);
    }
}

fn push_connector(builder: &mut QueryBuilder<'_, Sqlite>, has_where: &mut bool) {
    if *has_where {
        builder.push(" AND ");
    } else {
        builder.push(" WHERE ");
        *has_where = true;
    }
}

/// ORDER BY clauses come from this fixed set, never from user input
fn order_by_sql(sort: &Sort) -> &'static str {
    match (sort.field, sort.direction) {
        (SortField::Id, SortDirection::Asc) => " ORDER BY m.id ASC",
        (SortField::Id, SortDirection::Desc) => " ORDER BY m.id DESC",
        // usernames are nullable; keep null rows at the end either way
        (SortField::Username, SortDirection::Asc) => " ORDER BY m.username ASC NULLS LAST",
        (SortField::Username, SortDirection::Desc) => " ORDER BY m.username DESC NULLS LAST",
        (SortField::Age, SortDirection::Asc) => " ORDER BY m.age ASC",
        (SortField::Age, SortDirection::Desc) => " ORDER BY m.age DESC",
    }
}

/// Total derivable without a count query when the window shows the end of
/// the result set: a not-full first page, or a not-full non-empty later page
fn derived_total(page: &PageRequest, content_len: usize) -> Option<u64> {
    if content_len >= page.size as usize {
        return None;
    }
    if page.offset() == 0 {
        return Some(content_len as u64);
    }
    if content_len > 0 {
        return Some(page.offset() as u64 + content_len as u64);
    }
    None
}

#[async_trait]
impl MemberRepository for SqliteMemberRepository {
    async fn save(&self, member: NewMember) -> RepositoryResult<Member> {
        let row = sqlx::query_as::<_, MemberRow>(
            "INSERT INTO members (username, age, team_id) VALUES (?, ?, ?) \
             RETURNING id, username, age, team_id",
        )
        .bind(&member.username)
        .bind(member.age)
        .bind(member.team_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Member>> {
        let row = sqlx::query_as::<_, MemberRow>(
            "SELECT id, username, age, team_id FROM members WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>("SELECT id, username, age, team_id FROM members")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Vec<Member>> {
        let rows = sqlx::query_as::<_, MemberRow>(
            "SELECT id, username, age, team_id FROM members WHERE username = ?",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_single_by_username(&self, username: &str) -> RepositoryResult<Option<Member>> {
        // LIMIT 2 is enough to detect a non-unique match without scanning further
        let mut rows = sqlx::query_as::<_, MemberRow>(
            "SELECT id, username, age, team_id FROM members WHERE username = ? LIMIT 2",
        )
        .bind(username)
        .fetch_all(&self.pool)
        .await?;

        if rows.len() > 1 {
            return Err(RepositoryError::NonUniqueResult);
        }

        Ok(rows.pop().map(Into::into))
    }

    async fn search(
        &self,
        condition: &MemberSearchCondition,
    ) -> RepositoryResult<Vec<MemberTeamDto>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(SEARCH_SELECT);
        apply_conditions(&mut builder, condition);

        let rows = builder
            .build_query_as::<MemberTeamRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, condition: &MemberSearchCondition) -> RepositoryResult<u64> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(COUNT_SELECT);
        apply_conditions(&mut builder, condition);

        let total: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(total as u64)
    }

    async fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        page: &PageRequest,
    ) -> RepositoryResult<Page<MemberTeamDto>> {
        let content = self.fetch_search_window(condition, page).await?;
        let total = self.count(condition).await?;

        Ok(Page::new(content, page, total))
    }

    async fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        page: &PageRequest,
    ) -> RepositoryResult<Page<MemberTeamDto>> {
        let content = self.fetch_search_window(condition, page).await?;
        let total = match derived_total(page, content.len()) {
            Some(total) => total,
            None => self.count(condition).await?,
        };

        Ok(Page::new(content, page, total))
    }

    async fn age_summary(&self) -> RepositoryResult<AgeSummary> {
        let row = sqlx::query_as::<_, AgeSummaryRow>(
            "SELECT COUNT(id) AS member_count, SUM(age) AS age_sum, AVG(age) AS age_avg, \
             MAX(age) AS age_max, MIN(age) AS age_min FROM members",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn average_age_by_team(&self) -> RepositoryResult<Vec<TeamAverageAge>> {
        let rows = sqlx::query_as::<_, TeamAverageAgeRow>(
            "SELECT t.name AS team_name, AVG(m.age) AS average_age \
             FROM members m JOIN teams t ON m.team_id = t.id \
             GROUP BY t.name ORDER BY t.name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_username_where_age_below(
        &self,
        username: &str,
        age: i32,
    ) -> RepositoryResult<u64> {
        let result = sqlx::query("UPDATE members SET username = ? WHERE age < ?")
            .bind(username)
            .bind(age)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn add_to_all_ages(&self, delta: i32) -> RepositoryResult<u64> {
        let result = sqlx::query("UPDATE members SET age = age + ?")
            .bind(delta)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_where_age_above(&self, age: i32) -> RepositoryResult<u64> {
        let result = sqlx::query("DELETE FROM members WHERE age > ?")
            .bind(age)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_total_on_not_full_first_page() {
        let page = PageRequest::new(0, 10, None);

        assert_eq!(derived_total(&page, 4), Some(4));
    }

    #[test]
    fn derived_total_on_partial_last_page() {
        let page = PageRequest::new(1, 3, None);

        assert_eq!(derived_total(&page, 1), Some(4));
    }

    #[test]
    fn derived_total_requires_count_for_full_page() {
        let page = PageRequest::new(0, 3, None);

        assert_eq!(derived_total(&page, 3), None);
    }

    #[test]
    fn derived_total_requires_count_for_empty_later_page() {
        // the window is past the end; offset alone would overestimate
        let page = PageRequest::new(5, 3, None);

        assert_eq!(derived_total(&page, 0), None);
    }
}
