use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::api::errors::ApiError;
use crate::domain::dto::{MemberSearchCondition, MemberTeamDto, Page, PageRequest, Sort};
use crate::domain::repositories::MemberRepository;
use crate::infrastructure::repositories::SqliteMemberRepository;

/// Pagination parameters for the v2 search endpoint
///
/// `sort` is a `field,direction` pair over a whitelist; size 0 falls back
/// to the repository default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageParams {
    pub page: u32,
    pub size: u32,
    pub sort: Option<String>,
}

impl PageParams {
    fn into_page_request(self) -> Result<PageRequest, ApiError> {
        let sort = match self.sort.as_deref() {
            Some(raw) => Some(Sort::parse(raw).map_err(ApiError::bad_request)?),
            None => None,
        };

        Ok(PageRequest::new(self.page, self.size, sort))
    }
}

/// Unpaged member search with optional filters
///
/// GET /v1/members?username=&teamName=&ageGoe=&ageLoe=
pub async fn search_members_v1(
    State(pool): State<SqlitePool>,
    Query(condition): Query<MemberSearchCondition>,
) -> Result<Json<Vec<MemberTeamDto>>, ApiError> {
    let member_repo = SqliteMemberRepository::new(pool);
    let members = member_repo.search(&condition).await?;

    Ok(Json(members))
}

/// Paginated member search
///
/// GET /v2/members?username=&teamName=&ageGoe=&ageLoe=&page=&size=&sort=
pub async fn search_members_v2(
    State(pool): State<SqlitePool>,
    Query(condition): Query<MemberSearchCondition>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<MemberTeamDto>>, ApiError> {
    let page_request = params.into_page_request()?;

    let member_repo = SqliteMemberRepository::new(pool);
    let page = member_repo
        .search_page_complex(&condition, &page_request)
        .await?;

    Ok(Json(page))
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
