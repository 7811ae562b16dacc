use serde::{Deserialize, Serialize};

/// Optional filters for member search
///
/// Each field is independent; absent fields impose no constraint. String
/// fields that are empty or whitespace-only behave as absent, matching how
/// the search endpoints receive them from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberSearchCondition {
    pub username: Option<String>,
    pub team_name: Option<String>,
    pub age_goe: Option<i32>,
    pub age_loe: Option<i32>,
}

impl MemberSearchCondition {
    /// Username filter, `None` when unset or blank
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Team name filter, `None` when unset or blank
    pub fn team_name(&self) -> Option<&str> {
        self.team_name.as_deref().filter(|s| !s.trim().is_empty())
    }
}

/// Flat projection of a member joined with its team
///
/// Team fields are `None` for teamless members; the search query uses a
/// left join so those members still appear when no team filter is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberTeamDto {
    pub member_id: i64,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
}

/// Aggregate statistics over all member ages
///
/// `sum`, `average`, `max`, and `min` are `None` when the table is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeSummary {
    pub count: u64,
    pub sum: Option<i64>,
    pub average: Option<f64>,
    pub max: Option<i32>,
    pub min: Option<i32>,
}

/// Average member age per team, from an inner join grouped by team name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAverageAge {
    pub team_name: String,
    pub average_age: f64,
}

/// Fields the paginated search may sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Username,
    Age,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A whitelisted sort specification, parsed from `field,direction`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    /// Parses a `field,direction` pair, e.g. `username,asc`
    ///
    /// The direction defaults to ascending when omitted. Unknown fields and
    /// directions are rejected so the value can be spliced into ORDER BY
    /// from a fixed set of clauses.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut parts = raw.splitn(2, ',');

        let field = match parts.next().unwrap_or("").trim() {
            "id" => SortField::Id,
            "username" => SortField::Username,
            "age" => SortField::Age,
            other => return Err(format!("unknown sort field: {other}")),
        };

        let direction = match parts.next().map(str::trim) {
            None | Some("") | Some("asc") | Some("ASC") => SortDirection::Asc,
            Some("desc") | Some("DESC") => SortDirection::Desc,
            Some(other) => return Err(format!("unknown sort direction: {other}")),
        };

        Ok(Self { field, direction })
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Zero-based page window with an optional sort
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    /// Creates a page request, normalizing the size
    ///
    /// Size 0 falls back to [`DEFAULT_PAGE_SIZE`]; oversized requests are
    /// capped at [`MAX_PAGE_SIZE`].
    pub fn new(page: u32, size: u32, sort: Option<Sort>) -> Self {
        let size = if size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            size.min(MAX_PAGE_SIZE)
        };
        Self { page, size, sort }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE, None)
    }
}

/// Offset-pagination envelope for query results
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", bound = "T: Serialize")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    /// Wraps one window of content with pagination metadata
    ///
    /// `total_elements` must reflect the full filtered set regardless of the
    /// requested window.
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let total_pages = if total_elements == 0 {
            0
        } else {
            ((total_elements - 1) / u64::from(request.size) + 1) as u32
        };

        Self {
            content,
            total_elements,
            total_pages,
            number: request.page,
            size: request.size,
            first: request.page == 0,
            last: request.page + 1 >= total_pages,
        }
    }
}
