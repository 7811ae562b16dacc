/// A team that members can belong to
///
/// Team names are not required to be unique. The member side of the
/// association is authoritative: members reference their team by foreign
/// key, and a team's roster is derived by querying members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: i64,
    pub name: String,
}

/// A team that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
}

impl NewTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
