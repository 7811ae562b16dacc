/// A roster member
///
/// Members carry a nullable display name and an optional reference to the
/// team they belong to. The association is a plain foreign key at the
/// storage layer; a teamless member is represented by `team_id = None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: i64,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
}

/// A member that has not been persisted yet
///
/// The repository assigns the id on save and returns the persisted
/// [`Member`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMember {
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
}

impl NewMember {
    /// Creates a teamless member
    pub fn new(username: impl Into<String>, age: i32) -> Self {
        Self {
            username: Some(username.into()),
            age,
            team_id: None,
        }
    }

    /// Creates a member that belongs to an existing team
    pub fn with_team(username: impl Into<String>, age: i32, team_id: i64) -> Self {
        Self {
            username: Some(username.into()),
            age,
            team_id: Some(team_id),
        }
    }

    /// Creates a member without a display name
    pub fn anonymous(age: i32) -> Self {
        Self {
            username: None,
            age,
            team_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_member_is_teamless() {
        let member = NewMember::new("Member1", 10);

        assert_eq!(member.username.as_deref(), Some("Member1"));
        assert_eq!(member.age, 10);
        assert_eq!(member.team_id, None);
    }

    #[test]
    fn with_team_keeps_team_reference() {
        let member = NewMember::with_team("Member2", 20, 7);

        assert_eq!(member.team_id, Some(7));
    }

    #[test]
    fn anonymous_member_has_no_username() {
        let member = NewMember::anonymous(100);

        assert_eq!(member.username, None);
        assert_eq!(member.age, 100);
    }
}
