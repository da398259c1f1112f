use validator::Validate;

use crate::domain::{UserId, usage::UserUsage};

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub searchable: bool,
    pub usage: UserUsage,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub searchable: bool,
}

#[derive(Clone, Debug, Validate)]
pub struct UserPayload {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 2, max = 255))]
    pub first_name: String,
    #[validate(length(min = 2, max = 255))]
    pub last_name: String,
    pub searchable: bool,
}

/// Name filter over users who opted into search. Each given part must occur
/// in the matching name, ignoring case.
#[derive(Clone, Debug, Default)]
pub struct UserSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserSearch {
    pub fn matches(&self, user: &User) -> bool {
        let contains = |name: &str, part: &Option<String>| {
            part.as_ref()
                .is_none_or(|part| name.to_lowercase().contains(&part.to_lowercase()))
        };
        user.searchable
            && contains(&user.first_name, &self.first_name)
            && contains(&user.last_name, &self.last_name)
    }
}

/// Changes a user may make to their own profile. Usage counters are never
/// part of it.
#[derive(Clone, Debug, Default, Validate)]
pub struct ProfileUpdate {
    #[validate(length(min = 2, max = 255))]
    pub first_name: Option<String>,
    #[validate(length(min = 2, max = 255))]
    pub last_name: Option<String>,
    pub searchable: Option<bool>,
}

impl ProfileUpdate {
    pub fn apply(self, user: User) -> User {
        User {
            first_name: self.first_name.unwrap_or(user.first_name),
            last_name: self.last_name.unwrap_or(user.last_name),
            searchable: self.searchable.unwrap_or(user.searchable),
            ..user
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first_name: &str, last_name: &str, searchable: bool) -> User {
        User {
            id: UserId(1),
            email: "a@b.co".to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            searchable,
            usage: UserUsage::default(),
        }
    }

    #[test]
    fn test_search_matches_name_parts_of_searchable_users() {
        let search = UserSearch {
            first_name: Some("ACE".to_string()),
            last_name: None,
        };
        assert!(search.matches(&user("Grace", "Hopper", true)));
        assert!(!search.matches(&user("Grace", "Hopper", false)));
        assert!(!search.matches(&user("Ada", "Lovelace", true)));
        assert!(UserSearch::default().matches(&user("Ada", "Lovelace", true)));
    }

    #[test]
    fn test_profile_update_keeps_unset_fields() {
        let mut stored = user("Grace", "Hopper", true);
        stored.usage.rooms_count = 4;
        let updated = ProfileUpdate {
            last_name: Some("Murray".to_string()),
            searchable: Some(false),
            ..ProfileUpdate::default()
        }
        .apply(stored);
        assert_eq!(updated.first_name, "Grace");
        assert_eq!(updated.last_name, "Murray");
        assert!(!updated.searchable);
        assert_eq!(updated.usage.rooms_count, 4);
    }
}
