use crate::domain::{UserId, user::User};

pub mod get;
pub mod register;
pub mod search;
pub mod update;

#[derive(Clone, Debug, PartialEq)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub searchable: bool,
    pub rooms_count: u32,
    pub reviews_count: u32,
    /// Mean minutes per timed game, rounded to one decimal.
    pub average_time: f64,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            average_time: user.usage.rounded_average_time(),
            rooms_count: user.usage.rooms_count,
            reviews_count: user.usage.reviews_count,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            searchable: user.searchable,
        }
    }
}
