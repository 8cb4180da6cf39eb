use serde::Serialize;

use crate::db::models::User;
use crate::recipes::views::RecipeShort;

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

impl UserView {
    pub fn new(user: User, is_subscribed: bool) -> Self {
        Self {
            email: user.email,
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }
}

/// Registration response: the user shape without the password. The
/// requester is anonymous, so `is_subscribed` is always `false`.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RegisteredUser(pub UserView);

impl From<User> for RegisteredUser {
    fn from(user: User) -> Self {
        Self(UserView::new(user, false))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionView {
    #[serde(flatten)]
    pub author: UserView,
    pub recipes: Vec<RecipeShort>,
    pub recipes_count: i64,
}
