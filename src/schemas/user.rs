use serde::{Deserialize, Serialize};
use validator::Validate;

/// `POST /users` (admin only); may create other admins.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    #[validate(length(min = 1, max = 25))]
    pub username: String,

    #[validate(length(min = 5, max = 20))]
    pub password: String,

    #[validate(length(min = 1, max = 30))]
    pub first_name: String,

    #[validate(length(min = 1, max = 30))]
    pub last_name: String,

    #[validate(email, length(min = 6, max = 60))]
    pub email: String,

    #[serde(default)]
    pub is_admin: bool,
}

/// `POST /auth/register`; same fields as [`NewUser`] without the admin flag.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserRegister {
    #[validate(length(min = 1, max = 25))]
    pub username: String,

    #[validate(length(min = 5, max = 20))]
    pub password: String,

    #[validate(length(min = 1, max = 30))]
    pub first_name: String,

    #[validate(length(min = 1, max = 30))]
    pub last_name: String,

    #[validate(email, length(min = 6, max = 60))]
    pub email: String,
}

impl From<UserRegister> for NewUser {
    fn from(user: UserRegister) -> Self {
        Self {
            username: user.username,
            password: user.password,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_admin: false,
        }
    }
}

/// `POST /auth/token`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UserAuth {
    #[validate(length(min = 1, max = 25))]
    pub username: String,

    #[validate(length(min = 1, max = 20))]
    pub password: String,
}

/// `PATCH /users/:username`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    #[validate(length(min = 5, max = 20))]
    pub password: Option<String>,

    #[validate(length(min = 1, max = 30))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 30))]
    pub last_name: Option<String>,

    #[validate(email, length(min = 6, max = 60))]
    pub email: Option<String>,
}
