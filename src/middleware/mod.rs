pub mod auth;
pub mod response;

pub use auth::{
    authenticate, ensure_admin, ensure_correct_user_or_admin, ensure_logged_in, require_admin,
    require_correct_user_or_admin, require_login,
};
pub use response::{ApiResponse, ApiResult};
