//! Resolves the user that owns each request from an encrypted auth cookie.

mod cookie;
mod middleware;
mod token;
mod user;

pub use cookie::{DEFAULT_COOKIE_DURATION, set_auth_cookie};
#[cfg(test)]
pub use cookie::COOKIE_TOKEN;
pub use middleware::auth_guard;
pub use user::{
    NewUser, User, UserID, create_user, create_user_table, get_user_profile_endpoint,
};
