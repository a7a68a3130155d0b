pub mod auth;
pub mod contributions;
pub mod git_refs;
pub mod health;
pub mod profiles;
pub mod projects;
pub mod uploads;
pub mod users;
pub mod works;
