//! Persisted entity types.

mod article;
mod contact;
mod contribution;
mod experience;
mod feature;
mod git_ref;
mod invalid_token;
mod profile;
mod project;
mod service;
mod user;
mod work;

pub use article::Article;
pub use contact::Contact;
pub use contribution::Contribution;
pub use experience::Experience;
pub use feature::Feature;
pub use git_ref::GitRef;
pub use invalid_token::InvalidToken;
pub use profile::Profile;
pub use project::Project;
pub use service::Service;
pub use user::User;
pub use work::Work;
