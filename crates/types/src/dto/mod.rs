//! Request and response DTOs.

pub mod requests;
pub mod views;

pub use requests::{
    ChangePasswordRequest, CreateArticle, CreateContact, CreateContribution, CreateExperience,
    CreateFeature, CreateGitRef, CreateProject, CreateService, CreateWork, ForgotPasswordRequest,
    LoginRequest, RegisterRequest, ResetPasswordRequest,
};
pub use views::{
    ArticleView, ContactView, ContributionView, ExperienceView, FeatureView, GitRefView,
    ProfileView, ProjectView, ServiceView, UserView, WorkView,
};
