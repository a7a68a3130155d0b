//! Route table.
//!
//! Built in two layers: a public router for reads and the login surface,
//! and a protected router for every write, guarded by the session
//! middleware. Reads are public because a portfolio is public content.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
};
use folio_const::limits::MAX_UPLOAD_BYTES;
use folio_types::{
    dto::requests::{
        CreateArticle, CreateContact, CreateContribution, CreateExperience, CreateFeature,
        CreateGitRef, CreateProject, CreateService, CreateWork,
    },
    entities::{
        Article, Contact, Contribution, Experience, Feature, GitRef, Profile, Project, Service,
        User, Work,
    },
};

use crate::{
    AppState,
    handlers::{auth, contributions, git_refs, health, profiles, projects, uploads, users, works},
    middleware::{logging_middleware, require_auth},
    resource,
};

/// Build the complete application router
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/healthz", get(health::healthz))
        // Login surface
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/forgot-password", post(auth::forgot_password))
        .route("/api/v1/auth/reset-password", post(auth::reset_password))
        .route("/api/v1/auth/google-login", get(auth::google_login))
        .route("/api/v1/auth/login-callback", get(auth::login_callback))
        // Uploaded files
        .route("/api/v1/uploads/{file}", get(uploads::serve_upload))
        // Public reads
        // Email lookup lives outside v1 so it cannot shadow the {id} route
        .route("/api/users/{email}", get(users::user_by_email))
        .route("/api/v1/users/{id}", get(resource::get_one::<User>))
        .route("/api/v1/users/{id}/profile", get(profiles::user_profile))
        .route("/api/v1/users/{id}/projects", get(resource::list_children::<User, Project>))
        .route("/api/v1/users/{id}/works", get(resource::list_children::<User, Work>))
        .route("/api/v1/users/{id}/articles", get(resource::list_children::<User, Article>))
        .route(
            "/api/v1/users/{id}/contributions",
            get(resource::list_children::<User, Contribution>),
        )
        .route("/api/v1/profiles/{id}", get(resource::get_one::<Profile>))
        .route("/api/v1/profiles/{id}/contacts", get(resource::list_children::<Profile, Contact>))
        .route("/api/v1/profiles/{id}/services", get(resource::list_children::<Profile, Service>))
        .route("/api/v1/projects/{id}", get(resource::get_one::<Project>))
        .route("/api/v1/projects/{id}/features", get(resource::list_children::<Project, Feature>))
        .route("/api/v1/works/{id}", get(resource::get_one::<Work>))
        .route("/api/v1/works/{id}/experiences", get(resource::list_children::<Work, Experience>))
        .route("/api/v1/articles/{id}", get(resource::get_one::<Article>))
        .route("/api/v1/contributions/{id}", get(resource::get_one::<Contribution>))
        .route(
            "/api/v1/contributions/{id}/gitrefs",
            get(resource::list_children::<Contribution, GitRef>),
        )
        .route("/api/v1/features/{id}", get(resource::get_one::<Feature>))
        .route("/api/v1/experiences/{id}", get(resource::get_one::<Experience>))
        .route("/api/v1/gitrefs/{id}", get(resource::get_one::<GitRef>))
        .route("/api/v1/contacts/{id}", get(resource::get_one::<Contact>))
        .route("/api/v1/services/{id}", get(resource::get_one::<Service>));

    let protected = Router::new()
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        .route("/api/v1/users/current-user", get(auth::current_user))
        // Account
        .route(
            "/api/v1/users/{id}",
            patch(resource::update_one::<User>).delete(users::delete_user),
        )
        .route("/api/v1/profiles/{id}", patch(profiles::update_profile))
        // Creation under parents
        .route("/api/v1/users/{id}/projects", post(resource::create_child::<User, CreateProject>))
        .route("/api/v1/users/{id}/works", post(resource::create_child::<User, CreateWork>))
        .route("/api/v1/users/{id}/articles", post(resource::create_child::<User, CreateArticle>))
        .route(
            "/api/v1/users/{id}/contributions",
            post(resource::create_child::<User, CreateContribution>),
        )
        .route(
            "/api/v1/projects/{id}/features",
            post(resource::create_child::<Project, CreateFeature>),
        )
        .route(
            "/api/v1/works/{id}/experiences",
            post(resource::create_child::<Work, CreateExperience>),
        )
        .route(
            "/api/v1/contributions/{id}/gitrefs",
            post(resource::create_child::<Contribution, CreateGitRef>),
        )
        .route(
            "/api/v1/profiles/{id}/contacts",
            post(resource::create_child::<Profile, CreateContact>),
        )
        .route(
            "/api/v1/profiles/{id}/services",
            post(resource::create_child::<Profile, CreateService>),
        )
        // Updates and deletes
        .route(
            "/api/v1/projects/{id}",
            patch(resource::update_one::<Project>).delete(projects::delete_project),
        )
        .route(
            "/api/v1/works/{id}",
            patch(resource::update_one::<Work>).delete(works::delete_work),
        )
        .route(
            "/api/v1/articles/{id}",
            patch(resource::update_one::<Article>).delete(resource::delete_one::<Article>),
        )
        .route(
            "/api/v1/contributions/{id}",
            patch(resource::update_one::<Contribution>)
                .delete(contributions::delete_contribution),
        )
        .route(
            "/api/v1/features/{id}",
            patch(resource::update_one::<Feature>).delete(resource::delete_one::<Feature>),
        )
        .route(
            "/api/v1/experiences/{id}",
            patch(resource::update_one::<Experience>).delete(resource::delete_one::<Experience>),
        )
        .route(
            "/api/v1/gitrefs/{id}",
            patch(resource::update_one::<GitRef>).delete(git_refs::remove_git_ref),
        )
        .route(
            "/api/v1/contacts/{id}",
            patch(resource::update_one::<Contact>).delete(resource::delete_one::<Contact>),
        )
        .route(
            "/api/v1/services/{id}",
            patch(resource::update_one::<Service>).delete(resource::delete_one::<Service>),
        )
        .layer(from_fn_with_state(state.clone(), require_auth));

    public
        .merge(protected)
        .layer(from_fn(logging_middleware))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + (64 << 10)))
        .with_state(state)
}
