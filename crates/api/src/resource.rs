//! Generic resource handlers.
//!
//! One set of handlers serves every entity: routes pick the entity (and for
//! nested routes, the parent) with type parameters. Reads are public; writes
//! resolve the record's owning user and require it to match the session.

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
};
use folio_core::{IdGenerator, Owned, ResourceRepository};
use folio_storage::Backend;
use folio_types::{
    Error, Resource,
    dto::requests::{
        CreateArticle, CreateContact, CreateContribution, CreateExperience, CreateFeature,
        CreateGitRef, CreateProject, CreateService, CreateWork,
    },
    dto::views::{
        ArticleView, ContactView, ContributionView, ExperienceView, FeatureView, GitRefView,
        ProfileView, ProjectView, ServiceView, UserView, WorkView,
    },
    entities::{
        Article, Contact, Contribution, Experience, Feature, GitRef, Profile, Project, Service,
        User, Work,
    },
    error::Result,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    AppState,
    envelope::{ApiResult, created, success},
    extract::ApiJson,
    middleware::AuthContext,
};

/// Maps an entity to the view its handlers serialize
pub trait ApiView: Resource {
    type View: serde::Serialize + From<Self> + Send;
}

macro_rules! api_view {
    ($($entity:ty => $view:ty),* $(,)?) => {
        $(impl ApiView for $entity {
            type View = $view;
        })*
    };
}

api_view! {
    User => UserView,
    Profile => ProfileView,
    Project => ProjectView,
    Work => WorkView,
    Article => ArticleView,
    Contribution => ContributionView,
    Feature => FeatureView,
    Experience => ExperienceView,
    GitRef => GitRefView,
    Contact => ContactView,
    Service => ServiceView,
}

/// A create request body that builds its entity from a fresh ID and the
/// parent taken from the route
pub trait CreateRequest: DeserializeOwned + Send {
    type Entity: Resource;

    fn build(self, id: i64, parent_id: i64) -> Result<Self::Entity>;
}

macro_rules! create_request {
    ($($request:ty => $entity:ty),* $(,)?) => {
        $(impl CreateRequest for $request {
            type Entity = $entity;

            fn build(self, id: i64, parent_id: i64) -> Result<$entity> {
                self.into_entity(id, parent_id)
            }
        })*
    };
}

create_request! {
    CreateProject => Project,
    CreateWork => Work,
    CreateArticle => Article,
    CreateContribution => Contribution,
    CreateFeature => Feature,
    CreateExperience => Experience,
    CreateGitRef => GitRef,
    CreateContact => Contact,
    CreateService => Service,
}

/// Repository for one entity over the app's shared backend
pub(crate) fn repo<T: Resource>(state: &AppState) -> ResourceRepository<Backend, T> {
    ResourceRepository::new((*state.storage).clone())
}

/// Fail with 403 unless the record resolves to the authenticated user
///
/// Records without an owner (detached git refs) also fail: nobody may
/// modify them until they are re-attached.
pub(crate) async fn ensure_owner<T: Owned>(
    state: &AppState,
    record: &T,
    user_id: i64,
) -> ApiResult<()> {
    let repos = state.repos();
    if record.owner_id(&repos).await? != Some(user_id) {
        return Err(Error::forbidden(format!("you do not own this {}", T::KIND)).into());
    }
    Ok(())
}

/// GET a single record by ID
pub async fn get_one<T: ApiView>(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let record = repo::<T>(&state).require(id).await?;
    Ok(success(T::View::from(record)))
}

/// GET all children of a parent record
///
/// 404 when the parent itself does not exist, so a missing parent and an
/// empty listing are distinguishable.
pub async fn list_children<P: Resource, T: ApiView>(
    State(state): State<AppState>,
    Path(parent_id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    repo::<P>(&state).require(parent_id).await?;

    let records = repo::<T>(&state).list_by_parent(parent_id).await?;
    let views: Vec<T::View> = records.into_iter().map(T::View::from).collect();
    Ok(success(views))
}

/// POST a new child under a parent record
pub async fn create_child<P: Owned, D: CreateRequest>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(parent_id): Path<i64>,
    ApiJson(payload): ApiJson<D>,
) -> ApiResult<(StatusCode, Json<Value>)>
where
    D::Entity: ApiView,
{
    let parent = repo::<P>(&state).require(parent_id).await?;
    ensure_owner(&state, &parent, auth.user_id).await?;

    let entity = payload.build(IdGenerator::next_id(), parent_id)?;
    let record = repo::<D::Entity>(&state).create(entity).await?;
    Ok(created(<D::Entity as ApiView>::View::from(record)))
}

/// PATCH a record with a partial set of writable fields
pub async fn update_one<T: Owned + ApiView>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    ApiJson(fields): ApiJson<serde_json::Map<String, Value>>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repo = repo::<T>(&state);
    let record = repo.require(id).await?;
    ensure_owner(&state, &record, auth.user_id).await?;

    let updated = repo.patch(id, &fields).await?;
    Ok(success(T::View::from(updated)))
}

/// DELETE a record with no children of its own
pub async fn delete_one<T: Owned + ApiView>(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let repo = repo::<T>(&state);
    let record = repo.require(id).await?;
    ensure_owner(&state, &record, auth.user_id).await?;

    let deleted = repo.delete(id).await?;
    Ok(success(T::View::from(deleted)))
}
