//! Request bodies.
//!
//! Create DTOs reject undeclared fields (`deny_unknown_fields`) and carry
//! list fields as JSON arrays, joined to delimited strings when converted
//! into entities. Auth DTOs use optional fields so handlers can report the
//! complete set of missing required fields at once.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    delimited,
    entities::{Article, Contact, Contribution, Experience, Feature, GitRef, Project, Service, Work},
    error::{Error, Result},
};

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
}

impl RegisterRequest {
    /// Collect the required fields, reporting every missing or empty one.
    pub fn required(&self) -> Result<(String, String, String)> {
        let mut missing = Vec::new();
        let name = self.name.as_deref().unwrap_or_default().trim();
        let email = self.email.as_deref().unwrap_or_default().trim();
        let password = self.password.as_deref().unwrap_or_default();
        if name.is_empty() {
            missing.push("name".to_string());
        }
        if email.is_empty() {
            missing.push("email".to_string());
        }
        if password.is_empty() {
            missing.push("password".to_string());
        }
        if !missing.is_empty() {
            return Err(Error::missing_fields(missing));
        }
        Ok((name.to_string(), email.to_string(), password.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

// ── Resource creation ────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CreateProject {
    pub fn into_entity(self, id: i64, user_id: i64) -> Result<Project> {
        Project::builder()
            .id(id)
            .user_id(user_id)
            .title(self.title)
            .description(self.description)
            .maybe_image_url(self.image_url)
            .maybe_video_url(self.video_url)
            .maybe_project_url(self.project_url)
            .maybe_github_url(self.github_url)
            .skills(delimited::join(&self.skills)?)
            .create()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateWork {
    pub title: String,
    pub company: String,
    pub description: String,
    pub image_url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CreateWork {
    pub fn into_entity(self, id: i64, user_id: i64) -> Result<Work> {
        Work::builder()
            .id(id)
            .user_id(user_id)
            .title(self.title)
            .company(self.company)
            .description(self.description)
            .maybe_image_url(self.image_url)
            .start_date(self.start_date)
            .end_date(self.end_date)
            .skills(delimited::join(&self.skills)?)
            .create()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateArticle {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateArticle {
    pub fn into_entity(self, id: i64, user_id: i64) -> Result<Article> {
        Article::builder()
            .id(id)
            .user_id(user_id)
            .title(self.title)
            .content(self.content)
            .tags(delimited::join(&self.tags)?)
            .create()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateContribution {
    pub name: String,
    pub repo_url: String,
    pub contribution_type: Option<String>,
    pub role: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub descriptions: Vec<String>,
    #[serde(default)]
    pub impacts: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl CreateContribution {
    pub fn into_entity(self, id: i64, user_id: i64) -> Result<Contribution> {
        Contribution::builder()
            .id(id)
            .user_id(user_id)
            .name(self.name)
            .repo_url(self.repo_url)
            .maybe_contribution_type(self.contribution_type)
            .maybe_role(self.role)
            .maybe_date(self.date)
            .descriptions(delimited::join(&self.descriptions)?)
            .impacts(delimited::join(&self.impacts)?)
            .technologies(delimited::join(&self.technologies)?)
            .skills(delimited::join(&self.skills)?)
            .create()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateFeature {
    pub name: String,
    pub description: String,
}

impl CreateFeature {
    pub fn into_entity(self, id: i64, project_id: i64) -> Result<Feature> {
        Feature::builder()
            .id(id)
            .project_id(project_id)
            .name(self.name)
            .description(self.description)
            .create()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateExperience {
    pub result: String,
}

impl CreateExperience {
    pub fn into_entity(self, id: i64, work_id: i64) -> Result<Experience> {
        Experience::builder().id(id).work_id(work_id).result(self.result).create()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateGitRef {
    pub status: String,
    pub commit_id: String,
    pub pull_request_url: String,
    pub issue_url: Option<String>,
}

impl CreateGitRef {
    pub fn into_entity(self, id: i64, contribution_id: i64) -> Result<GitRef> {
        GitRef::builder()
            .id(id)
            .contribution_id(contribution_id)
            .status(self.status)
            .commit_id(self.commit_id)
            .pull_request_url(self.pull_request_url)
            .maybe_issue_url(self.issue_url)
            .create()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateContact {
    pub name: String,
    pub url: String,
}

impl CreateContact {
    pub fn into_entity(self, id: i64, profile_id: i64) -> Result<Contact> {
        Contact::builder().id(id).profile_id(profile_id).name(self.name).url(self.url).create()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateService {
    pub title: String,
    pub description: String,
}

impl CreateService {
    pub fn into_entity(self, id: i64, profile_id: i64) -> Result<Service> {
        Service::builder()
            .id(id)
            .profile_id(profile_id)
            .title(self.title)
            .description(self.description)
            .create()
    }
}
