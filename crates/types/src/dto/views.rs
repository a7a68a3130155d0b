//! Response views.
//!
//! Views are what handlers serialize: delimited list fields come back as
//! JSON arrays, and secrets (`password_hash`) never appear.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::{
    delimited,
    entities::{
        Article, Contact, Contribution, Experience, Feature, GitRef, Profile, Project, Service,
        User, Work,
    },
};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProfileView {
    pub id: i64,
    pub user_id: i64,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub project_header: Option<String>,
    pub work_header: Option<String>,
    pub article_header: Option<String>,
    pub resume: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Profile> for ProfileView {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            user_id: profile.user_id,
            image_url: profile.image_url,
            bio: profile.bio,
            location: profile.location,
            project_header: profile.project_header,
            work_header: profile.work_header,
            article_header: profile.article_header,
            resume: profile.resume,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProjectView {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectView {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            user_id: project.user_id,
            title: project.title,
            description: project.description,
            image_url: project.image_url,
            video_url: project.video_url,
            project_url: project.project_url,
            github_url: project.github_url,
            skills: delimited::split(&project.skills),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WorkView {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub company: String,
    pub description: String,
    pub image_url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Work> for WorkView {
    fn from(work: Work) -> Self {
        Self {
            id: work.id,
            user_id: work.user_id,
            title: work.title,
            company: work.company,
            description: work.description,
            image_url: work.image_url,
            start_date: work.start_date,
            end_date: work.end_date,
            skills: delimited::split(&work.skills),
            created_at: work.created_at,
            updated_at: work.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArticleView {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Article> for ArticleView {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            user_id: article.user_id,
            title: article.title,
            content: article.content,
            tags: delimited::split(&article.tags),
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContributionView {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub repo_url: String,
    pub contribution_type: Option<String>,
    pub role: Option<String>,
    pub date: Option<NaiveDate>,
    pub descriptions: Vec<String>,
    pub impacts: Vec<String>,
    pub technologies: Vec<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contribution> for ContributionView {
    fn from(contribution: Contribution) -> Self {
        Self {
            id: contribution.id,
            user_id: contribution.user_id,
            name: contribution.name,
            repo_url: contribution.repo_url,
            contribution_type: contribution.contribution_type,
            role: contribution.role,
            date: contribution.date,
            descriptions: delimited::split(&contribution.descriptions),
            impacts: delimited::split(&contribution.impacts),
            technologies: delimited::split(&contribution.technologies),
            skills: delimited::split(&contribution.skills),
            created_at: contribution.created_at,
            updated_at: contribution.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FeatureView {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Feature> for FeatureView {
    fn from(feature: Feature) -> Self {
        Self {
            id: feature.id,
            project_id: feature.project_id,
            name: feature.name,
            description: feature.description,
            created_at: feature.created_at,
            updated_at: feature.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExperienceView {
    pub id: i64,
    pub work_id: i64,
    pub result: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Experience> for ExperienceView {
    fn from(experience: Experience) -> Self {
        Self {
            id: experience.id,
            work_id: experience.work_id,
            result: experience.result,
            created_at: experience.created_at,
            updated_at: experience.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GitRefView {
    pub id: i64,
    pub contribution_id: Option<i64>,
    pub status: String,
    pub commit_id: String,
    pub pull_request_url: String,
    pub issue_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GitRef> for GitRefView {
    fn from(git_ref: GitRef) -> Self {
        Self {
            id: git_ref.id,
            contribution_id: git_ref.contribution_id,
            status: git_ref.status,
            commit_id: git_ref.commit_id,
            pull_request_url: git_ref.pull_request_url,
            issue_url: git_ref.issue_url,
            created_at: git_ref.created_at,
            updated_at: git_ref.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContactView {
    pub id: i64,
    pub profile_id: i64,
    pub name: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactView {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            profile_id: contact.profile_id,
            name: contact.name,
            url: contact.url,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ServiceView {
    pub id: i64,
    pub profile_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Service> for ServiceView {
    fn from(service: Service) -> Self {
        Self {
            id: service.id,
            profile_id: service.profile_id,
            title: service.title,
            description: service.description,
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}
