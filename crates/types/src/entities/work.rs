use bon::bon;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    resource::Resource,
};

/// Employment history entry. `skills` is a `::`-delimited list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Work {
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    pub title: String,
    pub company: String,
    pub description: String,
    pub image_url: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Delimited skills list (see [`crate::delimited`])
    pub skills: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[bon]
impl Work {
    #[builder(finish_fn = create, on(String, into))]
    pub fn new(
        id: i64,
        user_id: i64,
        title: String,
        company: String,
        description: String,
        image_url: Option<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        #[builder(default)] skills: String,
    ) -> Result<Self> {
        let now = Utc::now();
        let work = Self {
            id,
            user_id,
            title,
            company,
            description,
            image_url,
            start_date,
            end_date,
            skills,
            created_at: now,
            updated_at: now,
        };
        work.validate()?;
        Ok(work)
    }
}

impl Resource for Work {
    const KIND: &'static str = "work";

    fn key_prefix() -> &'static str {
        "work"
    }

    fn parent_prefix() -> &'static str {
        "user"
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn parent_id(&self) -> Option<i64> {
        Some(self.user_id)
    }

    fn set_parent_id(&mut self, parent_id: Option<i64>) {
        if let Some(id) = parent_id {
            self.user_id = id;
        }
    }

    fn writable_fields() -> &'static [&'static str] {
        &["title", "company", "description", "image_url", "start_date", "end_date", "skills"]
    }

    fn list_fields() -> &'static [&'static str] {
        &["skills"]
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("title must not be empty"));
        }
        if self.company.trim().is_empty() {
            return Err(Error::validation("company must not be empty"));
        }
        if self.end_date < self.start_date {
            return Err(Error::validation("end_date must not precede start_date"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn builder_rejects_inverted_date_range() {
        let result = Work::builder()
            .id(1)
            .user_id(1)
            .title("Engineer")
            .company("Acme")
            .description("d")
            .start_date(date(2024, 6, 1))
            .end_date(date(2024, 1, 1))
            .create();
        assert!(result.is_err());
    }

    #[test]
    fn builder_accepts_valid_range() {
        let work = Work::builder()
            .id(1)
            .user_id(1)
            .title("Engineer")
            .company("Acme")
            .description("d")
            .start_date(date(2023, 1, 1))
            .end_date(date(2024, 1, 1))
            .create()
            .unwrap();
        assert_eq!(work.company, "Acme");
    }
}
