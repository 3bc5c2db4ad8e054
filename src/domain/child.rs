use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{age_on, check_birth_date, normalize_name};
use super::DomainResult;

/// A child record. `parent_id` is a reference, not ownership: the parent
/// keeps its own snapshot list which the family service keeps in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: DateTime<Utc>,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Child {
    pub fn new(
        id: Uuid,
        first_name: &str,
        last_name: &str,
        birth_date: DateTime<Utc>,
        parent_id: Uuid,
    ) -> DomainResult<Self> {
        check_birth_date(birth_date)?;
        let now = Utc::now();
        Ok(Self {
            id,
            first_name: normalize_name("firstName", first_name)?,
            last_name: normalize_name("lastName", last_name)?,
            birth_date,
            parent_id: Some(parent_id),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Re-check and normalize fields after an in-place edit.
    pub fn validate(&mut self) -> DomainResult<()> {
        self.first_name = normalize_name("firstName", &self.first_name)?;
        self.last_name = normalize_name("lastName", &self.last_name)?;
        check_birth_date(self.birth_date)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn mark_deleted(&mut self) {
        let now = Utc::now();
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn age_on(&self, today: NaiveDate) -> i32 {
        age_on(self.birth_date, today)
    }
}
