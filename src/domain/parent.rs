use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{age_on, check_birth_date, normalize_email, normalize_name};
use super::{Child, DomainResult};

/// A parent record with an ordered list of embedded child snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: DateTime<Utc>,
    pub children: Vec<Child>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Parent {
    pub fn new(
        id: Uuid,
        first_name: &str,
        last_name: &str,
        email: &str,
        birth_date: DateTime<Utc>,
    ) -> DomainResult<Self> {
        check_birth_date(birth_date)?;
        let now = Utc::now();
        Ok(Self {
            id,
            first_name: normalize_name("firstName", first_name)?,
            last_name: normalize_name("lastName", last_name)?,
            email: normalize_email(email)?,
            birth_date,
            children: Vec::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Re-check and normalize fields after an in-place edit.
    pub fn validate(&mut self) -> DomainResult<()> {
        self.first_name = normalize_name("firstName", &self.first_name)?;
        self.last_name = normalize_name("lastName", &self.last_name)?;
        self.email = normalize_email(&self.email)?;
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

    pub fn has_child(&self, child_id: Uuid) -> bool {
        self.children.iter().any(|c| c.id == child_id)
    }

    /// Append a snapshot, or replace the existing one with the same id.
    pub fn upsert_child(&mut self, child: Child) {
        match self.children.iter_mut().find(|c| c.id == child.id) {
            Some(existing) => *existing = child,
            None => self.children.push(child),
        }
    }

    /// Returns whether a snapshot was removed.
    pub fn remove_child(&mut self, child_id: Uuid) -> bool {
        let before = self.children.len();
        self.children.retain(|c| c.id != child_id);
        self.children.len() != before
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn age_on(&self, today: NaiveDate) -> i32 {
        age_on(self.birth_date, today)
    }
}
