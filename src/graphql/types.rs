//! GraphQL type definitions
//!
//! Output types wrap the domain entities and format their fields on the way
//! out (ids as canonical strings, timestamps as RFC-3339). Update inputs use
//! [MaybeUndefined] so an omitted field is distinguishable from an explicit
//! `null`.

use async_graphql::{InputObject, MaybeUndefined, Object};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::define_connection;
use crate::domain::validation::parse_birth_date;
use crate::domain::{Child, DomainError, DomainResult, Parent};
use crate::identifier::format_id;

pub(crate) fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn today() -> chrono::NaiveDate {
    Utc::now().date_naive()
}

/// A parent record
#[derive(Debug, Clone)]
pub struct ParentObject(pub Parent);

impl From<Parent> for ParentObject {
    fn from(parent: Parent) -> Self {
        Self(parent)
    }
}

#[Object(name = "Parent")]
impl ParentObject {
    async fn id(&self) -> String {
        format_id(self.0.id)
    }

    async fn first_name(&self) -> &str {
        &self.0.first_name
    }

    async fn last_name(&self) -> &str {
        &self.0.last_name
    }

    /// First and last name joined with a space
    async fn full_name(&self) -> String {
        self.0.full_name()
    }

    async fn email(&self) -> &str {
        &self.0.email
    }

    /// Birth date (RFC-3339)
    async fn birth_date(&self) -> String {
        format_timestamp(self.0.birth_date)
    }

    /// Age in whole years as of today (UTC)
    async fn age(&self) -> i32 {
        self.0.age_on(today())
    }

    /// Children attached to this parent, in the order they were added
    async fn children(&self) -> Vec<ChildObject> {
        self.0.children.iter().cloned().map(ChildObject).collect()
    }

    async fn created_at(&self) -> String {
        format_timestamp(self.0.created_at)
    }

    async fn updated_at(&self) -> String {
        format_timestamp(self.0.updated_at)
    }

    async fn deleted_at(&self) -> Option<String> {
        self.0.deleted_at.map(format_timestamp)
    }
}

/// A child record
#[derive(Debug, Clone)]
pub struct ChildObject(pub Child);

impl From<Child> for ChildObject {
    fn from(child: Child) -> Self {
        Self(child)
    }
}

#[Object(name = "Child")]
impl ChildObject {
    async fn id(&self) -> String {
        format_id(self.0.id)
    }

    async fn first_name(&self) -> &str {
        &self.0.first_name
    }

    async fn last_name(&self) -> &str {
        &self.0.last_name
    }

    async fn full_name(&self) -> String {
        self.0.full_name()
    }

    /// Birth date (RFC-3339)
    async fn birth_date(&self) -> String {
        format_timestamp(self.0.birth_date)
    }

    async fn age(&self) -> i32 {
        self.0.age_on(today())
    }

    /// Owning parent, if the child is attached to one
    async fn parent_id(&self) -> Option<String> {
        self.0.parent_id.map(format_id)
    }

    async fn created_at(&self) -> String {
        format_timestamp(self.0.created_at)
    }

    async fn updated_at(&self) -> String {
        format_timestamp(self.0.updated_at)
    }

    async fn deleted_at(&self) -> Option<String> {
        self.0.deleted_at.map(format_timestamp)
    }
}

define_connection!(ParentConnection, ParentEdge, ParentObject);
define_connection!(ChildConnection, ChildEdge, ChildObject);

// ============================================================================
// Inputs
// ============================================================================

/// Input for creating a parent
#[derive(Debug, InputObject)]
pub struct CreateParentInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// RFC-3339 timestamp or YYYY-MM-DD; validated by the service
    pub birth_date: String,
}

/// Input for updating a parent. Omitted fields are left unchanged.
#[derive(Debug, Default, InputObject)]
pub struct UpdateParentInput {
    pub first_name: MaybeUndefined<String>,
    pub last_name: MaybeUndefined<String>,
    pub email: MaybeUndefined<String>,
    pub birth_date: MaybeUndefined<String>,
}

/// Input for creating a child under an existing parent
#[derive(Debug, InputObject)]
pub struct CreateChildInput {
    pub parent_id: String,
    pub first_name: String,
    pub last_name: String,
    /// RFC-3339 timestamp or YYYY-MM-DD; validated by the service
    pub birth_date: String,
}

/// Input for updating a child. Omitted fields are left unchanged.
#[derive(Debug, Default, InputObject)]
pub struct UpdateChildInput {
    pub first_name: MaybeUndefined<String>,
    pub last_name: MaybeUndefined<String>,
    pub birth_date: MaybeUndefined<String>,
}

/// `Some` when the field was provided, `None` when omitted; explicit null is
/// rejected since none of the updatable fields are nullable.
fn provided(field: &str, value: MaybeUndefined<String>) -> DomainResult<Option<String>> {
    match value {
        MaybeUndefined::Undefined => Ok(None),
        MaybeUndefined::Null => Err(DomainError::validation(format!(
            "{} cannot be null",
            field
        ))),
        MaybeUndefined::Value(v) => Ok(Some(v)),
    }
}

impl UpdateParentInput {
    /// Overwrite only the provided fields on `parent`.
    pub fn apply_to(self, parent: &mut Parent) -> DomainResult<()> {
        if let Some(v) = provided("firstName", self.first_name)? {
            parent.first_name = v;
        }
        if let Some(v) = provided("lastName", self.last_name)? {
            parent.last_name = v;
        }
        if let Some(v) = provided("email", self.email)? {
            parent.email = v;
        }
        if let Some(v) = provided("birthDate", self.birth_date)? {
            parent.birth_date = parse_birth_date(&v)?;
        }
        Ok(())
    }
}

impl UpdateChildInput {
    /// Overwrite only the provided fields on `child`.
    pub fn apply_to(self, child: &mut Child) -> DomainResult<()> {
        if let Some(v) = provided("firstName", self.first_name)? {
            child.first_name = v;
        }
        if let Some(v) = provided("lastName", self.last_name)? {
            child.last_name = v;
        }
        if let Some(v) = provided("birthDate", self.birth_date)? {
            child.birth_date = parse_birth_date(&v)?;
        }
        Ok(())
    }
}
