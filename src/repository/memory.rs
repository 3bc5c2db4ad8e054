//! In-memory reference repositories.
//!
//! Each repository owns a `HashMap` behind one `parking_lot::RwLock`. Records
//! go in and come out as clones so callers cannot mutate stored state.
//! Deletion is soft: the stored record gets a `deleted_at` stamp and stops
//! being visible to reads, lists and counts.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::domain::query::page_bounds;
use crate::domain::{
    Child, DomainError, DomainResult, FilterOptions, PagedResult, Parent, QueryOptions,
    SortOptions,
};
use crate::ports::{ChildRepository, ParentRepository, RepositoryFactory, TransactionManager};

/// Field access needed to filter and sort stored records generically.
trait Record: Clone + Send + Sync {
    const ENTITY: &'static str;

    fn id(&self) -> Uuid;
    fn is_deleted(&self) -> bool;
    fn mark_deleted(&mut self);
    fn first_name(&self) -> &str;
    fn last_name(&self) -> &str;
    fn email(&self) -> Option<&str>;
    fn birth_date(&self) -> DateTime<Utc>;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn parent_id(&self) -> Option<Uuid>;
    fn age_on(&self, today: NaiveDate) -> i32;
}

impl Record for Parent {
    const ENTITY: &'static str = "parent";

    fn id(&self) -> Uuid {
        self.id
    }
    fn is_deleted(&self) -> bool {
        Parent::is_deleted(self)
    }
    fn mark_deleted(&mut self) {
        Parent::mark_deleted(self)
    }
    fn first_name(&self) -> &str {
        &self.first_name
    }
    fn last_name(&self) -> &str {
        &self.last_name
    }
    fn email(&self) -> Option<&str> {
        Some(&self.email)
    }
    fn birth_date(&self) -> DateTime<Utc> {
        self.birth_date
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
    fn parent_id(&self) -> Option<Uuid> {
        None
    }
    fn age_on(&self, today: NaiveDate) -> i32 {
        Parent::age_on(self, today)
    }
}

impl Record for Child {
    const ENTITY: &'static str = "child";

    fn id(&self) -> Uuid {
        self.id
    }
    fn is_deleted(&self) -> bool {
        Child::is_deleted(self)
    }
    fn mark_deleted(&mut self) {
        Child::mark_deleted(self)
    }
    fn first_name(&self) -> &str {
        &self.first_name
    }
    fn last_name(&self) -> &str {
        &self.last_name
    }
    fn email(&self) -> Option<&str> {
        None
    }
    fn birth_date(&self) -> DateTime<Utc> {
        self.birth_date
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
    fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }
    fn age_on(&self, today: NaiveDate) -> i32 {
        Child::age_on(self, today)
    }
}

/// Case-insensitive substring match; an empty needle matches everything.
fn text_matches(value: &str, needle: &Option<String>) -> bool {
    match needle.as_deref() {
        None | Some("") => true,
        Some(needle) => value.to_lowercase().contains(&needle.to_lowercase()),
    }
}

fn matches_filter<T: Record>(record: &T, filter: &FilterOptions, today: NaiveDate) -> bool {
    if !text_matches(record.first_name(), &filter.first_name)
        || !text_matches(record.last_name(), &filter.last_name)
    {
        return false;
    }
    if let Some(email) = record.email()
        && !text_matches(email, &filter.email)
    {
        return false;
    }
    let age = record.age_on(today);
    if let Some(min) = filter.min_age
        && age < min as i32
    {
        return false;
    }
    if let Some(max) = filter.max_age
        && age > max as i32
    {
        return false;
    }
    true
}

/// Order by the requested field and direction. An absent or unknown field
/// falls back to `createdAt` ascending whatever the direction.
fn compare_by<T: Record>(a: &T, b: &T, sort: Option<&SortOptions>) -> Ordering {
    let field = sort
        .map(|s| s.field.replace('_', "").to_lowercase())
        .unwrap_or_default();
    let ordering = match field.as_str() {
        "firstname" => a
            .first_name()
            .to_lowercase()
            .cmp(&b.first_name().to_lowercase()),
        "lastname" => a
            .last_name()
            .to_lowercase()
            .cmp(&b.last_name().to_lowercase()),
        "email" => a
            .email()
            .map(str::to_lowercase)
            .cmp(&b.email().map(str::to_lowercase)),
        "birthdate" => a.birth_date().cmp(&b.birth_date()),
        "createdat" => a.created_at().cmp(&b.created_at()),
        "updatedat" => a.updated_at().cmp(&b.updated_at()),
        _ => {
            return a
                .created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()));
        }
    };
    let ordering = ordering.then_with(|| a.id().cmp(&b.id()));
    match sort {
        Some(s) if s.is_descending() => ordering.reverse(),
        _ => ordering,
    }
}

/// Map of records under one coarse lock, shared by both repositories.
struct MemoryStore<T: Record> {
    entries: RwLock<HashMap<Uuid, T>>,
}

impl<T: Record> MemoryStore<T> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn create(&self, record: &T) -> DomainResult<()> {
        let mut entries = self.entries.write();
        if entries.contains_key(&record.id()) {
            return Err(DomainError::already_exists(T::ENTITY, record.id()));
        }
        entries.insert(record.id(), record.clone());
        Ok(())
    }

    fn get(&self, id: Uuid) -> DomainResult<T> {
        self.entries
            .read()
            .get(&id)
            .filter(|r| !r.is_deleted())
            .cloned()
            .ok_or_else(|| DomainError::not_found(T::ENTITY, id))
    }

    fn update(&self, record: &T) -> DomainResult<()> {
        let mut entries = self.entries.write();
        match entries.get_mut(&record.id()) {
            Some(existing) if !existing.is_deleted() => {
                *existing = record.clone();
                Ok(())
            }
            _ => Err(DomainError::not_found(T::ENTITY, record.id())),
        }
    }

    fn delete(&self, id: Uuid) -> DomainResult<()> {
        let mut entries = self.entries.write();
        match entries.get_mut(&id) {
            Some(existing) if !existing.is_deleted() => {
                existing.mark_deleted();
                Ok(())
            }
            _ => Err(DomainError::not_found(T::ENTITY, id)),
        }
    }

    fn matching(&self, parent_id: Option<Uuid>, filter: &FilterOptions) -> Vec<T> {
        let today = Utc::now().date_naive();
        self.entries
            .read()
            .values()
            .filter(|r| !r.is_deleted())
            .filter(|r| parent_id.is_none() || r.parent_id() == parent_id)
            .filter(|r| matches_filter(*r, filter, today))
            .cloned()
            .collect()
    }

    fn list(&self, parent_id: Option<Uuid>, options: &QueryOptions) -> (Vec<T>, PagedResult) {
        let mut matched = self.matching(parent_id, &options.filter);
        matched.sort_by(|a, b| compare_by(a, b, options.sort.as_ref()));

        let total = matched.len();
        let range = page_bounds(options.pagination, total);
        let page: Vec<T> = matched.drain(range).collect();
        let paged = PagedResult::new(options.pagination, page.len(), total);
        (page, paged)
    }

    fn count(&self, parent_id: Option<Uuid>, filter: &FilterOptions) -> usize {
        self.matching(parent_id, filter).len()
    }

    /// Number of stored records including soft-deleted ones.
    fn stored_len(&self) -> usize {
        self.entries.read().len()
    }
}

pub struct InMemoryParentRepository {
    store: MemoryStore<Parent>,
}

impl InMemoryParentRepository {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }

    /// Records held, soft-deleted ones included.
    pub fn stored_len(&self) -> usize {
        self.store.stored_len()
    }
}

impl Default for InMemoryParentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ParentRepository for InMemoryParentRepository {
    async fn create(&self, ctx: &RequestContext, parent: &Parent) -> DomainResult<()> {
        ctx.ensure_active()?;
        self.store.create(parent)?;
        tracing::debug!(parent_id = %parent.id, "Stored parent");
        Ok(())
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<Parent> {
        ctx.ensure_active()?;
        self.store.get(id)
    }

    async fn update(&self, ctx: &RequestContext, parent: &Parent) -> DomainResult<()> {
        ctx.ensure_active()?;
        self.store.update(parent)
    }

    async fn delete(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<()> {
        ctx.ensure_active()?;
        self.store.delete(id)?;
        tracing::debug!(parent_id = %id, "Soft-deleted parent");
        Ok(())
    }

    async fn list(
        &self,
        ctx: &RequestContext,
        options: &QueryOptions,
    ) -> DomainResult<(Vec<Parent>, PagedResult)> {
        ctx.ensure_active()?;
        Ok(self.store.list(None, options))
    }

    async fn count(&self, ctx: &RequestContext, filter: &FilterOptions) -> DomainResult<usize> {
        ctx.ensure_active()?;
        Ok(self.store.count(None, filter))
    }
}

pub struct InMemoryChildRepository {
    store: MemoryStore<Child>,
}

impl InMemoryChildRepository {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }

    /// Records held, soft-deleted ones included.
    pub fn stored_len(&self) -> usize {
        self.store.stored_len()
    }
}

impl Default for InMemoryChildRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChildRepository for InMemoryChildRepository {
    async fn create(&self, ctx: &RequestContext, child: &Child) -> DomainResult<()> {
        ctx.ensure_active()?;
        self.store.create(child)?;
        tracing::debug!(child_id = %child.id, "Stored child");
        Ok(())
    }

    async fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<Child> {
        ctx.ensure_active()?;
        self.store.get(id)
    }

    async fn update(&self, ctx: &RequestContext, child: &Child) -> DomainResult<()> {
        ctx.ensure_active()?;
        self.store.update(child)
    }

    async fn delete(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<()> {
        ctx.ensure_active()?;
        self.store.delete(id)?;
        tracing::debug!(child_id = %id, "Soft-deleted child");
        Ok(())
    }

    async fn list(
        &self,
        ctx: &RequestContext,
        options: &QueryOptions,
    ) -> DomainResult<(Vec<Child>, PagedResult)> {
        ctx.ensure_active()?;
        Ok(self.store.list(None, options))
    }

    async fn list_by_parent_id(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        options: &QueryOptions,
    ) -> DomainResult<(Vec<Child>, PagedResult)> {
        ctx.ensure_active()?;
        Ok(self.store.list(Some(parent_id), options))
    }

    async fn count(&self, ctx: &RequestContext, filter: &FilterOptions) -> DomainResult<usize> {
        ctx.ensure_active()?;
        Ok(self.store.count(None, filter))
    }

    async fn count_by_parent_id(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        filter: &FilterOptions,
    ) -> DomainResult<usize> {
        ctx.ensure_active()?;
        Ok(self.store.count(Some(parent_id), filter))
    }
}

/// Factory handing out one shared pair of in-memory repositories.
#[derive(Clone)]
pub struct InMemoryRepositoryFactory {
    parents: Arc<InMemoryParentRepository>,
    children: Arc<InMemoryChildRepository>,
}

impl InMemoryRepositoryFactory {
    pub fn new() -> Self {
        Self {
            parents: Arc::new(InMemoryParentRepository::new()),
            children: Arc::new(InMemoryChildRepository::new()),
        }
    }
}

impl Default for InMemoryRepositoryFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryFactory for InMemoryRepositoryFactory {
    fn parent_repository(&self) -> Arc<dyn ParentRepository> {
        self.parents.clone()
    }

    fn child_repository(&self) -> Arc<dyn ChildRepository> {
        self.children.clone()
    }

    async fn health_check(&self, ctx: &RequestContext) -> DomainResult<()> {
        ctx.ensure_active()?;
        let parents = self.parents.stored_len();
        let children = self.children.stored_len();
        tracing::debug!(parents, children, "In-memory store reachable");
        Ok(())
    }
}

/// Transaction manager that only flags the context. Writes are applied
/// immediately; rollback does not undo them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransactionManager;

#[async_trait]
impl TransactionManager for InMemoryTransactionManager {
    async fn begin(&self, ctx: &RequestContext) -> DomainResult<RequestContext> {
        ctx.ensure_active()?;
        if ctx.in_transaction() {
            return Err(DomainError::Transaction(
                "transaction already in progress".to_string(),
            ));
        }
        Ok(ctx.with_transaction(true))
    }

    async fn commit(&self, ctx: &RequestContext) -> DomainResult<()> {
        if !ctx.in_transaction() {
            return Err(DomainError::Transaction(
                "no transaction in progress".to_string(),
            ));
        }
        ctx.ensure_active()
    }

    async fn rollback(&self, ctx: &RequestContext) -> DomainResult<()> {
        if !ctx.in_transaction() {
            return Err(DomainError::Transaction(
                "no transaction in progress".to_string(),
            ));
        }
        tracing::warn!(request_id = %ctx.request_id(), "Rolled back in-memory transaction");
        Ok(())
    }
}
