//! Port traits between the resolver layer and its collaborators.
//!
//! Every call takes the [RequestContext] explicitly. Implementations must
//! hand out owned values; callers never see repository-owned memory.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::domain::{Child, DomainResult, FilterOptions, PagedResult, Parent, QueryOptions};

/// Decides whether the caller may perform a named operation such as
/// `parent:read`.
///
/// `Err` means the check itself failed; `Ok(false)` is a denial.
#[async_trait]
pub trait AuthorizationService: Send + Sync {
    async fn is_authorized(&self, ctx: &RequestContext, operation: &str) -> DomainResult<bool>;
}

/// Application operations on parents and children.
#[async_trait]
pub trait FamilyService: Send + Sync {
    async fn create_parent(
        &self,
        ctx: &RequestContext,
        first_name: &str,
        last_name: &str,
        email: &str,
        birth_date: &str,
    ) -> DomainResult<Parent>;

    async fn get_parent_by_id(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<Parent>;

    async fn update_parent(&self, ctx: &RequestContext, parent: Parent) -> DomainResult<Parent>;

    async fn delete_parent(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<()>;

    async fn list_parents(
        &self,
        ctx: &RequestContext,
        options: QueryOptions,
    ) -> DomainResult<(Vec<Parent>, PagedResult)>;

    async fn count_parents(&self, ctx: &RequestContext, filter: FilterOptions)
    -> DomainResult<usize>;

    async fn create_child(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        first_name: &str,
        last_name: &str,
        birth_date: &str,
    ) -> DomainResult<Child>;

    async fn get_child_by_id(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<Child>;

    async fn update_child(&self, ctx: &RequestContext, child: Child) -> DomainResult<Child>;

    async fn delete_child(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<()>;

    async fn list_children(
        &self,
        ctx: &RequestContext,
        options: QueryOptions,
    ) -> DomainResult<(Vec<Child>, PagedResult)>;

    async fn list_children_by_parent_id(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        options: QueryOptions,
    ) -> DomainResult<(Vec<Child>, PagedResult)>;

    async fn count_children(&self, ctx: &RequestContext, filter: FilterOptions)
    -> DomainResult<usize>;

    async fn add_child_to_parent(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> DomainResult<Parent>;

    async fn remove_child_from_parent(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> DomainResult<Parent>;
}

#[async_trait]
pub trait ParentRepository: Send + Sync {
    async fn create(&self, ctx: &RequestContext, parent: &Parent) -> DomainResult<()>;

    async fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<Parent>;

    async fn update(&self, ctx: &RequestContext, parent: &Parent) -> DomainResult<()>;

    async fn delete(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<()>;

    async fn list(
        &self,
        ctx: &RequestContext,
        options: &QueryOptions,
    ) -> DomainResult<(Vec<Parent>, PagedResult)>;

    async fn count(&self, ctx: &RequestContext, filter: &FilterOptions) -> DomainResult<usize>;
}

#[async_trait]
pub trait ChildRepository: Send + Sync {
    async fn create(&self, ctx: &RequestContext, child: &Child) -> DomainResult<()>;

    async fn get_by_id(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<Child>;

    async fn update(&self, ctx: &RequestContext, child: &Child) -> DomainResult<()>;

    async fn delete(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<()>;

    async fn list(
        &self,
        ctx: &RequestContext,
        options: &QueryOptions,
    ) -> DomainResult<(Vec<Child>, PagedResult)>;

    async fn list_by_parent_id(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        options: &QueryOptions,
    ) -> DomainResult<(Vec<Child>, PagedResult)>;

    async fn count(&self, ctx: &RequestContext, filter: &FilterOptions) -> DomainResult<usize>;

    async fn count_by_parent_id(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        filter: &FilterOptions,
    ) -> DomainResult<usize>;
}

/// Hands out the repositories of one storage backend.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    fn parent_repository(&self) -> Arc<dyn ParentRepository>;

    fn child_repository(&self) -> Arc<dyn ChildRepository>;

    /// Probe the backing store. Used by `/health`.
    async fn health_check(&self, ctx: &RequestContext) -> DomainResult<()>;
}

/// Begin/commit/rollback around multi-repository writes.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// Returns a derived context bound to the new transaction.
    async fn begin(&self, ctx: &RequestContext) -> DomainResult<RequestContext>;

    async fn commit(&self, ctx: &RequestContext) -> DomainResult<()>;

    async fn rollback(&self, ctx: &RequestContext) -> DomainResult<()>;
}
