//! Family application service: the reference [FamilyService] implementation.
//!
//! Parses and validates raw input, stamps timestamps, and keeps each parent's
//! embedded child snapshots in step with the child repository. Writes that
//! touch both repositories run between `begin` and `commit` on the
//! [TransactionManager]; any failure triggers a rollback.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::domain::validation::parse_birth_date;
use crate::domain::{
    Child, DomainError, DomainResult, FilterOptions, PagedResult, Parent, QueryOptions,
};
use crate::identifier::new_id;
use crate::ports::{
    ChildRepository, FamilyService, ParentRepository, RepositoryFactory, TransactionManager,
};

pub struct FamilyServiceImpl {
    parents: Arc<dyn ParentRepository>,
    children: Arc<dyn ChildRepository>,
    transactions: Arc<dyn TransactionManager>,
}

impl FamilyServiceImpl {
    pub fn new(factory: &dyn RepositoryFactory, transactions: Arc<dyn TransactionManager>) -> Self {
        Self {
            parents: factory.parent_repository(),
            children: factory.child_repository(),
            transactions,
        }
    }

    /// Commit on success, roll back on failure. The original error wins over
    /// a rollback failure.
    async fn finish<T>(&self, tx: &RequestContext, result: DomainResult<T>) -> DomainResult<T> {
        match result {
            Ok(value) => {
                self.transactions.commit(tx).await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = self.transactions.rollback(tx).await {
                    tracing::error!(error = %rollback_err, cause = %e, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Drop a child's snapshot from a parent. A missing or deleted parent is
    /// not an error: there is nothing to detach from.
    async fn detach_snapshot(
        &self,
        tx: &RequestContext,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> DomainResult<()> {
        let mut parent = match self.parents.get_by_id(tx, parent_id).await {
            Ok(p) => p,
            Err(e) if e.is_not_found() => {
                tracing::warn!(
                    parent_id = %parent_id,
                    child_id = %child_id,
                    "Owning parent missing while detaching child"
                );
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        if parent.remove_child(child_id) {
            parent.touch();
            self.parents.update(tx, &parent).await?;
        }
        Ok(())
    }

    async fn create_child_tx(
        &self,
        tx: &RequestContext,
        parent_id: Uuid,
        first_name: &str,
        last_name: &str,
        birth_date: chrono::DateTime<chrono::Utc>,
    ) -> DomainResult<Child> {
        let mut parent = self.parents.get_by_id(tx, parent_id).await?;
        let child = Child::new(new_id(), first_name, last_name, birth_date, parent_id)?;
        self.children.create(tx, &child).await?;

        parent.upsert_child(child.clone());
        parent.touch();
        self.parents.update(tx, &parent).await?;
        Ok(child)
    }

    /// Apply the editable fields of `edited` onto the stored parent. The
    /// stored child snapshots and lifecycle timestamps are kept.
    async fn update_parent_tx(&self, tx: &RequestContext, edited: Parent) -> DomainResult<Parent> {
        let mut parent = self.parents.get_by_id(tx, edited.id).await?;
        parent.first_name = edited.first_name;
        parent.last_name = edited.last_name;
        parent.email = edited.email;
        parent.birth_date = edited.birth_date;
        parent.validate()?;
        parent.touch();
        self.parents.update(tx, &parent).await?;
        Ok(parent)
    }

    /// Apply the editable fields of `edited` onto the stored child and
    /// refresh its snapshot in the owning parent. Ownership only changes
    /// through the relationship operations.
    async fn update_child_tx(&self, tx: &RequestContext, edited: Child) -> DomainResult<Child> {
        let mut child = self.children.get_by_id(tx, edited.id).await?;
        if edited.parent_id != child.parent_id {
            return Err(DomainError::validation("parentId cannot be changed by update"));
        }
        child.first_name = edited.first_name;
        child.last_name = edited.last_name;
        child.birth_date = edited.birth_date;
        child.validate()?;
        child.touch();
        self.children.update(tx, &child).await?;

        let Some(parent_id) = child.parent_id else {
            return Ok(child);
        };
        match self.parents.get_by_id(tx, parent_id).await {
            Ok(mut parent) => {
                parent.upsert_child(child.clone());
                parent.touch();
                self.parents.update(tx, &parent).await?;
                Ok(child)
            }
            Err(e) if e.is_not_found() => Ok(child),
            Err(e) => Err(e),
        }
    }

    async fn delete_child_tx(&self, tx: &RequestContext, id: Uuid) -> DomainResult<()> {
        let child = self.children.get_by_id(tx, id).await?;
        self.children.delete(tx, id).await?;
        if let Some(parent_id) = child.parent_id {
            self.detach_snapshot(tx, parent_id, id).await?;
        }
        Ok(())
    }

    async fn add_child_tx(
        &self,
        tx: &RequestContext,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> DomainResult<Parent> {
        let mut parent = self.parents.get_by_id(tx, parent_id).await?;
        let mut child = self.children.get_by_id(tx, child_id).await?;

        if child.parent_id == Some(parent_id) && parent.has_child(child_id) {
            return Err(DomainError::validation(format!(
                "child {} already belongs to parent {}",
                child_id, parent_id
            )));
        }
        if let Some(previous) = child.parent_id
            && previous != parent_id
        {
            self.detach_snapshot(tx, previous, child_id).await?;
        }

        child.parent_id = Some(parent_id);
        child.touch();
        self.children.update(tx, &child).await?;

        parent.upsert_child(child);
        parent.touch();
        self.parents.update(tx, &parent).await?;
        Ok(parent)
    }

    async fn remove_child_tx(
        &self,
        tx: &RequestContext,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> DomainResult<Parent> {
        let mut parent = self.parents.get_by_id(tx, parent_id).await?;
        let mut child = self.children.get_by_id(tx, child_id).await?;

        if child.parent_id != Some(parent_id) && !parent.has_child(child_id) {
            return Err(DomainError::not_found(
                "child",
                format!("{} in parent {}", child_id, parent_id),
            ));
        }

        child.parent_id = None;
        child.touch();
        self.children.update(tx, &child).await?;

        parent.remove_child(child_id);
        parent.touch();
        self.parents.update(tx, &parent).await?;
        Ok(parent)
    }
}

#[async_trait]
impl FamilyService for FamilyServiceImpl {
    async fn create_parent(
        &self,
        ctx: &RequestContext,
        first_name: &str,
        last_name: &str,
        email: &str,
        birth_date: &str,
    ) -> DomainResult<Parent> {
        ctx.ensure_active()?;
        let birth_date = parse_birth_date(birth_date)?;
        let parent = Parent::new(new_id(), first_name, last_name, email, birth_date)?;
        self.parents.create(ctx, &parent).await?;

        tracing::info!(
            request_id = %ctx.request_id(),
            parent_id = %parent.id,
            "Created parent: {}",
            parent.full_name()
        );
        Ok(parent)
    }

    async fn get_parent_by_id(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<Parent> {
        tracing::debug!(parent_id = %id, "Fetching parent");
        self.parents.get_by_id(ctx, id).await
    }

    async fn update_parent(&self, ctx: &RequestContext, parent: Parent) -> DomainResult<Parent> {
        ctx.ensure_active()?;
        let tx = self.transactions.begin(ctx).await?;
        let result = self.update_parent_tx(&tx, parent).await;
        let parent = self.finish(&tx, result).await?;

        tracing::info!(request_id = %ctx.request_id(), parent_id = %parent.id, "Updated parent");
        Ok(parent)
    }

    async fn delete_parent(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<()> {
        self.parents.delete(ctx, id).await?;
        // Children keep their parent id; report how many are left pointing here.
        let remaining = self
            .children
            .count_by_parent_id(ctx, id, &FilterOptions::default())
            .await?;
        tracing::info!(
            request_id = %ctx.request_id(),
            parent_id = %id,
            remaining_children = remaining,
            "Deleted parent"
        );
        Ok(())
    }

    async fn list_parents(
        &self,
        ctx: &RequestContext,
        options: QueryOptions,
    ) -> DomainResult<(Vec<Parent>, PagedResult)> {
        tracing::debug!(?options, "Listing parents");
        self.parents.list(ctx, &options).await
    }

    async fn count_parents(
        &self,
        ctx: &RequestContext,
        filter: FilterOptions,
    ) -> DomainResult<usize> {
        self.parents.count(ctx, &filter).await
    }

    async fn create_child(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        first_name: &str,
        last_name: &str,
        birth_date: &str,
    ) -> DomainResult<Child> {
        ctx.ensure_active()?;
        let birth_date = parse_birth_date(birth_date)?;

        let tx = self.transactions.begin(ctx).await?;
        let result = self
            .create_child_tx(&tx, parent_id, first_name, last_name, birth_date)
            .await;
        let child = self.finish(&tx, result).await?;

        tracing::info!(
            request_id = %ctx.request_id(),
            child_id = %child.id,
            parent_id = %parent_id,
            "Created child: {}",
            child.full_name()
        );
        Ok(child)
    }

    async fn get_child_by_id(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<Child> {
        tracing::debug!(child_id = %id, "Fetching child");
        self.children.get_by_id(ctx, id).await
    }

    async fn update_child(&self, ctx: &RequestContext, child: Child) -> DomainResult<Child> {
        ctx.ensure_active()?;
        let tx = self.transactions.begin(ctx).await?;
        let result = self.update_child_tx(&tx, child).await;
        let child = self.finish(&tx, result).await?;

        tracing::info!(request_id = %ctx.request_id(), child_id = %child.id, "Updated child");
        Ok(child)
    }

    async fn delete_child(&self, ctx: &RequestContext, id: Uuid) -> DomainResult<()> {
        let tx = self.transactions.begin(ctx).await?;
        let result = self.delete_child_tx(&tx, id).await;
        self.finish(&tx, result).await?;

        tracing::info!(request_id = %ctx.request_id(), child_id = %id, "Deleted child");
        Ok(())
    }

    async fn list_children(
        &self,
        ctx: &RequestContext,
        options: QueryOptions,
    ) -> DomainResult<(Vec<Child>, PagedResult)> {
        tracing::debug!(?options, "Listing children");
        self.children.list(ctx, &options).await
    }

    async fn list_children_by_parent_id(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        options: QueryOptions,
    ) -> DomainResult<(Vec<Child>, PagedResult)> {
        // Fails with not-found for unknown or deleted parents.
        self.parents.get_by_id(ctx, parent_id).await?;
        self.children.list_by_parent_id(ctx, parent_id, &options).await
    }

    async fn count_children(
        &self,
        ctx: &RequestContext,
        filter: FilterOptions,
    ) -> DomainResult<usize> {
        self.children.count(ctx, &filter).await
    }

    async fn add_child_to_parent(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> DomainResult<Parent> {
        let tx = self.transactions.begin(ctx).await?;
        let result = self.add_child_tx(&tx, parent_id, child_id).await;
        let parent = self.finish(&tx, result).await?;

        tracing::info!(
            request_id = %ctx.request_id(),
            parent_id = %parent_id,
            child_id = %child_id,
            "Added child to parent"
        );
        Ok(parent)
    }

    async fn remove_child_from_parent(
        &self,
        ctx: &RequestContext,
        parent_id: Uuid,
        child_id: Uuid,
    ) -> DomainResult<Parent> {
        let tx = self.transactions.begin(ctx).await?;
        let result = self.remove_child_tx(&tx, parent_id, child_id).await;
        let parent = self.finish(&tx, result).await?;

        tracing::info!(
            request_id = %ctx.request_id(),
            parent_id = %parent_id,
            child_id = %child_id,
            "Removed child from parent"
        );
        Ok(parent)
    }
}
