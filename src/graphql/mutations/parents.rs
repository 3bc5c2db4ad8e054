use super::prelude::*;

#[derive(Default)]
pub struct ParentMutations;

#[Object]
impl ParentMutations {
    /// Create a new parent
    async fn create_parent(
        &self,
        ctx: &Context<'_>,
        input: CreateParentInput,
    ) -> Result<Option<ParentObject>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "parent:create", "create parent").await?;

        let parent = family(ctx)?
            .create_parent(
                req,
                &input.first_name,
                &input.last_name,
                &input.email,
                &input.birth_date,
            )
            .await
            .map_err(failed("create parent"))?;

        Ok(Some(parent.into()))
    }

    /// Update a parent. Only the fields present in `input` change.
    async fn update_parent(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdateParentInput,
    ) -> Result<Option<ParentObject>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "parent:update", "update parent").await?;
        let parent_id = decode_id(&id, "parent")?;
        let service = family(ctx)?;

        let mut parent = service
            .get_parent_by_id(req, parent_id)
            .await
            .map_err(failed("get parent"))?;
        input
            .apply_to(&mut parent)
            .map_err(failed("update parent"))?;

        let updated = service
            .update_parent(req, parent)
            .await
            .map_err(failed("update parent"))?;

        Ok(Some(updated.into()))
    }

    /// Soft-delete a parent
    async fn delete_parent(&self, ctx: &Context<'_>, id: String) -> Result<Option<bool>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "parent:delete", "delete parent").await?;
        let parent_id = decode_id(&id, "parent")?;

        family(ctx)?
            .delete_parent(req, parent_id)
            .await
            .map_err(failed("delete parent"))?;

        Ok(Some(true))
    }

    /// Attach a child to a parent, moving it from any previous parent
    async fn add_child_to_parent(
        &self,
        ctx: &Context<'_>,
        parent_id: String,
        child_id: String,
    ) -> Result<Option<bool>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "parent:update", "update parent").await?;
        let parent_id = decode_id(&parent_id, "parent")?;
        let child_id = decode_id(&child_id, "child")?;

        family(ctx)?
            .add_child_to_parent(req, parent_id, child_id)
            .await
            .map_err(failed("add child to parent"))?;

        Ok(Some(true))
    }

    /// Detach a child from a parent
    async fn remove_child_from_parent(
        &self,
        ctx: &Context<'_>,
        parent_id: String,
        child_id: String,
    ) -> Result<Option<bool>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "parent:update", "update parent").await?;
        let parent_id = decode_id(&parent_id, "parent")?;
        let child_id = decode_id(&child_id, "child")?;

        family(ctx)?
            .remove_child_from_parent(req, parent_id, child_id)
            .await
            .map_err(failed("remove child from parent"))?;

        Ok(Some(true))
    }
}
