use super::prelude::*;

#[derive(Default)]
pub struct ChildMutations;

#[Object]
impl ChildMutations {
    /// Create a new child under an existing parent
    async fn create_child(
        &self,
        ctx: &Context<'_>,
        input: CreateChildInput,
    ) -> Result<Option<ChildObject>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "child:create", "create child").await?;
        let parent_id = decode_id(&input.parent_id, "parent")?;

        let child = family(ctx)?
            .create_child(
                req,
                parent_id,
                &input.first_name,
                &input.last_name,
                &input.birth_date,
            )
            .await
            .map_err(failed("create child"))?;

        Ok(Some(child.into()))
    }

    /// Update a child. Only the fields present in `input` change.
    async fn update_child(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: UpdateChildInput,
    ) -> Result<Option<ChildObject>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "child:update", "update child").await?;
        let child_id = decode_id(&id, "child")?;
        let service = family(ctx)?;

        let mut child = service
            .get_child_by_id(req, child_id)
            .await
            .map_err(failed("get child"))?;
        input.apply_to(&mut child).map_err(failed("update child"))?;

        let updated = service
            .update_child(req, child)
            .await
            .map_err(failed("update child"))?;

        Ok(Some(updated.into()))
    }

    /// Soft-delete a child
    async fn delete_child(&self, ctx: &Context<'_>, id: String) -> Result<Option<bool>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "child:delete", "delete child").await?;
        let child_id = decode_id(&id, "child")?;

        family(ctx)?
            .delete_child(req, child_id)
            .await
            .map_err(failed("delete child"))?;

        Ok(Some(true))
    }
}
