use super::prelude::*;

#[derive(Default)]
pub struct ParentQueries;

#[Object]
impl ParentQueries {
    /// Get a parent by ID
    async fn parent(&self, ctx: &Context<'_>, id: String) -> Result<Option<ParentObject>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "parent:read", "read parent").await?;
        let parent_id = decode_id(&id, "parent")?;

        let parent = family(ctx)?
            .get_parent_by_id(req, parent_id)
            .await
            .map_err(failed("get parent"))?;

        Ok(Some(parent.into()))
    }

    /// List parents with optional filtering, pagination and sorting
    async fn parents(
        &self,
        ctx: &Context<'_>,
        filter: Option<ParentFilter>,
        pagination: Option<PaginationInput>,
        sort: Option<SortInput>,
    ) -> Result<Option<ParentConnection>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "parent:list", "list parents").await?;

        let options = to_query_options(filter, pagination, sort);
        let (parents, paged) = family(ctx)?
            .list_parents(req, options)
            .await
            .map_err(failed("list parents"))?;

        Ok(Some(ParentConnection::from_connection(
            Connection::from_paged(parents, &paged),
        )))
    }
}
