use super::prelude::*;

#[derive(Default)]
pub struct ChildQueries;

#[Object]
impl ChildQueries {
    /// Get a child by ID
    async fn child(&self, ctx: &Context<'_>, id: String) -> Result<Option<ChildObject>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "child:read", "read child").await?;
        let child_id = decode_id(&id, "child")?;

        let child = family(ctx)?
            .get_child_by_id(req, child_id)
            .await
            .map_err(failed("get child"))?;

        Ok(Some(child.into()))
    }

    /// List children with optional filtering, pagination and sorting
    async fn children(
        &self,
        ctx: &Context<'_>,
        filter: Option<ChildFilter>,
        pagination: Option<PaginationInput>,
        sort: Option<SortInput>,
    ) -> Result<Option<ChildConnection>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "child:list", "list children").await?;

        let options = to_query_options(filter, pagination, sort);
        let (children, paged) = family(ctx)?
            .list_children(req, options)
            .await
            .map_err(failed("list children"))?;

        Ok(Some(ChildConnection::from_connection(
            Connection::from_paged(children, &paged),
        )))
    }

    /// List the children of one parent
    async fn children_by_parent(
        &self,
        ctx: &Context<'_>,
        parent_id: String,
        filter: Option<ChildFilter>,
        pagination: Option<PaginationInput>,
        sort: Option<SortInput>,
    ) -> Result<Option<ChildConnection>> {
        let req = ctx.request_context()?;
        authorize(ctx, req, "child:list", "list children").await?;
        let parent_id = decode_id(&parent_id, "parent")?;

        let options = to_query_options(filter, pagination, sort);
        let (children, paged) = family(ctx)?
            .list_children_by_parent_id(req, parent_id, options)
            .await
            .map_err(failed("list children"))?;

        Ok(Some(ChildConnection::from_connection(
            Connection::from_paged(children, &paged),
        )))
    }
}
