pub mod children;
pub mod parents;

pub use children::ChildQueries;
pub use parents::ParentQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, Object, Result};

    pub(crate) use crate::graphql::auth::{RequestContextExt, authorize};
    pub(crate) use crate::graphql::filters::*;
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::pagination::Connection;
    pub(crate) use crate::graphql::types::*;
}
