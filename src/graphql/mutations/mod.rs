pub mod children;
pub mod parents;

pub use children::ChildMutations;
pub use parents::ParentMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, Object, Result};

    pub(crate) use crate::graphql::auth::{RequestContextExt, authorize};
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::types::*;
}
