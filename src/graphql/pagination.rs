//! Connection types for paged list queries.
//!
//! Lists come back from the family service as a flat page plus a
//! [PagedResult]; [Connection::from_paged] reshapes that into edges with
//! opaque per-node cursors and a [PageInfo].
//!
//! Usage: Use the `define_connection!` macro to create type-specific connections.

use async_graphql::SimpleObject;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

use crate::domain::PagedResult;

/// Information about pagination in a connection
#[derive(SimpleObject, Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    /// When paginating forwards, are there more items?
    pub has_next_page: bool,
    /// When paginating backwards, are there more items?
    pub has_previous_page: bool,
    /// Cursor of the first item in this page
    pub start_cursor: Option<String>,
    /// Cursor of the last item in this page
    pub end_cursor: Option<String>,
}

/// An edge in a connection, containing a node and cursor (internal use)
#[derive(Debug, Clone)]
pub struct Edge<T> {
    pub node: T,
    pub cursor: String,
}

/// A paginated connection result (internal use)
#[derive(Debug, Clone)]
pub struct Connection<T> {
    pub edges: Vec<Edge<T>>,
    pub page_info: PageInfo,
    pub total_count: i64,
}

/// Macro to define a GraphQL connection type for a specific node
///
/// Usage:
/// ```ignore
/// define_connection!(ParentConnection, ParentEdge, ParentObject);
/// ```
#[macro_export]
macro_rules! define_connection {
    ($conn_name:ident, $edge_name:ident, $node_type:ty) => {
        /// Edge containing a node and cursor
        #[derive(async_graphql::SimpleObject, Debug, Clone)]
        pub struct $edge_name {
            /// The item at the end of the edge
            pub node: $node_type,
            /// A cursor for pagination
            pub cursor: String,
        }

        /// Connection containing edges and page info
        #[derive(async_graphql::SimpleObject, Debug, Clone)]
        pub struct $conn_name {
            /// The edges in this connection
            pub edges: Vec<$edge_name>,
            /// Pagination information
            pub page_info: $crate::graphql::pagination::PageInfo,
            /// Total number of matching items across all pages
            pub total_count: i64,
        }

        impl $conn_name {
            /// Create from a generic Connection, converting each node
            pub fn from_connection<S>(conn: $crate::graphql::pagination::Connection<S>) -> Self
            where
                $node_type: From<S>,
            {
                Self {
                    edges: conn
                        .edges
                        .into_iter()
                        .map(|e| $edge_name {
                            node: <$node_type>::from(e.node),
                            cursor: e.cursor,
                        })
                        .collect(),
                    page_info: conn.page_info,
                    total_count: conn.total_count,
                }
            }
        }
    };
}

impl<T> Connection<T> {
    /// Shape one page of items into a connection.
    ///
    /// `hasNextPage` mirrors `paged.has_next`; `hasPreviousPage` is true for
    /// any page after the first. Cursors encode each node's absolute offset.
    pub fn from_paged(items: Vec<T>, paged: &PagedResult) -> Self {
        let offset = paged.page as i64 * paged.page_size as i64;

        let edges: Vec<Edge<T>> = items
            .into_iter()
            .enumerate()
            .map(|(i, node)| Edge {
                cursor: encode_cursor(offset + i as i64),
                node,
            })
            .collect();

        let page_info = PageInfo {
            has_next_page: paged.has_next,
            has_previous_page: paged.page > 0,
            start_cursor: edges.first().map(|e| e.cursor.clone()),
            end_cursor: edges.last().map(|e| e.cursor.clone()),
        };

        Self {
            edges,
            page_info,
            total_count: paged.total_count as i64,
        }
    }
}

/// Encode an offset as a cursor string
pub fn encode_cursor(offset: i64) -> String {
    BASE64.encode(format!("cursor:{}", offset))
}
