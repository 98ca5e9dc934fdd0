//! Application layer - discussion operations and the query surface.
//!
//! Both are built per request over a unit of work opened by the transport
//! adapter.

mod discussion_logic;
mod query_resolver;

pub use discussion_logic::DiscussionLogic;
pub use query_resolver::{
    parse_selection, DiscussionQueryResolver, Field, Query, QueryDocument, QueryError,
    QueryErrorMessage, QueryResponse,
};
