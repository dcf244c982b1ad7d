pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod error;

pub use types::*;
pub use error::QueryError;
pub use filter::ListQuery;
pub use filter_order::{build_sort, SORT_PARAM};
pub use filter_where::build_filter;
