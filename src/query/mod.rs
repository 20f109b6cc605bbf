//! # Query Parameter Translator
//!
//! Turns raw URL query parameters into a composed, request-scoped
//! query directive set: filter predicate, sort key chain, field
//! projection, and page/limit pair.

mod filter;
mod options;

pub use filter::{compare_values, FilterExpr, FilterOperator, FilterSet};
pub use options::{
    sort_documents, QueryOptions, SortKey, DEFAULT_LIMIT, DEFAULT_PAGE, RESERVED_KEYS,
};
