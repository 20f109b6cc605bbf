//! tourbase - a self-hostable tour catalog REST API
//!
//! CRUD endpoints over a document collection, query-string-driven
//! filtering/sorting/projection/pagination, two fixed aggregation
//! reports, and a bulk fixture loader.

pub mod cli;
pub mod config;
pub mod http;
pub mod model;
pub mod pipeline;
pub mod query;
pub mod reports;
pub mod store;
