//! LLM response-log data model and upload validation
//!
//! Parses `{ "responses": [...] }` documents through a three-stage gate
//! (extension, JSON syntax, schema shape) and derives the chart/table
//! projections the dashboard renders.

pub mod schema;
pub mod validator;
pub mod view;

pub use schema::*;
pub use validator::*;
pub use view::*;
