//! Refactoring commands
//!
//! Each command takes a syntax tree snapshot and a selection and returns an
//! [`EditPlan`](crate::edit::EditPlan). Nothing is written until the caller
//! applies the plan.

pub mod naming;
pub mod rename;
pub mod extract;
pub mod inline;

pub use naming::{unique_name, validate_name};
pub use rename::rename;
pub use extract::{extract_variable, DeclarationKeyword, ExtractOptions};
pub use inline::inline_variable;
