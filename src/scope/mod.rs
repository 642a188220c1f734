//! Scope Tree - Lexical name binding model
//!
//! One walk over the syntax tree produces an arena of scopes and bindings.
//! Name resolution, reference finding and conflict checks all query it.

pub mod tree;
pub mod builder;
pub mod resolver;
pub mod references;

pub use tree::{Scope, ScopeId, ScopeKind, ScopeTree};
pub use builder::ScopeBuilder;
pub use resolver::NameResolver;
