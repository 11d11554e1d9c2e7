//! Semantic passes
//!
//! Run order, each pass taking the results of the previous ones:
//! 1. [`scopes`]: a scope for every node
//! 2. [`discovery`]: `use` imports and declared types bound into scopes
//! 3. [`check`]: discovery plus unresolved type reference diagnostics
//! 4. [`names`]: value names bound and value references resolved
//! 5. [`qualify`]: every type reference rewritten to its canonical name
//! 6. [`flatten`]: nested unions and intersections normalized

pub mod check;
pub mod discovery;
pub mod flatten;
pub mod names;
pub mod qualify;
mod rewrite;
pub mod scopes;

pub use check::Checker;
pub use discovery::Discovery;
pub use flatten::Flattener;
pub use names::{NameChecker, References};
pub use qualify::Qualifier;
pub use rewrite::Rewrite;
pub use scopes::{ScopeAssignment, Scopes, namespace_scope};
