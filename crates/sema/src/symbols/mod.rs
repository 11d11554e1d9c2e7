//! Symbol environment
//!
//! - [`SymbolTable`]: arena of named scopes with nearest-scope-wins lookup
//! - [`Symbol`]: what a name is bound to
//! - [`HostTypes`] / [`TypeLoader`]: injected sources of foreign and
//!   cross-unit types

mod host;
mod loader;
mod name;
mod symbol;
mod table;

pub use host::{BUILTIN_NAMESPACE, HostType, HostTypeRegistry, HostTypes, seed_builtins};
pub use loader::{HostTypeLoader, LoaderChain, NoLoader, TypeLoader};
pub use name::QualifiedName;
pub use symbol::Symbol;
pub use table::SymbolTable;

pub use crate::common::ScopeId;
