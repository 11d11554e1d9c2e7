//! Sema - semantic middle-end for a namespace-based object language
//!
//! This library takes validated syntax trees, one per compilation unit, and
//! computes scopes, symbol bindings, value references, a canonical alias-free clone of each
//! tree and its normalized union/intersection types, collecting every
//! diagnostic along the way.
//!
//! ## Architecture
//!
//! The library is organized into:
//! - **AST** (`ast/`): Node types, ids and the tree builder
//! - **Context** (`context.rs`): Per-node attribute store (spans, origins)
//! - **Traversal** (`visit.rs`, `relatives.rs`): Node enumeration, parent and sibling index
//! - **Symbols** (`symbols/`): Scoped symbol table, host types and type loaders
//! - **Passes** (`passes/`): Scope assignment, discovery, type and value name checking, qualifying, flattening
//! - **Driver** (`driver/`): Sessions running the passes over units
//! - **Common** (`common/`): Shared infrastructure (errors, diagnostics, spans)

pub mod ast;
pub mod common;
pub mod context;
pub mod driver;
pub mod passes;
pub mod relatives;
pub mod symbols;
pub mod validated;
pub mod visit;

// Re-exports for convenience
pub use ast::{AstBuilder, Node, NodeIdGenerator, Root};
pub use common::{Diagnostic, DiagnosticKind, DiagnosticReporter, SemaError, SemaResult, Span};
pub use context::{Context, ContextKey};
pub use driver::{Analysis, SemaConfig, Session, SourceTypeLoader, TreeProvider};
pub use relatives::Relatives;
pub use symbols::{HostType, HostTypeRegistry, HostTypes, NoLoader, Symbol, SymbolTable, TypeLoader};
pub use validated::Validated;
