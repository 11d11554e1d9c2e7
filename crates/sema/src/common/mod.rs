//! Shared infrastructure: ids, spans, structural errors and user diagnostics

mod diagnostic;
mod error;
mod ids;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticReporter};
pub use error::{SemaError, SemaResult};
pub use ids::{NodeId, ScopeId};
pub use span::Span;
