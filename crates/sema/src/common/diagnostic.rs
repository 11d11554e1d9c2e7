//! User-facing diagnostics and their rendering

use std::fmt;

use codespan_reporting::diagnostic::{Diagnostic as CodespanDiagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{Buffer, ColorChoice, StandardStream};

use super::{NodeId, Span};
use crate::context::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    SymbolNotFound,
    SymbolAlreadyDefined,
    AliasCycle,
}

impl DiagnosticKind {
    pub fn title(self) -> &'static str {
        match self {
            DiagnosticKind::SymbolNotFound => "Unresolved symbol",
            DiagnosticKind::SymbolAlreadyDefined => "Duplicate symbol",
            DiagnosticKind::AliasCycle => "Alias cycle",
        }
    }
}

/// An accumulated, non-fatal semantic error attached to the node it was
/// raised on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub kind: DiagnosticKind,
    pub node: NodeId,
    pub span: Option<Span>,
}

impl Diagnostic {
    fn new(kind: DiagnosticKind, message: String, at: &Context) -> Self {
        Self {
            message,
            kind,
            node: at.node(),
            span: at.get::<Span>().copied(),
        }
    }

    pub fn symbol_not_found(name: &str, at: &Context) -> Self {
        Self::new(
            DiagnosticKind::SymbolNotFound,
            format!("symbol not found: {name}"),
            at,
        )
    }

    pub fn symbol_already_defined(name: &str, at: &Context) -> Self {
        Self::new(
            DiagnosticKind::SymbolAlreadyDefined,
            format!("symbol already defined: {name}"),
            at,
        )
    }

    pub fn alias_cycle(name: &str, at: &Context) -> Self {
        Self::new(
            DiagnosticKind::AliasCycle,
            format!("alias cycle: {name}"),
            at,
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    fn to_codespan(file_id: usize, diagnostic: &Diagnostic) -> CodespanDiagnostic<usize> {
        let report = CodespanDiagnostic::error().with_message(diagnostic.kind.title());
        match diagnostic.span {
            Some(span) => report.with_labels(vec![
                Label::primary(file_id, span.start..span.end).with_message(&diagnostic.message),
            ]),
            None => report.with_notes(vec![format!(
                "{} (node {})",
                diagnostic.message, diagnostic.node
            )]),
        }
    }

    pub fn report(&self, file_id: usize, diagnostic: &Diagnostic) {
        let report = Self::to_codespan(file_id, diagnostic);
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &report);
    }

    pub fn report_all(&self, file_id: usize, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.report(file_id, diagnostic);
        }
    }

    /// Render diagnostics without colors, e.g. for snapshots and logs
    pub fn render(&self, file_id: usize, diagnostics: &[Diagnostic]) -> String {
        let mut buffer = Buffer::no_color();
        for diagnostic in diagnostics {
            let report = Self::to_codespan(file_id, diagnostic);
            let _ = term::emit(&mut buffer, &self.config, &self.files, &report);
        }
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}
