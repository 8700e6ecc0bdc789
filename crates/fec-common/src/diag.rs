//! Diagnostic sink (spec.md sec 6 "Diagnostics flow", sec 7 "Error handling
//! design").
//!
//! The sink is the one seam every phase writes through. Its *contract* is
//! part of this crate; an authoritative pretty-printer (source-line
//! rendering, terminal coloring) is an external collaborator per spec.md --
//! `DiagnosticBag::render` below is a convenience default, not that
//! collaborator.

use std::fmt;

use serde::Serialize;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Note,
    Warning,
    Error,
    /// A programmer invariant violation (spec.md sec 7: "A `bug` is a
    /// programmer invariant violation; it aborts the phase with a trace").
    Bug,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    /// Numeric class code, e.g. `E0000`. Empty for notes and bugs, which
    /// spec.md does not assign codes to.
    pub code: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code.is_empty() {
            write!(f, "{:?} at {}: {}", self.severity, self.span, self.message)
        } else {
            write!(
                f,
                "{:?}[{}] at {}: {}",
                self.severity, self.code, self.span, self.message
            )
        }
    }
}

/// The four operations spec.md sec 6 assigns to the diagnostic sink.
///
/// `bug` never returns: per spec.md sec 7, a bug aborts the current phase
/// with a trace. Everything else records and lets the caller decide whether
/// to keep going (a `warning` always lets execution continue; an `error`,
/// per the propagation policy, ends the phase once the caller notices it --
/// this trait does not itself unwind, since non-goals exclude error-recovery
/// accumulation but the *decision* to stop still belongs to the phase, not
/// the sink).
pub trait Sink {
    fn bug(&mut self, span: Span, msg: impl Into<String>) -> !;
    fn error(&mut self, span: Span, code: &str, msg: impl Into<String>);
    fn warning(&mut self, span: Span, code: &str, msg: impl Into<String>);
    fn note(&mut self, span: Span, msg: impl Into<String>);

    /// Whether any `error` has fired so far -- the process exit code
    /// (external, spec.md sec 6) derives from this.
    fn has_errors(&self) -> bool;
}

/// An in-memory `Sink` that collects every diagnostic instead of rendering
/// immediately. Used by the driver and by tests; also what a `bug()` panics
/// through, so the panic payload still carries the recorded diagnostic.
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    pub diagnostics: Vec<Diagnostic>,
    error_count: usize,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error)
    }

    /// A convenience, non-authoritative source-line renderer built on
    /// `ariadne`, mirroring the teacher's `mesh-typeck::diagnostics` module.
    /// `file_name`/`source` describe the single file the bag's spans refer
    /// to; multi-file rendering is the external driver's job.
    pub fn render(&self, file_name: &str, source: &str) -> String {
        use ariadne::{Label, Report, ReportKind, Source};

        let mut out = Vec::new();
        for d in &self.diagnostics {
            let kind = match d.severity {
                Severity::Bug | Severity::Error => ReportKind::Error,
                Severity::Warning => ReportKind::Warning,
                Severity::Note => ReportKind::Advice,
            };
            let start = d.span.start_col.saturating_sub(1) as usize;
            let end = (d.span.end_col.saturating_sub(1) as usize).max(start + 1);
            let mut buf = Vec::new();
            let _ = Report::build(kind, file_name, start)
                .with_message(&d.message)
                .with_label(Label::new((file_name, start..end)).with_message(&d.message))
                .finish()
                .write((file_name, Source::from(source)), &mut buf);
            out.extend(buf);
        }
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl Sink for DiagnosticBag {
    fn bug(&mut self, span: Span, msg: impl Into<String>) -> ! {
        let message = msg.into();
        self.diagnostics.push(Diagnostic {
            severity: Severity::Bug,
            span,
            code: String::new(),
            message: message.clone(),
        });
        panic!("compiler bug at {span}: {message}");
    }

    fn error(&mut self, span: Span, code: &str, msg: impl Into<String>) {
        self.error_count += 1;
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            span,
            code: code.to_string(),
            message: msg.into(),
        });
    }

    fn warning(&mut self, span: Span, code: &str, msg: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            span,
            code: code.to_string(),
            message: msg.into(),
        });
    }

    fn note(&mut self, span: Span, msg: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Note,
            span,
            code: String::new(),
            message: msg.into(),
        });
    }

    fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::FileId;

    #[test]
    fn bag_counts_errors_but_not_warnings() {
        let mut bag = DiagnosticBag::new();
        bag.warning(Span::point(FileId::ROOT, 1, 1), "W0001", "unused");
        bag.error(Span::point(FileId::ROOT, 2, 1), "E0000", "type mismatch");
        assert!(bag.has_errors());
        assert_eq!(bag.errors().count(), 1);
        assert_eq!(bag.diagnostics.len(), 2);
    }

    #[test]
    #[should_panic(expected = "compiler bug")]
    fn bug_panics() {
        let mut bag = DiagnosticBag::new();
        bag.bug(Span::point(FileId::ROOT, 1, 1), "unbound path reached lowering");
    }
}
