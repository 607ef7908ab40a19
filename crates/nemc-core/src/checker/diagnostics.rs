//! Publish/subscribe diagnostics bus.
//!
//! Every checker/evaluator/matcher failure is turned into a [`Diagnostic`]
//! instead of bubbling up as a bare `Result` error, so a single compilation
//! run can surface more than one problem. Severity, highlight spans (a
//! primary span plus any number of secondary ones, the secondary set only
//! rendered in "light" display mode), free-form notes and fix-it
//! suggestions all mirror the teacher's original diagnostic model.

use crate::lexer::Span;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HighlightMode {
    /// Render the full source window around the span.
    Heavy,
    /// Render only the span itself, no surrounding context.
    Light,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Highlight {
    pub span: Span,
    pub label: String,
    pub mode: HighlightMode,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Note {
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FixitAction {
    Replace,
    Insert,
    Remove,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fixit {
    pub action: FixitAction,
    pub range: Span,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub primary: Highlight,
    pub secondary: Vec<Highlight>,
    pub notes: Vec<Note>,
    pub fixits: Vec<Fixit>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            primary: Highlight {
                span,
                label: String::new(),
                mode: HighlightMode::Heavy,
            },
            secondary: vec![],
            notes: vec![],
            fixits: vec![],
        }
    }

    pub fn with_note(mut self, message: impl Into<String>) -> Self {
        self.notes.push(Note {
            message: message.into(),
        });
        self
    }

    pub fn with_secondary(mut self, span: Span, label: impl Into<String>) -> Self {
        self.secondary.push(Highlight {
            span,
            label: label.into(),
            mode: HighlightMode::Light,
        });
        self
    }

    pub fn with_fixit(mut self, action: FixitAction, range: Span, text: impl Into<String>) -> Self {
        self.fixits.push(Fixit {
            action,
            range,
            text: text.into(),
        });
        self
    }

    /// Render using the same colourised span-context renderer the lexer
    /// already uses for its own errors, so diagnostics look identical
    /// regardless of which stage produced them.
    pub fn render(&self) -> String {
        self.primary.span.to_string(self.message.clone())
    }
}

pub trait DiagnosticSubscriber {
    fn on_diagnostic(&mut self, diagnostic: &Diagnostic);
}

/// Prints every published diagnostic to stderr via its renderer; the
/// default (and, for the CLI, only) subscriber.
#[derive(Default)]
pub struct StderrSubscriber;

impl DiagnosticSubscriber for StderrSubscriber {
    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        eprintln!("{}", diagnostic.render());
        for note in &diagnostic.notes {
            eprintln!("  note: {}", note.message);
        }
    }
}

/// Synchronous ordered publish/subscribe bus. Diagnostics are delivered to
/// subscribers in publish order and also retained so a caller can collect
/// everything raised during a single compilation run (used by `--ast`
/// dumps and the test harness to assert on diagnostic counts).
#[derive(Default)]
pub struct DiagnosticBus {
    subscribers: Vec<Box<dyn DiagnosticSubscriber>>,
    published: Vec<Diagnostic>,
}

impl DiagnosticBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn DiagnosticSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn publish(&mut self, diagnostic: Diagnostic) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber.on_diagnostic(&diagnostic);
        }
        self.published.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.published.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn published(&self) -> &[Diagnostic] {
        &self.published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter(usize);

    impl DiagnosticSubscriber for Counter {
        fn on_diagnostic(&mut self, _diagnostic: &Diagnostic) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_publish_ordering_and_retention() {
        let mut bus = DiagnosticBus::new();
        bus.publish(Diagnostic::error("first", Span::default()));
        bus.publish(Diagnostic::error("second", Span::default()));
        assert_eq!(bus.published().len(), 2);
        assert_eq!(bus.published()[0].message, "first");
        assert!(bus.has_errors());
    }

    #[test]
    fn test_no_errors_for_warnings_only() {
        let mut bus = DiagnosticBus::new();
        let mut warning = Diagnostic::error("careful", Span::default());
        warning.severity = Severity::Warning;
        bus.publish(warning);
        assert!(!bus.has_errors());
    }
}
