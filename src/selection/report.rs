//! Outcome reports for the host's status display.

use std::fmt;

use super::Selection;
use crate::mesh::MeshIndex;

/// Severity of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportLevel {
    /// The operation did what was asked.
    Info,
    /// The operation declined or could only partially do what was asked.
    Warning,
}

/// A short, user-facing description of what an operation did or why it did
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Severity.
    pub level: ReportLevel,
    /// The message, never empty.
    pub message: String,
}

impl Report {
    /// An informational report.
    pub fn info<S: Into<String>>(message: S) -> Self {
        Self::new(ReportLevel::Info, message)
    }

    /// A warning report.
    pub fn warning<S: Into<String>>(message: S) -> Self {
        Self::new(ReportLevel::Warning, message)
    }

    fn new<S: Into<String>>(level: ReportLevel, message: S) -> Self {
        let message = message.into();
        debug_assert!(!message.is_empty(), "reports must say something");
        Self { level, message }
    }

    /// Returns true for warnings.
    #[inline]
    pub fn is_warning(&self) -> bool {
        self.level == ReportLevel::Warning
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            ReportLevel::Info => write!(f, "{}", self.message),
            ReportLevel::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// The result of an operation: the selection the host should apply and a
/// report describing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<I: MeshIndex = u32> {
    /// The new selection, in the same mode as the input.
    pub selection: Selection<I>,
    /// What happened.
    pub report: Report,
}

impl<I: MeshIndex> Outcome<I> {
    /// An outcome that applied a change.
    pub fn finished<S: Into<String>>(selection: Selection<I>, message: S) -> Self {
        Self {
            selection,
            report: Report::info(message),
        }
    }

    /// An outcome that declined; `selection` is normally the unchanged input.
    pub fn declined<S: Into<String>>(selection: Selection<I>, message: S) -> Self {
        Self {
            selection,
            report: Report::warning(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Report::info("Grew face selection").to_string(), "Grew face selection");
        assert_eq!(
            Report::warning("No vertices selected").to_string(),
            "warning: No vertices selected"
        );
        assert!(Report::warning("x").is_warning());
    }
}
