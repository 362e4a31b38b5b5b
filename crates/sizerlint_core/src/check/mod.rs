//! Advisory diagnostic channel for check findings.
//!
//! # Responsibility
//! - Collect human-readable findings in discovery order.
//! - Render the stable `Object <class> at line <n>: <message>` format.
//!
//! # Invariants
//! - Findings are append-only: no deduplication, no severity ranking.
//! - Reporting never alters control flow; fatal conditions use errors.

pub mod sizer;

use crate::model::object::Object;
use std::fmt::{Display, Formatter};

pub use sizer::{check_object, check_project, CheckError, CheckResult};

/// One advisory finding.
///
/// Findings attributed to an object carry its class name; reader-level
/// warnings only carry the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Source document line the finding points at.
    pub line: u32,
    /// Class name of the owning object, when the finding has one.
    pub class_name: Option<String>,
    pub message: String,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.class_name {
            Some(class_name) => write!(
                f,
                "Object {class_name} at line {}: {}",
                self.line, self.message
            ),
            None => write!(f, "line {}: {}", self.line, self.message),
        }
    }
}

/// Append-only collector for advisory findings.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding attributed to `object`.
    pub fn object(&mut self, object: &Object, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            line: object.line,
            class_name: Some(object.class_name.clone()),
            message: message.into(),
        });
    }

    /// Records a reader-level finding that only has a source line.
    pub fn line(&mut self, line: u32, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            line,
            class_name: None,
            message: message.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, Diagnostics};
    use crate::model::object::Object;

    #[test]
    fn object_findings_render_the_stable_format() {
        let diagnostic = Diagnostic {
            line: 42,
            class_name: Some("wxBoxSizer".to_string()),
            message: "missing orient property in wxBoxSizer".to_string(),
        };
        assert_eq!(
            diagnostic.to_string(),
            "Object wxBoxSizer at line 42: missing orient property in wxBoxSizer"
        );
    }

    #[test]
    fn line_findings_render_without_object_context() {
        let diagnostic = Diagnostic {
            line: 7,
            class_name: None,
            message: "unrecognized element `style`".to_string(),
        };
        assert_eq!(diagnostic.to_string(), "line 7: unrecognized element `style`");
    }

    #[test]
    fn collector_keeps_discovery_order() {
        let object = Object {
            class_name: "wxGridSizer".to_string(),
            depth: 0,
            line: 3,
            expanded: false,
            properties: Vec::new(),
            children: Vec::new(),
        };

        let mut diagnostics = Diagnostics::new();
        diagnostics.line(1, "first");
        diagnostics.object(&object, "second");
        diagnostics.object(&object, "second"); // duplicates are kept

        let rendered: Vec<String> =
            diagnostics.iter().map(|entry| entry.to_string()).collect();
        assert_eq!(rendered.len(), 3);
        assert_eq!(rendered[0], "line 1: first");
        assert_eq!(rendered[1], rendered[2]);
    }
}
