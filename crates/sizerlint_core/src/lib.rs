//! Core checks for wxFormBuilder sizer flag consistency.
//! This crate is the single source of truth for the rule set.

pub mod check;
pub mod flags;
pub mod logging;
pub mod model;
pub mod reader;

pub use check::{check_object, check_project, CheckError, CheckResult, Diagnostic, Diagnostics};
pub use flags::{lookup, parse, ParsedFlags};
pub use logging::{default_log_level, init_logging};
pub use model::object::{Object, Project, Property, PropertyError, SizerClass};
pub use reader::{read_project, ReadError, ReadResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
