//! Object tree read model.
//!
//! # Responsibility
//! - Represent one wxFormBuilder object node with properties and children.
//! - Provide property lookup and sizer-kind classification for checks.
//!
//! # Invariants
//! - `children` keeps document order; checks never reorder or deduplicate.
//! - Duplicate property names are legal; lookup is first-declared-wins.
//! - The tree is strict single-ownership: a parent owns its children by value.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// One named attribute of an object node, kept as its raw string value.
///
/// Values are parsed on demand by consumers (flags, integer counts); the
/// model itself never caches a typed form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub value: String,
}

/// Error for object properties that must parse as integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyError {
    /// Property name that was requested.
    pub name: String,
    /// Raw value found in the document. Empty when the property is absent.
    pub value: String,
}

impl Display for PropertyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "property `{}` value `{}` is not an integer",
            self.name, self.value
        )
    }
}

impl Error for PropertyError {}

/// Sizer-kind classification of one object node.
///
/// Categories overlap on purpose: every `wxGridSizer`-like or
/// `wxBoxSizer`-like class is also a plain sizer, and all matching rule
/// sets apply to the same node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizerClass {
    /// Class name ends in `Sizer`.
    pub sizer: bool,
    /// Class name ends in `GridSizer`.
    pub grid: bool,
    /// Class name ends in `BoxSizer`.
    pub boxed: bool,
}

/// One node of the project tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    /// Concrete widget or sizer class, e.g. `wxBoxSizer`.
    pub class_name: String,
    /// Distance from a top-level object (top level = 0). Presentation only.
    pub depth: usize,
    /// Source document line, used for diagnostics.
    pub line: u32,
    /// The `expanded` designer attribute. Carried but never validated.
    pub expanded: bool,
    /// Ordered attribute list as declared in the document.
    pub properties: Vec<Property>,
    /// Ordered children; position is the sizer insertion order.
    pub children: Vec<Object>,
}

impl Object {
    /// Returns the first declared value for `name`, or `None` when absent.
    ///
    /// The document format allows duplicate property names on one node;
    /// this lookup deliberately keeps first-declared-wins semantics.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| property.value.as_str())
    }

    /// Parses the property `name` as a decimal integer.
    ///
    /// An absent property behaves like an empty value and fails the parse,
    /// matching the strictness expected for grid `rows`/`cols` counts.
    pub fn int_property(&self, name: &str) -> Result<i64, PropertyError> {
        let value = self.property(name).unwrap_or("");
        value.trim().parse::<i64>().map_err(|_| PropertyError {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// Classifies this node by class-name suffix.
    pub fn classify(&self) -> SizerClass {
        SizerClass {
            sizer: self.class_name.ends_with("Sizer"),
            grid: self.class_name.ends_with("GridSizer"),
            boxed: self.class_name.ends_with("BoxSizer"),
        }
    }
}

impl Display for Object {
    /// Depth-indented tree dump: class name, then properties, then children.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let prefix = " ".repeat(self.depth);
        writeln!(f, "{prefix}{}", self.class_name)?;
        for property in &self.properties {
            writeln!(f, "{prefix} {} = {}", property.name, property.value)?;
        }
        for child in &self.children {
            write!(f, "{child}")?;
        }
        Ok(())
    }
}

/// The whole project: an ordered list of top-level objects.
///
/// A form file may carry several independent root windows or sizers. Built
/// once by the reader and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub objects: Vec<Object>,
}

impl Display for Project {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for object in &self.objects {
            write!(f, "{object}")?;
        }
        Ok(())
    }
}
