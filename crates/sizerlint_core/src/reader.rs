//! wxFormBuilder project document reader.
//!
//! # Responsibility
//! - Build the immutable object tree from raw `.fbp` XML.
//! - Attach source line numbers for diagnostics.
//!
//! # Invariants
//! - The root element must be `wxFormBuilder_Project`; anything else is a
//!   fatal input error with no partial output.
//! - Unrecognized attributes and elements are advisory warnings; the tree
//!   is still built.
//! - `event` children and the root `FileVersion` marker are ignored
//!   silently.

use crate::check::Diagnostics;
use crate::model::object::{Object, Project, Property};
use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Root element name of a wxFormBuilder project file.
const PROJECT_ROOT: &str = "wxFormBuilder_Project";

/// Result type for document reading.
pub type ReadResult<T> = Result<T, ReadError>;

/// Fatal errors while building the object tree.
#[derive(Debug)]
pub enum ReadError {
    /// The underlying XML is malformed.
    Xml { line: u32, source: quick_xml::Error },
    /// The document has no root element at all.
    MissingRootElement,
    /// The root element is not a wxFormBuilder project.
    WrongRootElement { found: String },
}

impl Display for ReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml { line, source } => write!(f, "malformed XML at line {line}: {source}"),
            Self::MissingRootElement => write!(f, "document has no root element"),
            Self::WrongRootElement { found } => write!(
                f,
                "root element `{found}` is not `{PROJECT_ROOT}`; \
                 argument is not a wxFormBuilder project file"
            ),
        }
    }
}

impl Error for ReadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Xml { source, .. } => Some(source),
            Self::MissingRootElement | Self::WrongRootElement { .. } => None,
        }
    }
}

/// Maps byte offsets to 1-based line numbers.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(offset, _)| offset + 1),
        );
        Self { starts }
    }

    fn line_at(&self, offset: usize) -> u32 {
        self.starts.partition_point(|start| *start <= offset) as u32
    }
}

/// In-progress object node while its element is still open.
struct ObjectFrame {
    object: Object,
}

/// In-progress property while its element is still open.
struct PropertyFrame {
    name: String,
    value: String,
}

/// Reads a whole project tree from document text.
///
/// Advisory warnings about unrecognized attribute or element names are
/// pushed into `diagnostics`; only malformed XML or a wrong root element
/// fails the read.
pub fn read_project(xml: &str, diagnostics: &mut Diagnostics) -> ReadResult<Project> {
    let index = LineIndex::new(xml);
    let mut reader = Reader::from_str(xml);

    let mut project = Project::default();
    let mut stack: Vec<ObjectFrame> = Vec::new();
    let mut property: Option<PropertyFrame> = None;
    let mut saw_root = false;

    loop {
        let event = {
            let position = reader.buffer_position() as usize;
            reader.read_event().map_err(|source| ReadError::Xml {
                line: index.line_at(position),
                source,
            })?
        };
        match event {
            Event::Start(start) => {
                let line = index.line_at(reader.buffer_position() as usize - 1);
                if !saw_root {
                    check_root(&start)?;
                    saw_root = true;
                } else if handle_element_start(
                    &start,
                    line,
                    &mut stack,
                    &mut property,
                    diagnostics,
                ) {
                    skip_subtree(&mut reader, &start, &index)?;
                }
            }
            Event::Empty(start) => {
                let line = index.line_at(reader.buffer_position() as usize - 1);
                if !saw_root {
                    check_root(&start)?;
                    saw_root = true;
                    // Degenerate `<wxFormBuilder_Project/>`: empty project.
                    break;
                }
                handle_empty_element(&start, line, &mut stack, &mut project, diagnostics);
            }
            Event::Text(text) => {
                if let Some(frame) = property.as_mut() {
                    let position = reader.buffer_position() as usize;
                    let chunk = text.unescape().map_err(|source| ReadError::Xml {
                        line: index.line_at(position),
                        source,
                    })?;
                    frame.value.push_str(&chunk);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = property.as_mut() {
                    frame.value.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(end) => {
                match end.name().as_ref() {
                    b"property" => {
                        if let (Some(frame), Some(parent)) = (property.take(), stack.last_mut())
                        {
                            parent.object.properties.push(Property {
                                name: frame.name,
                                value: frame.value,
                            });
                        }
                    }
                    b"object" => {
                        if let Some(frame) = stack.pop() {
                            match stack.last_mut() {
                                Some(parent) => parent.object.children.push(frame.object),
                                None => project.objects.push(frame.object),
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry nothing the object tree needs.
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
        }
    }

    if !saw_root {
        return Err(ReadError::MissingRootElement);
    }

    debug!(
        "event=read_done module=reader status=ok objects={} warnings={}",
        project.objects.len(),
        diagnostics.len()
    );
    Ok(project)
}

fn check_root(start: &BytesStart<'_>) -> ReadResult<()> {
    let found = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    if found != PROJECT_ROOT {
        return Err(ReadError::WrongRootElement { found });
    }
    Ok(())
}

/// Dispatches one opening element below the root.
///
/// Returns `true` when the caller must skip the element's subtree.
fn handle_element_start(
    start: &BytesStart<'_>,
    line: u32,
    stack: &mut Vec<ObjectFrame>,
    property: &mut Option<PropertyFrame>,
    diagnostics: &mut Diagnostics,
) -> bool {
    if property.is_some() {
        // Property values are plain text in this format; nested markup is
        // not part of the object model.
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        diagnostics.line(line, format!("unrecognized element `{name}` inside property"));
        return true;
    }

    match start.name().as_ref() {
        b"object" => {
            stack.push(new_object_frame(start, line, stack.len(), diagnostics));
            false
        }
        b"property" => {
            if stack.is_empty() {
                diagnostics.line(line, "unrecognized element `property` outside any object");
                return true;
            }
            *property = Some(new_property_frame(start, line, diagnostics));
            false
        }
        b"event" => true, // designer event handlers, ignored
        b"FileVersion" if stack.is_empty() => true, // version marker, ignored
        other => {
            let name = String::from_utf8_lossy(other).into_owned();
            diagnostics.line(line, format!("unrecognized element `{name}`"));
            true
        }
    }
}

/// Handles self-closing elements below the root.
fn handle_empty_element(
    start: &BytesStart<'_>,
    line: u32,
    stack: &mut Vec<ObjectFrame>,
    project: &mut Project,
    diagnostics: &mut Diagnostics,
) {
    match start.name().as_ref() {
        b"object" => {
            // A childless, property-less object; complete it immediately.
            let frame = new_object_frame(start, line, stack.len(), diagnostics);
            match stack.last_mut() {
                Some(parent) => parent.object.children.push(frame.object),
                None => project.objects.push(frame.object),
            }
        }
        b"property" => {
            if let Some(parent) = stack.last_mut() {
                let frame = new_property_frame(start, line, diagnostics);
                parent.object.properties.push(Property {
                    name: frame.name,
                    value: frame.value,
                });
            } else {
                diagnostics.line(line, "unrecognized element `property` outside any object");
            }
        }
        b"event" => {}
        b"FileVersion" if stack.is_empty() => {}
        other => {
            let name = String::from_utf8_lossy(other).into_owned();
            diagnostics.line(line, format!("unrecognized element `{name}`"));
        }
    }
}

fn new_object_frame(
    start: &BytesStart<'_>,
    line: u32,
    depth: usize,
    diagnostics: &mut Diagnostics,
) -> ObjectFrame {
    let mut object = Object {
        class_name: String::new(),
        depth,
        line,
        expanded: false,
        properties: Vec::new(),
        children: Vec::new(),
    };
    for attribute in start.attributes().flatten() {
        let value = String::from_utf8_lossy(&attribute.value).into_owned();
        match attribute.key.as_ref() {
            b"class" => object.class_name = value,
            b"expanded" => object.expanded = value == "true" || value == "1",
            other => {
                let name = String::from_utf8_lossy(other).into_owned();
                diagnostics.line(
                    line,
                    format!("unrecognized attribute `{name}` on object element"),
                );
            }
        }
    }
    ObjectFrame { object }
}

fn new_property_frame(
    start: &BytesStart<'_>,
    line: u32,
    diagnostics: &mut Diagnostics,
) -> PropertyFrame {
    let mut name = String::new();
    for attribute in start.attributes().flatten() {
        let value = String::from_utf8_lossy(&attribute.value).into_owned();
        match attribute.key.as_ref() {
            b"name" => name = value,
            other => {
                let attr = String::from_utf8_lossy(other).into_owned();
                diagnostics.line(
                    line,
                    format!("unrecognized attribute `{attr}` on property element"),
                );
            }
        }
    }
    PropertyFrame {
        name,
        value: String::new(),
    }
}

fn skip_subtree(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    index: &LineIndex,
) -> ReadResult<()> {
    let name = start.name().as_ref().to_vec();
    let position = reader.buffer_position() as usize;
    reader
        .read_to_end(QName(&name))
        .map_err(|source| ReadError::Xml {
            line: index.line_at(position),
            source,
        })?;
    Ok(())
}
