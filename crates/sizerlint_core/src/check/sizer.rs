//! Sizer flag rule checks.
//!
//! # Responsibility
//! - Walk the object tree and apply kind-specific sizer rules.
//! - Report contradictions the wxWidgets layout engine would resolve
//!   silently at runtime.
//!
//! # Invariants
//! - Traversal is depth-first, parent before children, children in
//!   declared order; within a node the generic flag check runs before
//!   grid/box checks.
//! - Rule sets never short-circuit each other; every applicable finding
//!   is reported.
//! - Rule findings are advisory; only an unparseable `rows`/`cols` count
//!   aborts the run.

use crate::check::Diagnostics;
use crate::flags::{self, bits};
use crate::model::object::{Object, Project, PropertyError};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for check operations.
pub type CheckResult<T> = Result<T, CheckError>;

/// Fatal input errors raised while checking.
#[derive(Debug)]
pub enum CheckError {
    /// A grid sizer count property is missing or not an integer.
    IntProperty {
        class_name: String,
        line: u32,
        source: PropertyError,
    },
}

impl Display for CheckError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IntProperty {
                class_name,
                line,
                source,
            } => write!(f, "Object {class_name} at line {line}: {source}"),
        }
    }
}

impl Error for CheckError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IntProperty { source, .. } => Some(source),
        }
    }
}

/// Flags a sizer node may set on itself.
///
/// `wxEXPAND` and `wxALL` are child-placement conveniences and stay out of
/// this set on purpose; `wxGROW` is a member.
const SIZER_FLAG_SET: u32 = bits::CENTRE
    | bits::HORIZONTAL
    | bits::VERTICAL
    | bits::LEFT
    | bits::RIGHT
    | bits::UP
    | bits::DOWN
    | bits::ALIGN_NOT
    | bits::ALIGN_CENTER_HORIZONTAL
    | bits::ALIGN_RIGHT
    | bits::ALIGN_BOTTOM
    | bits::ALIGN_CENTER_VERTICAL
    | bits::FIXED_MINSIZE
    | bits::RESERVE_SPACE_EVEN_IF_HIDDEN
    | bits::STRETCH_NOT
    | bits::SHRINK
    | bits::GROW
    | bits::SHAPED;

/// Alignment bits constraining the vertical axis.
const VERTICAL_ALIGNMENT: u32 = bits::ALIGN_BOTTOM | bits::ALIGN_CENTER_VERTICAL;
/// Alignment bits constraining the horizontal axis.
const HORIZONTAL_ALIGNMENT: u32 = bits::ALIGN_RIGHT | bits::ALIGN_CENTER_HORIZONTAL;

/// Checks every top-level object of the project.
pub fn check_project(project: &Project, diagnostics: &mut Diagnostics) -> CheckResult<()> {
    debug!(
        "event=check_start module=check objects={}",
        project.objects.len()
    );
    for object in &project.objects {
        check_object(object, diagnostics)?;
    }
    debug!(
        "event=check_done module=check status=ok findings={}",
        diagnostics.len()
    );
    Ok(())
}

/// Applies all matching rule sets to `object`, then recurses into every
/// child, sizer or not, so nested sizers at any depth are checked.
pub fn check_object(object: &Object, diagnostics: &mut Diagnostics) -> CheckResult<()> {
    let class = object.classify();
    if class.sizer {
        check_sizer_flag_set(object, diagnostics);
    }
    if class.grid {
        check_grid_sizer(object, diagnostics)?;
    }
    if class.boxed {
        check_box_sizer(object, diagnostics);
    }
    for child in &object.children {
        check_object(child, diagnostics)?;
    }
    Ok(())
}

/// Parses an object's `flag` property, reporting unknown tokens against it.
fn object_flags(object: &Object, diagnostics: &mut Diagnostics) -> u32 {
    let parsed = flags::parse(object.property("flag").unwrap_or(""));
    for token in &parsed.unknown {
        diagnostics.object(object, format!("unknown flag `{token}`"));
    }
    parsed.mask
}

/// Rule set A: a sizer's own flags must stay inside the sizer flag set.
fn check_sizer_flag_set(object: &Object, diagnostics: &mut Diagnostics) {
    let mask = object_flags(object, diagnostics);
    if mask & !SIZER_FLAG_SET != 0 {
        diagnostics.object(
            object,
            format!("invalid flags {mask:#x} not within the sizer flag set"),
        );
    }
}

/// Rule set B: grid capacity and per-child expand/alignment conflicts.
fn check_grid_sizer(object: &Object, diagnostics: &mut Diagnostics) -> CheckResult<()> {
    let rows = grid_count(object, "rows")?;
    let cols = grid_count(object, "cols")?;

    // A zero row or column count lets the grid grow, so capacity is only
    // fixed when both are set.
    if rows != 0 && cols != 0 {
        let capacity = rows * cols;
        if object.children.len() as i64 > capacity {
            diagnostics.object(object, "too many children in wxGridSizer");
        }
    }

    for child in &object.children {
        let mask = object_flags(child, diagnostics);
        if mask & bits::EXPAND != 0
            && mask & VERTICAL_ALIGNMENT != 0
            && mask & HORIZONTAL_ALIGNMENT != 0
        {
            diagnostics.object(
                child,
                "wxEXPAND in a grid sizer child is overridden by alignment flags; \
                 remove wxEXPAND or the alignment in at least one direction",
            );
        }
    }
    Ok(())
}

fn grid_count(object: &Object, name: &str) -> CheckResult<i64> {
    object
        .int_property(name)
        .map_err(|source| CheckError::IntProperty {
            class_name: object.class_name.clone(),
            line: object.line,
            source,
        })
}

/// Rule set C: orientation-specific alignment rules for box sizer children.
fn check_box_sizer(object: &Object, diagnostics: &mut Diagnostics) {
    let orient = object.property("orient");
    let is_vertical = orient == Some("wxVERTICAL");
    let is_horizontal = orient == Some("wxHORIZONTAL");

    for child in &object.children {
        let mask = object_flags(child, diagnostics);
        if is_vertical {
            const MSG: &str =
                "only horizontal alignment flags can be used in children of a vertical box sizer";
            if mask & bits::ALIGN_BOTTOM != 0 {
                diagnostics.object(child, MSG);
            }
            if mask & bits::ALIGN_CENTER_VERTICAL != 0
                && mask & bits::ALIGN_CENTER_HORIZONTAL == 0
            {
                diagnostics.object(child, MSG);
            }
        } else if is_horizontal {
            const MSG: &str =
                "only vertical alignment flags can be used in children of a horizontal box sizer";
            if mask & bits::ALIGN_RIGHT != 0 {
                diagnostics.object(child, MSG);
            }
            if mask & bits::ALIGN_CENTER_HORIZONTAL != 0
                && mask & bits::ALIGN_CENTER_VERTICAL == 0
            {
                diagnostics.object(child, MSG);
            }
        } else {
            diagnostics.object(child, "missing orient property in wxBoxSizer");
        }

        if mask & bits::EXPAND != 0
            && mask & bits::SHAPED == 0
            && mask & (VERTICAL_ALIGNMENT | HORIZONTAL_ALIGNMENT) != 0
        {
            diagnostics.object(child, "wxEXPAND overrides alignment flags in box sizers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{check_object, check_project, CheckError};
    use crate::check::Diagnostics;
    use crate::model::object::{Object, Project, Property};

    fn object(class_name: &str, line: u32) -> Object {
        Object {
            class_name: class_name.to_string(),
            depth: 0,
            line,
            expanded: false,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    fn with_property(mut object: Object, name: &str, value: &str) -> Object {
        object.properties.push(Property {
            name: name.to_string(),
            value: value.to_string(),
        });
        object
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.iter().map(|entry| entry.to_string()).collect()
    }

    fn grid(rows: &str, cols: &str, children: Vec<Object>) -> Object {
        let mut sizer = with_property(object("wxGridSizer", 10), "rows", rows);
        sizer = with_property(sizer, "cols", cols);
        sizer.children = children;
        sizer
    }

    fn box_sizer(orient: Option<&str>, children: Vec<Object>) -> Object {
        let mut sizer = object("wxBoxSizer", 10);
        if let Some(orient) = orient {
            sizer = with_property(sizer, "orient", orient);
        }
        sizer.children = children;
        sizer
    }

    fn child_with_flags(flags: &str, line: u32) -> Object {
        with_property(object("wxButton", line), "flag", flags)
    }

    #[test]
    fn over_capacity_grid_reports_exactly_once() {
        let children = (0..5).map(|i| object("wxButton", 20 + i)).collect();
        let sizer = grid("2", "2", children);

        let mut diagnostics = Diagnostics::new();
        check_object(&sizer, &mut diagnostics).expect("counts are valid");

        let found = messages(&diagnostics);
        assert_eq!(
            found,
            vec!["Object wxGridSizer at line 10: too many children in wxGridSizer"]
        );
    }

    #[test]
    fn zero_row_or_column_count_disables_capacity_check() {
        for (rows, cols) in [("0", "2"), ("2", "0"), ("0", "0")] {
            let children = (0..9).map(|i| object("wxButton", 20 + i)).collect();
            let sizer = grid(rows, cols, children);

            let mut diagnostics = Diagnostics::new();
            check_object(&sizer, &mut diagnostics).expect("counts are valid");
            assert!(
                diagnostics.is_empty(),
                "rows={rows} cols={cols}: {:?}",
                messages(&diagnostics)
            );
        }
    }

    #[test]
    fn malformed_grid_count_is_fatal() {
        let sizer = grid("two", "2", Vec::new());

        let mut diagnostics = Diagnostics::new();
        let error = check_object(&sizer, &mut diagnostics).unwrap_err();
        let CheckError::IntProperty {
            class_name,
            line,
            source,
        } = error;
        assert_eq!(class_name, "wxGridSizer");
        assert_eq!(line, 10);
        assert_eq!(source.name, "rows");
        assert_eq!(source.value, "two");
    }

    #[test]
    fn missing_grid_count_is_fatal_like_a_malformed_one() {
        let sizer = object("wxGridSizer", 10);

        let mut diagnostics = Diagnostics::new();
        let error = check_object(&sizer, &mut diagnostics).unwrap_err();
        assert!(error.to_string().contains("property `rows`"));
    }

    #[test]
    fn grid_child_expand_conflicts_only_when_both_axes_are_aligned() {
        let both_axes = child_with_flags("wxEXPAND|wxALIGN_BOTTOM|wxALIGN_RIGHT", 21);
        let one_axis = child_with_flags("wxEXPAND|wxALIGN_BOTTOM", 22);
        let no_expand = child_with_flags("wxALIGN_BOTTOM|wxALIGN_RIGHT", 23);
        let sizer = grid("2", "2", vec![both_axes, one_axis, no_expand]);

        let mut diagnostics = Diagnostics::new();
        check_object(&sizer, &mut diagnostics).expect("counts are valid");

        let found = messages(&diagnostics);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("Object wxButton at line 21: wxEXPAND in a grid sizer"));
    }

    #[test]
    fn vertical_box_sizer_rejects_bottom_alignment() {
        let sizer = box_sizer(
            Some("wxVERTICAL"),
            vec![child_with_flags("wxALIGN_BOTTOM", 21)],
        );

        let mut diagnostics = Diagnostics::new();
        check_object(&sizer, &mut diagnostics).expect("no grid counts involved");

        let found = messages(&diagnostics);
        assert_eq!(
            found,
            vec![
                "Object wxButton at line 21: only horizontal alignment flags \
                 can be used in children of a vertical box sizer"
            ]
        );
    }

    #[test]
    fn horizontal_box_sizer_accepts_bottom_alignment() {
        let sizer = box_sizer(
            Some("wxHORIZONTAL"),
            vec![child_with_flags("wxALIGN_BOTTOM", 21)],
        );

        let mut diagnostics = Diagnostics::new();
        check_object(&sizer, &mut diagnostics).expect("no grid counts involved");
        assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));
    }

    #[test]
    fn lone_center_vertical_is_ambiguous_in_vertical_box_sizer() {
        let lone = child_with_flags("wxALIGN_CENTER_VERTICAL", 21);
        let paired = child_with_flags(
            "wxALIGN_CENTER_VERTICAL|wxALIGN_CENTER_HORIZONTAL",
            22,
        );
        let sizer = box_sizer(Some("wxVERTICAL"), vec![lone, paired]);

        let mut diagnostics = Diagnostics::new();
        check_object(&sizer, &mut diagnostics).expect("no grid counts involved");

        let found = messages(&diagnostics);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("Object wxButton at line 21"));
    }

    #[test]
    fn horizontal_box_sizer_mirrors_the_alignment_rules() {
        let right = child_with_flags("wxALIGN_RIGHT", 21);
        let lone_center = child_with_flags("wxALIGN_CENTER_HORIZONTAL", 22);
        let sizer = box_sizer(Some("wxHORIZONTAL"), vec![right, lone_center]);

        let mut diagnostics = Diagnostics::new();
        check_object(&sizer, &mut diagnostics).expect("no grid counts involved");

        let found = messages(&diagnostics);
        assert_eq!(found.len(), 2);
        assert!(found[0].starts_with("Object wxButton at line 21"));
        assert!(found[1].starts_with("Object wxButton at line 22"));
    }

    #[test]
    fn missing_orient_is_reported_per_child() {
        let sizer = box_sizer(
            None,
            vec![child_with_flags("", 21), child_with_flags("", 22)],
        );

        let mut diagnostics = Diagnostics::new();
        check_object(&sizer, &mut diagnostics).expect("no grid counts involved");

        let found = messages(&diagnostics);
        assert_eq!(
            found,
            vec![
                "Object wxButton at line 21: missing orient property in wxBoxSizer",
                "Object wxButton at line 22: missing orient property in wxBoxSizer",
            ]
        );
    }

    #[test]
    fn unrecognized_orient_counts_as_missing() {
        let sizer = box_sizer(Some("wxDIAGONAL"), vec![child_with_flags("", 21)]);

        let mut diagnostics = Diagnostics::new();
        check_object(&sizer, &mut diagnostics).expect("no grid counts involved");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn expand_overrides_alignment_unless_shaped() {
        let conflicting = child_with_flags("wxEXPAND|wxALIGN_RIGHT", 21);
        let shaped = child_with_flags("wxEXPAND|wxSHAPED|wxALIGN_RIGHT", 22);
        let sizer = box_sizer(Some("wxHORIZONTAL"), vec![conflicting, shaped]);

        let mut diagnostics = Diagnostics::new();
        check_object(&sizer, &mut diagnostics).expect("no grid counts involved");

        let found = messages(&diagnostics);
        // Both children also violate the horizontal alignment rule; only the
        // unshaped one adds the expand-override finding.
        let override_findings: Vec<&String> = found
            .iter()
            .filter(|message| message.contains("wxEXPAND overrides alignment"))
            .collect();
        assert_eq!(override_findings.len(), 1);
        assert!(override_findings[0].starts_with("Object wxButton at line 21"));
    }

    #[test]
    fn sizer_own_expand_flag_is_outside_the_allow_set() {
        let sizer = with_property(object("wxBoxSizer", 10), "flag", "wxEXPAND");
        let sizer = with_property(sizer, "orient", "wxVERTICAL");

        let mut diagnostics = Diagnostics::new();
        check_object(&sizer, &mut diagnostics).expect("no grid counts involved");

        let found = messages(&diagnostics);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("invalid flags"));
        assert!(found[0].contains("not within the sizer flag set"));
    }

    #[test]
    fn sizer_own_all_flag_is_outside_the_allow_set_but_grow_is_not() {
        let all = with_property(object("wxSizer", 10), "flag", "wxALL");
        let grow = with_property(object("wxSizer", 11), "flag", "wxGROW|wxSHAPED");

        let mut diagnostics = Diagnostics::new();
        check_object(&all, &mut diagnostics).expect("no grid counts involved");
        check_object(&grow, &mut diagnostics).expect("no grid counts involved");

        let found = messages(&diagnostics);
        assert_eq!(found.len(), 1);
        assert!(found[0].starts_with("Object wxSizer at line 10"));
    }

    #[test]
    fn unknown_flags_are_reported_and_do_not_hide_later_checks() {
        let sizer = with_property(object("wxSizer", 10), "flag", "wxBOGUS|wxEXPAND");

        let mut diagnostics = Diagnostics::new();
        check_object(&sizer, &mut diagnostics).expect("no grid counts involved");

        let found = messages(&diagnostics);
        assert_eq!(found.len(), 2);
        assert_eq!(
            found[0],
            "Object wxSizer at line 10: unknown flag `wxBOGUS`"
        );
        assert!(found[1].contains("invalid flags"));
    }

    #[test]
    fn traversal_reports_parent_before_children_in_declared_order() {
        // Tree A(B(D, E), C); every node is a plain sizer with one unknown
        // flag, so each contributes exactly one finding under rule set A.
        let make = |name: &str, line: u32| {
            with_property(object("wxSizer", line), "flag", &format!("BAD_{name}"))
        };
        let mut b = make("B", 2);
        b.children = vec![make("D", 3), make("E", 4)];
        let mut a = make("A", 1);
        a.children = vec![b, make("C", 5)];
        let project = Project { objects: vec![a] };

        let mut diagnostics = Diagnostics::new();
        check_project(&project, &mut diagnostics).expect("no grid counts involved");

        let order: Vec<String> = diagnostics
            .iter()
            .map(|entry| entry.message.clone())
            .collect();
        assert_eq!(
            order,
            vec![
                "unknown flag `BAD_A`",
                "unknown flag `BAD_B`",
                "unknown flag `BAD_D`",
                "unknown flag `BAD_E`",
                "unknown flag `BAD_C`",
            ]
        );
    }

    #[test]
    fn non_sizer_containers_still_descend_into_sizer_children() {
        let inner = box_sizer(None, vec![child_with_flags("", 30)]);
        let mut panel = object("wxPanel", 5);
        panel.children = vec![inner];

        let mut diagnostics = Diagnostics::new();
        check_object(&panel, &mut diagnostics).expect("no grid counts involved");
        assert_eq!(diagnostics.len(), 1);
    }
}
