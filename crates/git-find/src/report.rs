//! Per-object reports and their text rendering.

use gittools_core::graph::ObjectTable;
use gittools_core::naming::{self, NameSources, RenderedName, SourceKind};
use gittools_core::object::ObjectKind;
use gittools_ui::styles::{
    render_dangling_badge, render_label, render_muted, render_name, render_object_heading,
    render_object_id, render_unnamed,
};
use serde::Serialize;

/// Everything reported about one looked-up object.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectReport {
    /// The revision as given on the command line.
    pub revision: String,
    pub id: String,
    pub kind: ObjectKind,
    pub dangling: bool,
    pub names: Vec<RenderedName>,
    /// Names left out because of `max-names`.
    #[serde(skip_serializing_if = "is_zero")]
    pub omitted_names: usize,
    pub parents: Vec<Relative>,
    pub children: Vec<Relative>,
}

/// A parent or child of a reported object.
#[derive(Debug, Clone, Serialize)]
pub struct Relative {
    /// Abbreviated object id.
    pub id: String,
    pub kind: ObjectKind,
    /// Primary name, if the object has one.
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceKind>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

/// Build the report for the object at `idx`.
///
/// `max_names` caps the names listed (0 keeps them all).
pub fn build(
    table: &ObjectTable,
    sources: &NameSources,
    idx: usize,
    revision: &str,
    abbrev: usize,
    max_names: usize,
) -> ObjectReport {
    let obj = table.get(idx);
    let names = naming::ordered_names(table, sources, idx, max_names);
    let omitted_names = obj.names.len() - names.len();

    let relative = |other: usize| {
        let primary = naming::primary_name(table, sources, other);
        let other = table.get(other);
        Relative {
            id: other.id.short(abbrev).to_string(),
            kind: other.kind,
            source: primary.as_ref().map(|n| n.kind),
            name: primary.map(|n| n.text),
        }
    };

    ObjectReport {
        revision: revision.to_string(),
        id: obj.id.to_string(),
        kind: obj.kind,
        dangling: obj.dangling,
        names,
        omitted_names,
        parents: obj.parents.iter().map(|&p| relative(p)).collect(),
        children: obj.children.iter().map(|&c| relative(c)).collect(),
    }
}

/// Render reports as text, separated by blank lines.
///
/// ```text
/// commit 3f2a9c4e...
///     name    master~2
///     name    HEAD~2
///     parent  1b4e0aa master~3
///     child   9c01d2f master~1
/// ```
pub fn render_text(reports: &[ObjectReport]) -> String {
    let mut out = String::new();
    for (i, report) in reports.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_one(&mut out, report);
    }
    out
}

fn render_one(out: &mut String, report: &ObjectReport) {
    out.push_str(&format!(
        "{} {}",
        report.kind,
        render_object_heading(&report.id)
    ));
    if report.dangling {
        out.push(' ');
        out.push_str(&render_dangling_badge());
    }
    out.push('\n');

    if report.names.is_empty() {
        row(out, "name", &render_unnamed());
    }
    for name in &report.names {
        row(out, "name", &render_name(&name.text, name.kind));
    }
    if report.omitted_names > 0 {
        row(
            out,
            "name",
            &render_muted(&format!("... {} more", report.omitted_names)),
        );
    }

    let parent_label = if report.kind == ObjectKind::Tag {
        "target"
    } else {
        "parent"
    };
    for parent in &report.parents {
        row(out, parent_label, &render_relative(parent));
    }
    for child in &report.children {
        let label = if child.kind == ObjectKind::Tag {
            "tag"
        } else {
            "child"
        };
        row(out, label, &render_relative(child));
    }
}

fn row(out: &mut String, label: &str, value: &str) {
    out.push_str("    ");
    out.push_str(&render_label(label));
    out.push_str(value);
    out.push('\n');
}

fn render_relative(rel: &Relative) -> String {
    let name = match (&rel.name, rel.source) {
        (Some(text), Some(kind)) => render_name(text, kind),
        _ => render_unnamed(),
    };
    format!("{} {}", render_object_id(&rel.id), name)
}

/// Every name of every report, one per line.
pub fn render_names(reports: &[ObjectReport]) -> String {
    let mut out = String::new();
    for name in reports.iter().flat_map(|r| &r.names) {
        out.push_str(&name.text);
        out.push('\n');
    }
    out
}
