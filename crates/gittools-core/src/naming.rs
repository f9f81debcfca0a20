//! Human-readable names and their propagation toward ancestors.
//!
//! Every ref, reflog entry and dangling tip is a [`NameSource`] attached to
//! one object. Propagation walks parent edges from each source and gives
//! every reachable object at most one [`Name`] per source: the cheapest path
//! from the source, where fewer merge hops always win and fewer generations
//! break the tie.
//!
//! Sources come in three tiers (refs, reflog entries, dangling tips). A
//! weaker tier never walks into an object that a stronger tier has already
//! named, so reflog names only cover history that no ref reaches.
//!
//! Names are stored compactly as a back-pointer to the object one step
//! closer to the source; [`render`] rebuilds the revision expression
//! (`master~2^2~1`) on demand.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::graph::ObjectTable;
use crate::object::ObjectKind;

/// Index of a source inside [`NameSources`].
pub type SourceId = usize;

/// Where a name comes from. The declaration order is the reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A branch, tag, remote-tracking ref or any other ref.
    Ref,
    /// The `HEAD` symbolic ref.
    Head,
    /// An entry of a reflog (`ref@{n}`).
    Reflog,
    /// A dangling commit or tag reported by `git fsck`.
    Dangling,
}

/// Propagation strength. Lower tiers block higher ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Ref,
    Reflog,
    Dangling,
}

impl SourceKind {
    pub fn tier(self) -> Tier {
        match self {
            SourceKind::Ref | SourceKind::Head => Tier::Ref,
            SourceKind::Reflog => Tier::Reflog,
            SourceKind::Dangling => Tier::Dangling,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Ref => "ref",
            SourceKind::Head => "head",
            SourceKind::Reflog => "reflog",
            SourceKind::Dangling => "dangling",
        }
    }
}

/// A starting label attached to one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSource {
    pub kind: SourceKind,
    /// Display text of the source itself, e.g. `master`, `v1.0`, `HEAD@{2}`.
    pub label: String,
    /// Index of the object the source points at.
    pub object: usize,
}

/// Registry of name sources for one scan.
#[derive(Debug, Default)]
pub struct NameSources {
    sources: Vec<NameSource>,
}

impl NameSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: SourceKind, label: impl Into<String>, object: usize) -> SourceId {
        self.sources.push(NameSource {
            kind,
            label: label.into(),
            object,
        });
        self.sources.len() - 1
    }

    pub fn get(&self, id: SourceId) -> &NameSource {
        &self.sources[id]
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// One edge traversed from a named object toward an ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// From a tag to the object it tags.
    Peel,
    /// From a commit to its n-th parent (1-based).
    Parent(u32),
}

/// Cost of a name path. Field order is the comparison order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Cost {
    /// Steps to a parent other than the first.
    pub merges: u32,
    /// Parent steps of any kind.
    pub generations: u32,
}

impl Cost {
    pub const ZERO: Cost = Cost {
        merges: 0,
        generations: 0,
    };

    pub fn then(self, step: Step) -> Cost {
        match step {
            Step::Peel => self,
            Step::Parent(1) => Cost {
                merges: self.merges,
                generations: self.generations + 1,
            },
            Step::Parent(_) => Cost {
                merges: self.merges + 1,
                generations: self.generations + 1,
            },
        }
    }
}

/// A name assigned to an object by propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Name {
    pub source: SourceId,
    pub cost: Cost,
    /// The object one step closer to the source, and the step taken from it.
    /// `None` on the source's own object.
    pub via: Option<(usize, Step)>,
}

/// A name rendered to text, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedName {
    pub text: String,
    pub kind: SourceKind,
    pub cost: Cost,
}

/// Propagate every source toward ancestors, filling `GitObject::names`.
///
/// Sources are processed tier by tier. Before each tier starts, every object
/// that already carries a name is closed to that tier; a source still names
/// its own object even when it is closed.
pub fn propagate(table: &mut ObjectTable, sources: &NameSources) {
    let everything = vec![true; table.len()];
    propagate_within(table, sources, &everything);
}

/// Like [`propagate`], but only names the objects `targets` and the
/// history between them and the sources.
///
/// Every path from a source to a target runs through descendants of that
/// target, so the names of the targets come out the same as with a full
/// propagation.
pub fn propagate_toward(table: &mut ObjectTable, sources: &NameSources, targets: &[usize]) {
    let mut relevant = vec![false; table.len()];
    let mut stack: Vec<usize> = targets.to_vec();
    while let Some(idx) = stack.pop() {
        if relevant[idx] {
            continue;
        }
        relevant[idx] = true;
        stack.extend(table.get(idx).children.iter().filter(|&&c| !relevant[c]));
    }
    propagate_within(table, sources, &relevant);
}

fn propagate_within(table: &mut ObjectTable, sources: &NameSources, relevant: &[bool]) {
    let mut order: Vec<SourceId> = (0..sources.len())
        .filter(|&id| relevant[sources.get(id).object])
        .collect();
    order.sort_by_key(|&id| sources.get(id).kind.tier());

    let mut closed: Vec<bool> = relevant.iter().map(|r| !r).collect();
    let mut walker = Walker::new(table.len());
    let mut current_tier = None;
    let mut assigned = 0usize;

    for &id in &order {
        let source = sources.get(id);
        let tier = source.kind.tier();
        if current_tier != Some(tier) {
            for (idx, obj) in table.iter() {
                if !obj.names.is_empty() {
                    closed[idx] = true;
                }
            }
            current_tier = Some(tier);
        }

        for (idx, cost, via) in walker.shortest_paths(table, source.object, &closed) {
            table.get_mut(idx).names.push(Name {
                source: id,
                cost,
                via,
            });
            assigned += 1;
        }
    }

    // Tiers reorder the sources; lookups by source need them sorted.
    for idx in 0..table.len() {
        table.get_mut(idx).names.sort_unstable_by_key(|n| n.source);
    }

    tracing::debug!(
        sources = order.len(),
        skipped = sources.len() - order.len(),
        objects = relevant.iter().filter(|&&r| r).count(),
        names = assigned,
        "propagated names"
    );
}

type Settled = (usize, Cost, Option<(usize, Step)>);

/// Dijkstra state reused across sources; only the touched slots are reset.
struct Walker {
    best: Vec<Option<(Cost, Option<(usize, Step)>)>>,
    done: Vec<bool>,
    touched: Vec<usize>,
    heap: BinaryHeap<Reverse<(Cost, usize)>>,
}

impl Walker {
    fn new(len: usize) -> Self {
        Self {
            best: vec![None; len],
            done: vec![false; len],
            touched: Vec::new(),
            heap: BinaryHeap::new(),
        }
    }

    /// Dijkstra from `start` along parent edges, skipping closed objects.
    ///
    /// Results are returned in settle order so that callers stay
    /// deterministic.
    fn shortest_paths(&mut self, table: &ObjectTable, start: usize, closed: &[bool]) -> Vec<Settled> {
        let mut settled = Vec::new();

        self.best[start] = Some((Cost::ZERO, None));
        self.touched.push(start);
        self.heap.push(Reverse((Cost::ZERO, start)));

        while let Some(Reverse((cost, idx))) = self.heap.pop() {
            if self.done[idx] {
                continue;
            }
            self.done[idx] = true;
            let via = self.best[idx].and_then(|(_, via)| via);
            settled.push((idx, cost, via));

            let obj = table.get(idx);
            for (pos, &parent) in obj.parents.iter().enumerate() {
                if closed[parent] || self.done[parent] {
                    continue;
                }
                let step = if obj.kind == ObjectKind::Tag {
                    Step::Peel
                } else {
                    Step::Parent(pos as u32 + 1)
                };
                let next = cost.then(step);
                let improves = match self.best[parent] {
                    Some((known, _)) => next < known,
                    None => true,
                };
                if improves {
                    if self.best[parent].is_none() {
                        self.touched.push(parent);
                    }
                    self.best[parent] = Some((next, Some((idx, step))));
                    self.heap.push(Reverse((next, parent)));
                }
            }
        }

        for idx in self.touched.drain(..) {
            self.best[idx] = None;
            self.done[idx] = false;
        }
        settled
    }
}

/// Steps from the source object down to `idx`, in walking order.
pub fn steps_to(table: &ObjectTable, idx: usize, name: &Name) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut via = name.via;
    while let Some((closer, step)) = via {
        steps.push(step);
        let names = &table.get(closer).names;
        let Ok(pos) = names.binary_search_by_key(&name.source, |n| n.source) else {
            debug_assert!(false, "name chain broken at object {closer} (from {idx})");
            break;
        };
        via = names[pos].via;
    }
    steps.reverse();
    steps
}

/// Render `base` followed by `steps` in revision syntax.
///
/// Runs of first-parent steps collapse to `~n`, other parents render `^n`,
/// and a peel renders `^{}` only when nothing follows it.
pub fn format_name(base: &str, steps: &[Step]) -> String {
    let mut out = base.to_string();
    let mut run = 0u32;

    fn flush(out: &mut String, run: &mut u32) {
        if *run > 0 {
            out.push('~');
            out.push_str(&run.to_string());
            *run = 0;
        }
    }

    for (i, step) in steps.iter().enumerate() {
        match step {
            Step::Parent(1) => run += 1,
            Step::Parent(n) => {
                flush(&mut out, &mut run);
                out.push('^');
                out.push_str(&n.to_string());
            }
            Step::Peel => {
                flush(&mut out, &mut run);
                if i + 1 == steps.len() {
                    out.push_str("^{}");
                }
            }
        }
    }
    flush(&mut out, &mut run);
    out
}

/// Render one name of the object at `idx`.
pub fn render(table: &ObjectTable, sources: &NameSources, idx: usize, name: &Name) -> RenderedName {
    let source = sources.get(name.source);
    RenderedName {
        text: format_name(&source.label, &steps_to(table, idx, name)),
        kind: source.kind,
        cost: name.cost,
    }
}

/// Names of the object at `idx`, in reporting order: source kind, then
/// cost, then text. `max` caps the list (0 keeps every name).
///
/// Only names that can still make the cut are rendered.
pub fn ordered_names(
    table: &ObjectTable,
    sources: &NameSources,
    idx: usize,
    max: usize,
) -> Vec<RenderedName> {
    let key = |name: &Name| (sources.get(name.source).kind, name.cost);

    let mut candidates: Vec<&Name> = table.get(idx).names.iter().collect();
    candidates.sort_by_key(|name| key(name));
    if max > 0 && candidates.len() > max {
        // Ties with the last kept name are decided by text.
        let cutoff = key(candidates[max - 1]);
        let keep = candidates.partition_point(|name| key(name) <= cutoff);
        candidates.truncate(keep);
    }

    let mut names: Vec<RenderedName> = candidates
        .into_iter()
        .map(|name| render(table, sources, idx, name))
        .collect();
    names.sort_by(|a, b| (a.kind, a.cost, &a.text).cmp(&(b.kind, b.cost, &b.text)));
    if max > 0 {
        names.truncate(max);
    }
    names
}

/// The first name in reporting order, if the object has any.
pub fn primary_name(table: &ObjectTable, sources: &NameSources, idx: usize) -> Option<RenderedName> {
    ordered_names(table, sources, idx, 1).into_iter().next()
}
