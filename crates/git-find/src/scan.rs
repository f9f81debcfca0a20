//! Building the object graph and its name sources from a repository.

use gittools_config::FindConfig;
use gittools_core::graph::ObjectTable;
use gittools_core::naming::{NameSources, SourceKind};
use gittools_core::object::{ObjectId, ObjectKind};
use gittools_core::parse::RefRecord;
use gittools_git::{GitRunner, Result, plumbing};

/// The object graph of a repository together with every name source.
#[derive(Debug, Default)]
pub struct Scan {
    pub table: ObjectTable,
    pub sources: NameSources,
}

/// Which kinds of history to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub reflogs: bool,
    pub dangling: bool,
    pub head: bool,
    /// Digits used when labelling a dangling object by its id.
    pub abbrev: usize,
}

impl From<&FindConfig> for ScanOptions {
    fn from(config: &FindConfig) -> Self {
        Self {
            reflogs: config.reflogs,
            dangling: config.dangling,
            head: config.head,
            abbrev: config.abbrev,
        }
    }
}

/// Build the object table for `git`'s repository.
///
/// `queries` are the objects the caller will report on; they are walked
/// as extra tips so that an object unreachable from anything else still
/// has its parents recorded.
pub fn scan(
    git: &GitRunner,
    opts: &ScanOptions,
    queries: &[(ObjectId, ObjectKind)],
) -> Result<Scan> {
    let mut scan = Scan::default();
    let mut tips: Vec<ObjectId> = Vec::new();

    let refs = plumbing::list_refs(git)?;
    for record in &refs {
        let idx = scan.table.insert(record.id.clone(), record.kind);
        if let Some((target, kind)) = &record.target {
            let target_idx = scan.table.insert(target.clone(), *kind);
            if scan.table.add_edge(idx, target_idx) && *kind == ObjectKind::Tag {
                scan.peel_tag(git, target_idx, &mut tips)?;
            }
        }
        scan.sources.add(SourceKind::Ref, record.short.clone(), idx);
    }
    tracing::debug!(refs = refs.len(), "refs listed");

    if opts.head {
        if let Some(id) = plumbing::head(git)? {
            let idx = scan.table.insert(id, ObjectKind::Commit);
            scan.sources.add(SourceKind::Head, "HEAD", idx);
        }
    }

    let dangling = if opts.dangling {
        plumbing::dangling(git, opts.reflogs)?
    } else {
        Vec::new()
    };
    for (kind, id) in &dangling {
        scan.add_tip(git, id, *kind, &mut tips)?;
    }
    for (id, kind) in queries {
        scan.add_tip(git, id, *kind, &mut tips)?;
    }

    let edges = plumbing::rev_list_parents(git, &tips, true, opts.reflogs)?;
    for (commit, parents) in edges {
        let child = scan.table.insert(commit, ObjectKind::Commit);
        for parent in parents {
            let parent = scan.table.insert(parent, ObjectKind::Commit);
            scan.table.add_edge(child, parent);
        }
    }

    if opts.reflogs {
        scan.add_reflog_sources(git, &refs)?;
    }

    for (kind, id) in &dangling {
        if !matches!(kind, ObjectKind::Commit | ObjectKind::Tag) {
            continue;
        }
        if let Some(idx) = scan.table.lookup(id) {
            scan.table.mark_dangling(idx);
            scan.sources.add(SourceKind::Dangling, id.short(opts.abbrev), idx);
        }
    }

    tracing::debug!(
        objects = scan.table.len(),
        edges = scan.table.edge_count(),
        sources = scan.sources.len(),
        "object graph built"
    );
    Ok(scan)
}

impl Scan {
    /// Record a commit or tag that history walking must start from.
    fn add_tip(
        &mut self,
        git: &GitRunner,
        id: &ObjectId,
        kind: ObjectKind,
        tips: &mut Vec<ObjectId>,
    ) -> Result<()> {
        match kind {
            ObjectKind::Commit => {
                self.table.insert(id.clone(), kind);
                tips.push(id.clone());
            }
            ObjectKind::Tag => {
                let idx = self.table.insert(id.clone(), kind);
                self.peel_tag(git, idx, tips)?;
            }
            ObjectKind::Tree | ObjectKind::Blob => {}
        }
        Ok(())
    }

    /// Follow the tag at `idx` down to the first non-tag object, adding a
    /// peel edge at each level. A tagged commit becomes a tip.
    fn peel_tag(&mut self, git: &GitRunner, idx: usize, tips: &mut Vec<ObjectId>) -> Result<()> {
        let mut current = idx;
        loop {
            let id = self.table.get(current).id.clone();
            let (target, kind) = plumbing::tag_target(git, &id)?;
            let target_idx = self.table.insert(target.clone(), kind);
            let new_edge = self.table.add_edge(current, target_idx);
            match kind {
                ObjectKind::Commit => {
                    tips.push(target);
                    return Ok(());
                }
                ObjectKind::Tag if new_edge => current = target_idx,
                _ => return Ok(()),
            }
        }
    }

    /// One source per reflog entry of every ref and of `HEAD`.
    ///
    /// Tags are skipped: git does not keep reflogs for them by default and
    /// asking costs one process per tag.
    fn add_reflog_sources(&mut self, git: &GitRunner, refs: &[RefRecord]) -> Result<()> {
        let logged = refs
            .iter()
            .map(|r| r.refname.as_str())
            .filter(|name| !name.starts_with("refs/tags/"))
            .chain(std::iter::once("HEAD"));

        let mut added = 0usize;
        for refname in logged {
            for entry in plumbing::reflog(git, refname)? {
                match self.table.lookup(&entry.id) {
                    Some(idx) => {
                        self.sources.add(SourceKind::Reflog, entry.selector, idx);
                        added += 1;
                    }
                    None => {
                        tracing::debug!(selector = %entry.selector, "reflog entry outside graph")
                    }
                }
            }
        }
        tracing::debug!(entries = added, "reflog sources added");
        Ok(())
    }
}
