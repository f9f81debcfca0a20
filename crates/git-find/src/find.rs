//! The search itself: resolve the revisions, scan, name and report.

use anyhow::{Context, Result, bail};
use gittools_core::naming;
use gittools_core::object::{ObjectId, ObjectKind};
use gittools_git::{gitdir, plumbing};

use crate::context::RuntimeContext;
use crate::output::{output_json, output_text};
use crate::report::{self, ObjectReport};
use crate::scan::{self, ScanOptions};

/// Look up every revision and print its report.
pub fn run(ctx: &RuntimeContext, revisions: &[String]) -> Result<()> {
    gitdir::require_repo(&ctx.git)?;

    let mut queries: Vec<(ObjectId, ObjectKind)> = Vec::with_capacity(revisions.len());
    for revision in revisions {
        let id = plumbing::resolve(&ctx.git, revision)?;
        let kind = plumbing::object_kind(&ctx.git, &id)
            .with_context(|| format!("reading type of {revision}"))?;
        if !matches!(kind, ObjectKind::Commit | ObjectKind::Tag) {
            bail!("{revision} is a {kind}; only commits and tags can be looked up");
        }
        tracing::debug!(%revision, %id, %kind, "resolved");
        queries.push((id, kind));
    }

    let find = &ctx.config.find;
    let mut scan = scan::scan(&ctx.git, &ScanOptions::from(find), &queries)
        .context("scanning repository")?;

    let mut found: Vec<usize> = Vec::with_capacity(queries.len());
    let mut targets: Vec<usize> = Vec::new();
    for (revision, (id, _)) in revisions.iter().zip(&queries) {
        let idx = scan
            .table
            .lookup(id)
            .with_context(|| format!("{revision} missing from the object graph"))?;
        let obj = scan.table.get(idx);
        targets.push(idx);
        targets.extend(&obj.parents);
        targets.extend(&obj.children);
        found.push(idx);
    }
    // Relatives are reported by name too.
    naming::propagate_toward(&mut scan.table, &scan.sources, &targets);

    let reports: Vec<ObjectReport> = revisions
        .iter()
        .zip(found)
        .map(|(revision, idx)| {
            report::build(
                &scan.table,
                &scan.sources,
                idx,
                revision,
                find.abbrev,
                find.max_names,
            )
        })
        .collect();

    if ctx.json {
        output_json(&reports);
        return Ok(());
    }

    if ctx.names_only {
        if !ctx.quiet {
            for r in reports.iter().filter(|r| r.names.is_empty()) {
                eprintln!("warning: {} has no names", r.revision);
            }
        }
        output_text(&report::render_names(&reports), false);
    } else {
        output_text(&report::render_text(&reports), ctx.use_pager());
    }
    Ok(())
}
